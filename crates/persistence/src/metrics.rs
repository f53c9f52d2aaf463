//! Database metrics.

use metrics::{gauge, histogram};
use sqlx::PgPool;
use std::time::Instant;

pub const QUERY_DURATION_METRIC: &str = "database_query_duration_seconds";
pub const POOL_CONNECTIONS_METRIC: &str = "database_pool_connections";

pub fn record_query_duration(query_name: &'static str, duration_secs: f64) {
    histogram!(QUERY_DURATION_METRIC, "query" => query_name).record(duration_secs);
}

/// Publishes pool occupancy, labelled by connection state.
pub fn record_pool_metrics(pool: &PgPool) {
    let size = pool.size() as usize;
    let idle = pool.num_idle();

    gauge!(POOL_CONNECTIONS_METRIC, "state" => "active").set(size.saturating_sub(idle) as f64);
    gauge!(POOL_CONNECTIONS_METRIC, "state" => "idle").set(idle as f64);
}

/// Times one repository query.
///
/// ```ignore
/// let timer = QueryTimer::new("find_template_in_account");
/// let result = qb.build_query_as::<TemplateEntity>().fetch_optional(&pool).await;
/// timer.record();
/// ```
pub struct QueryTimer {
    query_name: &'static str,
    start: Instant,
}

impl QueryTimer {
    pub fn new(query_name: &'static str) -> Self {
        Self {
            query_name,
            start: Instant::now(),
        }
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }

    pub fn record(self) {
        record_query_duration(self.query_name, self.elapsed_secs());
    }
}
