//! Repository for user lookups.

use sqlx::PgPool;

use crate::entities::UserEntity;
use crate::metrics::QueryTimer;

#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Batch lookup. Unknown ids are skipped.
    pub async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<UserEntity>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let timer = QueryTimer::new("find_users_by_ids");
        let result = sqlx::query_as::<_, UserEntity>(
            r#"
            SELECT id, account_id, email, first_name, last_name, created_at, updated_at
            FROM users
            WHERE id = ANY($1)
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
