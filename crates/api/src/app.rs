use axum::{middleware, routing::get, Router};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use domain::services::{DocumentUrlError, DocumentUrls};

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, require_auth, trace_id};
use crate::routes::{health, templates};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    pub document_urls: Arc<DocumentUrls>,
}

pub fn create_app(config: Config, pool: PgPool) -> Result<Router, DocumentUrlError> {
    let config = Arc::new(config);
    let document_urls = Arc::new(DocumentUrls::new(&config.storage.base_url)?);

    let state = AppState {
        pool,
        config: config.clone(),
        document_urls,
    };

    let cors = if config.security.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Require X-Auth-Token
    let template_routes = Router::new()
        .route("/api/templates", get(templates::list_templates))
        .route(
            "/api/templates/:id",
            get(templates::get_template)
                .put(templates::update_template)
                .patch(templates::update_template)
                .delete(templates::delete_template),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    // Global middleware (order matters: bottom layers run first)
    let router = Router::new()
        .merge(public_routes)
        .merge(template_routes)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state);

    Ok(router)
}
