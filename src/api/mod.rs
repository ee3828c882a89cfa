pub mod catalog;
pub mod error;
pub mod estimate;
pub mod health;

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::{Config, EngineConfig};
use crate::tables::{IrradianceTable, PricingTable};

/// Shared, read-only state behind the handlers.
///
/// The tables are loaded once at startup; every request only reads them,
/// so plain `Arc`s are enough.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<EngineConfig>,
    pub pricing: Arc<PricingTable>,
    pub irradiance: Arc<IrradianceTable>,
}

impl AppState {
    pub fn new(cfg: &Config, pricing: PricingTable, irradiance: IrradianceTable) -> Self {
        Self {
            engine: Arc::new(cfg.engine.clone()),
            pricing: Arc::new(pricing),
            irradiance: Arc::new(irradiance),
        }
    }
}

pub fn router(state: AppState, cfg: &Config) -> Router {
    let mut router = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::liveness_check))
        .nest("/api/v1", v1_router(state));

    if cfg.server.enable_cors {
        use tower_http::cors::{Any, CorsLayer};
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
            .allow_headers([axum::http::header::CONTENT_TYPE]);
        router = router.layer(cors);
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(axum::extract::DefaultBodyLimit::max(64 * 1024))
                .layer(TimeoutLayer::new(Duration::from_secs(
                    cfg.server.request_timeout_secs,
                ))),
        )
        .layer(TraceLayer::new_for_http())
}

fn v1_router(state: AppState) -> Router {
    Router::new()
        .route("/estimate", post(estimate::estimate))
        .route("/catalog", get(catalog::catalog))
        .with_state(state)
}
