use axum::{extract::State, Json};

use crate::engine::{self, Estimate, EstimateRequest};

use super::error::ApiError;
use super::AppState;

/// POST /api/v1/estimate - Run the full estimation pipeline.
pub async fn estimate(
    State(state): State<AppState>,
    Json(request): Json<EstimateRequest>,
) -> Result<Json<Estimate>, ApiError> {
    let mut rng = rand::thread_rng();
    let estimate = engine::estimate(
        &state.engine,
        &state.pricing,
        &state.irradiance,
        &request,
        &mut rng,
    )?;

    tracing::debug!(
        distributor = %request.distributor,
        department = %request.department,
        panel_count = estimate.system.panel_count,
        installed_kw = estimate.system.installed_kw,
        "estimate computed"
    );

    Ok(Json(estimate))
}
