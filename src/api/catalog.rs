use axum::{extract::State, Json};
use serde::Serialize;

use super::AppState;

/// Keys clients may use in estimate requests, for populating selectors.
#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub distributors: Vec<DistributorEntry>,
    pub departments: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct DistributorEntry {
    pub name: String,
    pub rate_classes: Vec<String>,
}

/// GET /api/v1/catalog - List the loaded table keys.
pub async fn catalog(State(state): State<AppState>) -> Json<CatalogResponse> {
    let distributors = state
        .pricing
        .distributors()
        .into_iter()
        .map(|name| DistributorEntry {
            name: name.to_string(),
            rate_classes: state
                .pricing
                .rate_classes(name)
                .into_iter()
                .map(str::to_string)
                .collect(),
        })
        .collect();

    let departments = state
        .irradiance
        .departments()
        .into_iter()
        .map(str::to_string)
        .collect();

    Json(CatalogResponse {
        distributors,
        departments,
    })
}
