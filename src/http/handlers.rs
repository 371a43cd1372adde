//! API handlers.

use std::path::PathBuf;

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize, Serializer};

use crate::analytics::TableSummary;
use crate::http::error::{ApiError, ApiResult};
use crate::http::server::AppState;
use crate::model::ValidationResult;
use crate::tables::TableStats;

pub const SERVICE_NAME: &str = "Audit Request Verification Service";

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct LoadParams {
    pub dir: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoadResponse {
    pub status: &'static str,
    pub message: &'static str,
    pub stats: TableStats,
}

#[derive(Debug, Serialize)]
pub struct ValidateAllResponse {
    pub status: &'static str,
    pub total_requests: usize,
    pub valid_requests: usize,
    pub invalid_requests: usize,
    /// Keyed by request id, in table order.
    #[serde(serialize_with = "ordered_map")]
    pub results: Vec<(String, ValidationResult)>,
}

#[derive(Debug, Deserialize)]
pub struct ValidateParams {
    pub id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ValidateOneResponse {
    pub status: &'static str,
    pub request_id: String,
    pub result: ValidationResult,
}

fn ordered_map<S: Serializer>(
    results: &[(String, ValidationResult)],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_map(results.iter().map(|(id, result)| (id, result)))
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    tracing::debug!("Health check requested");
    Json(HealthResponse {
        status: "healthy",
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// POST /load?dir=<path>
///
/// Replaces all reference tables or none of them.
pub async fn load(
    State(state): State<AppState>,
    params: Result<Query<LoadParams>, QueryRejection>,
) -> ApiResult<Json<LoadResponse>> {
    let Query(params) = params?;
    let dir = params.dir.filter(|d| !d.is_empty()).map(PathBuf::from);
    tracing::info!(dir = ?dir, "Reload data requested via API");

    let store = state.validator.store().clone();
    let stats = tokio::task::spawn_blocking(move || store.reload(dir.as_deref()))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))??;

    Ok(Json(LoadResponse {
        status: "success",
        message: "Data reloaded successfully",
        stats,
    }))
}

/// POST /validate
pub async fn validate_all(State(state): State<AppState>) -> ApiResult<Json<ValidateAllResponse>> {
    tracing::info!("Validate all requests requested via API");
    let validator = state.validator.clone();
    let report = tokio::task::spawn_blocking(move || validator.validate_all())
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(Json(ValidateAllResponse {
        status: "success",
        total_requests: report.total,
        valid_requests: report.valid,
        invalid_requests: report.invalid,
        results: report.results,
    }))
}

/// POST /validate/request?id=<request id>
pub async fn validate_request(
    State(state): State<AppState>,
    params: Result<Query<ValidateParams>, QueryRejection>,
) -> ApiResult<Json<ValidateOneResponse>> {
    let Query(params) = params?;
    let request_id = params
        .id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Request ID is required".to_string()))?;

    let result = state.validator.validate_one(&request_id)?;

    Ok(Json(ValidateOneResponse {
        status: "success",
        request_id,
        result,
    }))
}

/// GET /stats
pub async fn stats(State(state): State<AppState>) -> Json<TableSummary> {
    let tables = state.validator.store().snapshot();
    Json(TableSummary::from_tables(&tables))
}
