use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

use sitesentry_storage::DashboardStats;

use crate::error::ApiError;
use crate::state::SharedState;

/// GET /api/admin/stats
///
/// Read-only aggregation for the operator dashboard, gated by comparing
/// the bearer token against the configured shared secret.
pub async fn get_stats(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<Json<DashboardStats>, ApiError> {
    authorize(&headers, &state.config.server.admin.token)?;

    let stats = state
        .recorder
        .store()
        .dashboard_stats()
        .await
        .map_err(ApiError::stats)?;
    Ok(Json(stats))
}

fn authorize(headers: &HeaderMap, token: &str) -> Result<(), ApiError> {
    let provided = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if provided != format!("Bearer {}", token) {
        return Err(ApiError::Unauthorized);
    }
    Ok(())
}
