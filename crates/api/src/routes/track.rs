use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde_json::{json, Value};

use sitesentry_tracking::{ClickPayload, HoneypotPayload, PageViewPayload, VisitorPayload};

use crate::context::client_context;
use crate::error::ApiError;
use crate::routes::parse_json;
use crate::state::SharedState;

/// POST /api/track/visitor
pub async fn record_visitor(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let ctx = client_context(&headers);
    let payload: VisitorPayload = parse_json(body)?;

    state
        .recorder
        .record_visitor(&payload, &ctx)
        .await
        .map_err(ApiError::tracking)?;

    state
        .metrics
        .events_recorded
        .with_label_values(&["visitor"])
        .inc();
    Ok(Json(json!({ "success": true })))
}

/// POST /api/track/pageview
pub async fn record_page_view(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let ctx = client_context(&headers);
    let payload: PageViewPayload = parse_json(body)?;

    state
        .recorder
        .record_page_view(&payload, &ctx)
        .await
        .map_err(ApiError::tracking)?;

    state
        .metrics
        .events_recorded
        .with_label_values(&["pageview"])
        .inc();
    Ok(Json(json!({ "success": true })))
}

/// POST /api/track/click
pub async fn record_click(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let ctx = client_context(&headers);
    let payload: ClickPayload = parse_json(body)?;

    state
        .recorder
        .record_click(&payload, &ctx)
        .await
        .map_err(ApiError::tracking)?;

    state
        .metrics
        .events_recorded
        .with_label_values(&["click"])
        .inc();
    Ok(Json(json!({ "success": true })))
}

/// POST /api/track/honeypot
pub async fn record_honeypot(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let ctx = client_context(&headers);
    let payload: HoneypotPayload = parse_json(body)?;

    state
        .recorder
        .record_honeypot(&payload, &ctx)
        .await
        .map_err(ApiError::tracking)?;

    state
        .metrics
        .events_recorded
        .with_label_values(&["honeypot"])
        .inc();
    state.metrics.traps_triggered.inc();
    Ok(Json(json!({ "success": true, "message": "Activity logged" })))
}
