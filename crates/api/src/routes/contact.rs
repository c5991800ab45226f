use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde_json::{json, Value};

use sitesentry_storage::NewContactSubmission;
use sitesentry_tracking::contact::ContactPayload;

use crate::context::client_context;
use crate::error::ApiError;
use crate::routes::parse_json;
use crate::state::SharedState;

/// POST /api/contact
///
/// The one user-facing write path with an external side effect, so it runs
/// the rate limiter first. Order matters: gate, then validate, then
/// deliver, then persist -- a submission only lands in the log once the
/// owner notification went out.
pub async fn submit_contact(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let ctx = client_context(&headers);

    if !state.limiter.allow(&ctx.ip) {
        state.metrics.rate_limited_total.inc();
        tracing::info!(client_ip = %ctx.ip, "contact request rate limited");
        return Err(ApiError::RateLimited);
    }

    let payload: ContactPayload = parse_json(body)?;
    payload.validate().map_err(ApiError::ContactValidation)?;

    let submission = NewContactSubmission {
        session_id: payload
            .session_id
            .clone()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "unknown".to_string()),
        ip_address: ctx.ip.clone(),
        name: payload.name.trim().to_string(),
        email: payload.email.clone(),
        message: payload.message.clone(),
        user_agent: ctx.user_agent.clone(),
        country: ctx.country.clone(),
    };

    state
        .mailer
        .send_contact_notification(&submission)
        .await
        .map_err(ApiError::contact)?;

    state
        .recorder
        .store()
        .append_contact_submission(&submission)
        .await
        .map_err(ApiError::contact)?;

    state.metrics.contact_submissions.inc();
    Ok(Json(json!({ "message": "Email sent successfully" })))
}
