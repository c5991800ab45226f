use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde_json::{json, Value};

use crate::context::client_context;
use crate::state::SharedState;

/// GET /api/users
///
/// Decoy endpoint. No legitimate page links here except the hidden trap
/// anchors, so any request is a probe. Responds with believable fake data
/// to keep scanners engaged; there is no session token on a bare GET, so
/// the probe is logged and counted rather than written to the alert log.
pub async fn fake_users(State(state): State<SharedState>, headers: HeaderMap) -> Json<Value> {
    let ctx = client_context(&headers);

    tracing::warn!(
        client_ip = %ctx.ip,
        user_agent = %ctx.user_agent,
        "decoy user API probed"
    );
    state.metrics.traps_triggered.inc();

    Json(json!({
        "users": [
            { "id": 1, "username": "admin", "email": "admin@fake.com" },
            { "id": 2, "username": "root", "email": "root@fake.com" }
        ]
    }))
}
