use axum::extract::State;
use axum::response::IntoResponse;

use sitesentry_tracking::script;

use crate::state::SharedState;

/// GET /track.js
///
/// Serves the generated client tracking script. Pages embed it with a
/// plain `<script defer src="/track.js">` tag.
pub async fn get_tracking_script(State(state): State<SharedState>) -> impl IntoResponse {
    (
        [
            ("content-type", "application/javascript; charset=utf-8"),
            ("cache-control", "public, max-age=300"),
        ],
        script::tracking_script(state.config.tracking.inject_trap_links),
    )
}
