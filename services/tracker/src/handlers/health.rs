use axum::extract::State;
use axum::http::StatusCode;

use biblia_core::health::readiness;

use crate::infra::db::ping;
use crate::state::AppState;

// ── GET /readyz ──────────────────────────────────────────────────────────────

pub async fn readyz(State(state): State<AppState>) -> StatusCode {
    readiness(ping(&state.db).await)
}
