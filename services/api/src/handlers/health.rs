use axum::{extract::State, http::StatusCode};

use skillshare_core::health::readiness;

use crate::state::AppState;

// ── GET /readyz ──────────────────────────────────────────────────────────────

pub async fn readyz(State(state): State<AppState>) -> StatusCode {
    readiness(state.db.ping().await)
}
