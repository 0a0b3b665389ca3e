use std::fmt::Display;

use axum::http::StatusCode;

/// Handler for `GET /healthz`: liveness check.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Map a dependency ping to a readiness status for `GET /readyz`.
pub fn readiness<E: Display>(ping: Result<(), E>) -> StatusCode {
    match ping {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
