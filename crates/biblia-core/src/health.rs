use axum::http::StatusCode;

/// Handler for `GET /healthz`. The process is up if it can answer.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Map a dependency probe to a readiness status (`503` while it fails).
pub fn readiness<E: std::fmt::Display>(probe: Result<(), E>) -> StatusCode {
    match probe {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "readiness probe failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
