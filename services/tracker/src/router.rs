use std::time::Duration;

use axum::{
    Router,
    http::{Request, Response},
    routing::{delete, get, post, put},
};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::Span;

use biblia_core::health::healthz;
use biblia_core::middleware::{propagate_request_id_layer, request_id_layer, request_id_of};

use crate::handlers::{
    auth::login,
    health::readyz,
    record::{create_record, delete_record, get_record, list_records, update_record},
    user::{create_user, delete_user, get_user, list_users, update_user},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let trace = TraceLayer::new_for_http()
        .make_span_with(|req: &Request<_>| {
            tracing::info_span!(
                "http_request",
                method = %req.method(),
                uri = %req.uri(),
                request_id = %request_id_of(req),
                status = tracing::field::Empty,
            )
        })
        .on_response(|res: &Response<_>, latency: Duration, span: &Span| {
            let status = res.status();
            span.record("status", tracing::field::display(status));
            let latency_ms = latency.as_millis() as u64;
            if status.is_server_error() {
                tracing::error!(%status, latency_ms, "response");
            } else {
                tracing::info!(%status, latency_ms, "response");
            }
        });

    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Users
        .route("/users", get(list_users))
        .route("/users", post(create_user))
        .route("/users/{id}", get(get_user))
        .route("/users/{id}", put(update_user))
        .route("/users/{id}", delete(delete_user))
        // Auth
        .route("/auth/login", post(login))
        // Records
        .route("/records", get(list_records))
        .route("/records", post(create_record))
        .route("/records", put(update_record))
        .route("/records", delete(delete_record))
        .route("/records/detail", get(get_record))
        .layer(
            ServiceBuilder::new()
                .layer(request_id_layer())
                .layer(trace)
                .layer(propagate_request_id_layer()),
        )
        .with_state(state)
}
