//! CADIA order intake service.
//!
//! Serves the 3D printing order form, stores each accepted order in its own
//! directory and notifies the shop by email. The binary in `main.rs` only
//! loads configuration, sets up logging and Sentry, and serves [`app`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod feedback;
pub mod filters;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;

use axum::{Router, extract::DefaultBodyLimit, http::Uri, routing::get};
use tower::ServiceBuilder;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::error::AppError;
use crate::state::AppState;

/// Build the full router with its middleware stack.
///
/// Sentry layers are left to the caller so tests can serve the router
/// without a Sentry client.
pub fn app(state: AppState) -> Router {
    let static_dir = state.config().static_dir.clone();
    let body_limit = state.config().max_upload_bytes;

    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http().make_span_with(
                        |request: &axum::http::Request<_>| {
                            tracing::info_span!(
                                "http_request",
                                method = %request.method(),
                                uri = %request.uri(),
                                request_id = tracing::field::Empty,
                            )
                        },
                    ),
                )
                .layer(axum::middleware::from_fn(
                    middleware::request_id_middleware,
                ))
                .layer(axum::middleware::from_fn(
                    middleware::security_headers_middleware,
                )),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the SMTP relay.
async fn health() -> &'static str {
    "ok"
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
