//! HTTP route handlers for the order intake service.
//!
//! # Route Structure
//!
//! ```text
//! GET  /            - Order form
//! POST /orders      - Submit an order (multipart/form-data)
//! GET  /health      - Liveness check
//! GET  /static/*    - Stylesheet
//! ```

pub mod collect;
pub mod order;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create all page routes of the intake service.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(order::form_page))
        .route("/orders", post(order::submit))
}
