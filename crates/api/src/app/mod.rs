//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: storage backend selection and repository wiring
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `errors.rs`: handler error type and consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs` and tests).
pub fn build_app(services: AppServices) -> Router {
    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(
            ServiceBuilder::new()
                .layer(Extension(Arc::new(services))),
        )
}
