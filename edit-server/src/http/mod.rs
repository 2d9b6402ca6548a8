//! HTTP endpoints for edit-server.
//!
//! Protocol routes take and return MessagePack bodies:
//! - `POST /connect` - [`Message::Connect`](edit_types::Message::Connect)
//! - `POST /post` - [`Message::Post`](edit_types::Message::Post)
//! - `POST /get` - [`Message::Get`](edit_types::Message::Get)
//!
//! Operational routes: `GET /health` (JSON) and `GET /metrics` (Prometheus).

pub mod health;
mod metrics;
mod sync;

use crate::reconciler::Reconciler;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;

pub use health::HealthStatus;
pub use sync::MSGPACK_CONTENT_TYPE;

/// Build the HTTP router with all endpoints.
pub fn build_router(reconciler: Arc<Reconciler>) -> Router {
    let mut router = Router::new()
        .route("/connect", post(sync::connect_handler))
        .route("/post", post(sync::post_handler))
        .route("/get", post(sync::get_handler))
        .route("/health", get(health::health_handler));

    if reconciler.config().http.metrics_enabled {
        router = router.route("/metrics", get(metrics::metrics_handler));
    }

    let body_limit = reconciler.config().limits.max_request_bytes;
    router
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(Extension(reconciler))
}
