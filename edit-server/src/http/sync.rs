//! Protocol routes: connect, post and get.

use crate::error::ServerError;
use crate::reconciler::Reconciler;
use axum::{
    body::Bytes,
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
    Extension,
};
use edit_types::Message;
use std::sync::Arc;

/// Content type of protocol request and response bodies.
pub const MSGPACK_CONTENT_TYPE: &str = "application/msgpack";

pub async fn connect_handler(
    Extension(reconciler): Extension<Arc<Reconciler>>,
    body: Bytes,
) -> Response {
    exchange(&reconciler, "/connect", "Connect", &body).await
}

pub async fn post_handler(
    Extension(reconciler): Extension<Arc<Reconciler>>,
    body: Bytes,
) -> Response {
    exchange(&reconciler, "/post", "Post", &body).await
}

pub async fn get_handler(
    Extension(reconciler): Extension<Arc<Reconciler>>,
    body: Bytes,
) -> Response {
    exchange(&reconciler, "/get", "Get", &body).await
}

/// Decode, dispatch and encode one request.
async fn exchange(
    reconciler: &Reconciler,
    route: &'static str,
    expected: &'static str,
    body: &[u8],
) -> Response {
    match respond(reconciler, route, expected, body).await {
        Ok(bytes) => ([(CONTENT_TYPE, MSGPACK_CONTENT_TYPE)], bytes).into_response(),
        Err(e) => {
            tracing::warn!("Bad request on {}: {}", route, e);
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
    }
}

async fn respond(
    reconciler: &Reconciler,
    route: &'static str,
    expected: &'static str,
    body: &[u8],
) -> Result<Vec<u8>, ServerError> {
    let message = Message::from_bytes(body)?;
    if message.kind() != expected {
        return Err(ServerError::UnexpectedMessage {
            route,
            actual: message.kind(),
        });
    }
    let reply = reconciler.handle(route, message).await?;
    Ok(reply.to_bytes()?)
}
