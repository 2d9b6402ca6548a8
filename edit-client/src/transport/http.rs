//! HttpTransport - protocol messages over HTTP POST.
//!
//! Each request is a single `POST` to the endpoint path with a MessagePack
//! body; the reply body is returned as-is. No retries happen here: the
//! driver loops decide what to do with a failure.

use super::{Endpoint, Transport, TransportError};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

/// Content type of protocol request and response bodies.
pub const MSGPACK_CONTENT_TYPE: &str = "application/msgpack";

/// Transport that talks to a quill-server over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a transport for the server at `base_url` (e.g. `http://127.0.0.1:4444`).
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Server base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() {
            TransportError::ConnectionFailed(e.to_string())
        } else {
            TransportError::RequestFailed(e.to_string())
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(&self, endpoint: Endpoint, body: Vec<u8>) -> Result<Vec<u8>, TransportError> {
        let response = self
            .client
            .post(self.url(endpoint))
            .header(CONTENT_TYPE, MSGPACK_CONTENT_TYPE)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let transport = HttpTransport::new("http://127.0.0.1:4444/").unwrap();
        assert_eq!(transport.base_url(), "http://127.0.0.1:4444");
        assert_eq!(
            transport.url(Endpoint::Post),
            "http://127.0.0.1:4444/post"
        );
    }

    #[tokio::test]
    async fn unreachable_server_is_transport_error() {
        // Port 9 (discard) on localhost is not expected to run an HTTP server.
        let transport = HttpTransport::new("http://127.0.0.1:9").unwrap();
        let result = transport.request(Endpoint::Connect, vec![]).await;
        assert!(matches!(
            result,
            Err(TransportError::ConnectionFailed(_)) | Err(TransportError::RequestFailed(_))
        ));
    }
}
