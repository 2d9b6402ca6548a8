//! Protocol messages for Quill.
//!
//! The protocol has three request/response pairs: connect, post and get.

use serde::{Deserialize, Serialize};

use crate::{ChangeRecord, ChangeRequest, ClientId, VersionId, WireError};

/// All possible protocol messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Message {
    /// Ask the server for a client id
    Connect(Connect),
    /// Server response to Connect
    ConnectResponse(ConnectResponse),
    /// Submit an edit
    Post(Post),
    /// Outcome of a post
    PostResponse(PostResponse),
    /// Request log records after a version
    Get(Get),
    /// Response to get
    GetResponse(GetResponse),
}

impl Message {
    /// Serialize to MessagePack bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, WireError> {
        rmp_serde::to_vec_named(self).map_err(WireError::Serialization)
    }

    /// Deserialize from MessagePack bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, WireError> {
        rmp_serde::from_slice(bytes).map_err(WireError::Deserialization)
    }

    /// Variant name, for logs and error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Connect(_) => "Connect",
            Self::ConnectResponse(_) => "ConnectResponse",
            Self::Post(_) => "Post",
            Self::PostResponse(_) => "PostResponse",
            Self::Get(_) => "Get",
            Self::GetResponse(_) => "GetResponse",
        }
    }
}

/// Connect request. Carries no data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connect {}

/// Server response to Connect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectResponse {
    /// Freshly assigned client id
    pub client_id: ClientId,
}

/// Submit one change request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// The submitted edit
    pub request: ChangeRequest,
}

/// Outcome of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PostResult {
    /// Accepted (or ignored because the target document does not exist)
    Success,
    /// Rejected as malformed
    Failure,
}

/// Server response to Post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostResponse {
    /// Whether the edit was accepted
    pub result: PostResult,
}

/// Request log records with a version greater than `version_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Get {
    /// Last version the client has replayed
    pub version_id: VersionId,
}

/// Response to Get.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetResponse {
    /// Matching records in increasing version order
    pub records: Vec<ChangeRecord>,
}
