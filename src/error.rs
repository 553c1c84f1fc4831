use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Boxed error returned by a [`ProtoMessage`](crate::ProtoMessage) codec.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error envelope returned by the Logging API on failed requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponseError {
    pub error: ApiStatus,
}

/// The `google.rpc.Status` portion of an API error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiStatus {
    pub code: Option<i64>,
    pub message: String,
    #[serde(default)]
    pub status: String,
}

#[derive(Error, Debug)]
pub enum Error {
    /// The HTTP exchange itself failed (connect, TLS, timeout, body read).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    /// The service answered with an error status.
    #[error("Google error: {:?}", .0)]
    Api(ApiStatus),
    /// A proto message could not render itself to canonical JSON.
    #[error("proto message could not be rendered to JSON: {0}")]
    ProtoEncoding(#[source] BoxError),
    /// A proto codec produced text that is not valid JSON, or a request
    /// body failed to serialize.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The `entries:list` response did not match the documented shape.
    #[error("malformed entries:list response: {0}")]
    ListResponse(#[source] serde_json::Error),
}
