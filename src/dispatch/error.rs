use thiserror::Error;

use super::transport::TransportError;

/// Failure of a single dispatch attempt. Every variant is retried.
#[derive(Debug, Error)]
pub enum AttemptError {
    #[error("network failure: {0}")]
    TransientNetwork(#[from] TransportError),

    #[error("remote rejected request with HTTP {status}")]
    RemoteRejection { status: u16 },

    #[error("response body is not JSON: {0}")]
    MalformedResponse(#[from] serde_json::Error),
}
