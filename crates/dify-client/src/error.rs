use reqwest::StatusCode;
use thiserror::Error;

/// Errors returned by [`DifyClient`](crate::DifyClient) calls.
///
/// Each variant identifies the phase that failed. Per-frame decode failures
/// during streaming are not represented here: they are logged and the frame
/// is skipped, so the stream stays alive.
#[derive(Debug, Error)]
pub enum DifyError {
    /// Building the HTTP client or an outbound request failed.
    #[error("failed to build request: {0}")]
    Construction(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Sending the request failed (connection, TLS, DNS, ...).
    #[error("failed to send request: {0}")]
    Transport(#[source] reqwest::Error),

    /// The API answered with a non-OK status.
    #[error("API request failed with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// Reading the streaming response body failed mid-stream.
    #[error("error reading streaming response: {0}")]
    StreamRead(#[source] Box<dyn std::error::Error + Send + Sync>),
}
