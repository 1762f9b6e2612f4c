//! Error types for the Mailgun API client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the resource does not exist" from "the server returned an unexpected
//! status." All other non-2xx responses land in `Http` with the raw status
//! code and body for debugging. Transport, decode and cancellation failures
//! are the ones a `PageIterator` keeps as its sticky error.

use thiserror::Error;

/// Errors returned by `MailgunClient` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404: the requested resource does not exist.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The request never produced a response (connect, DNS, I/O, timeout).
    #[error("transport failed: {0}")]
    Transport(String),

    /// A request URL could not be assembled from the base URL and parameters.
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The call context was cancelled before the request was issued.
    #[error("request cancelled")]
    Cancelled,

    /// The call context's deadline passed before the request was issued.
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// Client configuration is missing or malformed.
    #[error("configuration error: {0}")]
    Config(String),
}
