//! Error types for the merge upload client.
//!
//! # Design
//! A non-2xx status is not an error for `submit`; it yields `Ok(None)`.
//! `HttpStatus` only comes out of the `*_checked` variants, which surface the
//! status and body instead of dropping them.

use thiserror::Error;

/// Errors returned by `MergeRequestClient` and the transports.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The transport could not complete the request/response exchange.
    #[error("transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The form could not be turned into a multipart body.
    #[error("form encoding failed: {0}")]
    Form(#[source] reqwest::Error),

    /// The endpoint target could not be turned into a request URL.
    #[error("invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A successful response body could not be decoded.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The server returned a non-2xx status (checked variants only).
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// A configuration file could not be read or parsed.
    #[error("invalid configuration: {0}")]
    Config(String),
}
