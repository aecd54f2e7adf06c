//! Client for submitting file-upload forms to the merge server.
//!
//! # Overview
//! Posts a caller-built multipart form to `/merge-files` (or a caller-chosen
//! URL) and returns the server's JSON reply. A non-2xx status gives no
//! result; transport and JSON errors propagate to the caller.
//!
//! # Design
//! - `MergeRequestClient` is stateless.
//! - The operation is split into `build_submit` (produces a plain-data
//!   request) and `parse_submit` (consumes a plain-data response), joined by
//!   `submit` through a `Transport`, so the I/O boundary is explicit.
//! - `ReqwestTransport` is the stock transport; it resolves the fixed path
//!   against a configured origin.
//! - `MergeReply` types are defined independently from the mock-server crate;
//!   integration tests catch schema drift.

pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod form;
pub mod http;
pub mod transport;
pub mod types;

pub use client::MergeRequestClient;
pub use config::{ClientConfig, TransportConfig};
pub use endpoint::{EndpointTarget, MERGE_FILES_PATH};
pub use error::ApiError;
pub use form::{EncodedForm, FilePart, FormEntry, FormPayload};
pub use http::{HttpRequest, HttpResponse};
pub use transport::{ReqwestTransport, Transport};
pub use types::MergeReply;
