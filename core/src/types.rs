//! Typed view of the merge server's JSON replies.
//!
//! # Design
//! The server reports validation failures as a JSON error object, often with
//! a 200 status, so a present result from `submit` can still be a failure.
//! `MergeReply` tells the two apart by shape. These types mirror the mock
//! server's schema but are defined independently; the integration tests catch
//! drift between the two crates.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;

/// A decoded merge response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MergeReply {
    Success { message: String, download_link: String },
    Failure { message: String, code: u16 },
}

impl MergeReply {
    /// Decode a JSON value returned by `MergeRequestClient::submit`.
    pub fn from_value(value: Value) -> Result<Self, ApiError> {
        serde_json::from_value(value).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, MergeReply::Success { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            MergeReply::Success { message, .. } | MergeReply::Failure { message, .. } => {
                message.as_str()
            }
        }
    }
}
