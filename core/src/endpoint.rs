//! Where the upload form is posted.

use serde::Deserialize;

/// The well-known upload route of the merge server.
pub const MERGE_FILES_PATH: &str = "/merge-files";

/// Destination of a submission.
///
/// `Fixed` always targets [`MERGE_FILES_PATH`] on the transport's origin.
/// `BaseUrl` is used verbatim: it is neither validated nor joined with any
/// path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndpointTarget {
    #[default]
    Fixed,
    BaseUrl(String),
}

impl EndpointTarget {
    pub fn base_url(url: impl Into<String>) -> Self {
        EndpointTarget::BaseUrl(url.into())
    }

    /// The request target string.
    pub fn as_str(&self) -> &str {
        match self {
            EndpointTarget::Fixed => MERGE_FILES_PATH,
            EndpointTarget::BaseUrl(url) => url.as_str(),
        }
    }
}
