//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! These types describe the upload request and its response as plain data.
//! `MergeRequestClient::build_submit` produces an `HttpRequest` and
//! `MergeRequestClient::parse_submit` consumes an `HttpResponse`; whoever sits
//! in between (a `Transport`, or a host executing requests itself) owns the
//! actual I/O.
//!
//! Every request built here is a POST, so the method is not carried as data.

/// An upload request described as plain data.
///
/// `url` is the endpoint target exactly as the caller chose it. For the fixed
/// variant that is a path, which the executor resolves against its origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl HttpRequest {
    /// Look up a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// True for statuses in the 200..=299 range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: String::new(),
        }
    }

    #[test]
    fn success_range_is_2xx_only() {
        assert!(response(200).is_success());
        assert!(response(204).is_success());
        assert!(response(299).is_success());
        assert!(!response(199).is_success());
        assert!(!response(300).is_success());
        assert!(!response(404).is_success());
    }

    #[test]
    fn header_lookup_ignores_case() {
        let req = HttpRequest {
            url: "/merge-files".to_string(),
            headers: vec![("content-type".to_string(), "text/plain".to_string())],
            body: Vec::new(),
        };
        assert_eq!(req.header("Content-Type"), Some("text/plain"));
        assert_eq!(req.header("authorization"), None);
    }
}
