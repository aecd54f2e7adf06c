//! Executing an `HttpRequest` over the network.
//!
//! # Design
//! `Transport` is the seam between the pure build/parse halves of the client
//! and real I/O. Awaiting `execute` is the only suspension point of a
//! submission. `ReqwestTransport` is the stock implementation; tests and
//! hosts with their own HTTP stack can supply another.

use std::future::Future;

use log::debug;
use url::Url;

use crate::config::TransportConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};

/// Sends one request and returns the response as plain data.
///
/// A non-2xx status is a normal response, not an error, and an unreadable
/// body on such a response comes back empty. Only failures to complete the
/// exchange are reported as `Err`.
pub trait Transport {
    fn execute(
        &self,
        request: HttpRequest,
    ) -> impl Future<Output = Result<HttpResponse, ApiError>> + Send;
}

/// `reqwest`-backed transport.
///
/// Holds an optional origin that stands in for a browser's current origin:
/// relative targets (the fixed `/merge-files` path) are joined onto it,
/// absolute targets are sent untouched. No default headers are installed.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    origin: Option<Url>,
}

impl ReqwestTransport {
    /// A transport with no origin and no timeouts.
    pub fn new() -> Result<Self, ApiError> {
        Self::from_config(&TransportConfig::default())
    }

    pub fn from_config(config: &TransportConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = config.connect_timeout() {
            builder = builder.connect_timeout(timeout);
        }
        let origin = config.origin.as_deref().map(Url::parse).transpose()?;
        Ok(Self::with_client(builder.build()?, origin))
    }

    /// Wrap an existing client, reusing its connection pool.
    pub fn with_client(client: reqwest::Client, origin: Option<Url>) -> Self {
        Self { client, origin }
    }

    /// Set the origin relative targets resolve against.
    pub fn with_origin(mut self, origin: &str) -> Result<Self, ApiError> {
        self.origin = Some(Url::parse(origin)?);
        Ok(self)
    }

    pub fn origin(&self) -> Option<&Url> {
        self.origin.as_ref()
    }

    /// Turn a request target into an absolute URL.
    pub fn resolve(&self, target: &str) -> Result<Url, ApiError> {
        match Url::parse(target) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => match &self.origin {
                Some(origin) => Ok(origin.join(target)?),
                None => Err(url::ParseError::RelativeUrlWithoutBase.into()),
            },
            Err(e) => Err(e.into()),
        }
    }
}

impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let url = self.resolve(&request.url)?;
        debug!("POST {url} ({} bytes)", request.body.len());

        let mut builder = self.client.post(url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        let response = builder.body(request.body).send().await?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        debug!("response status {status}");
        // A non-2xx body is informational; failing to read it must not turn
        // the response into a transport error.
        let body = if response.status().is_success() {
            response.text().await?
        } else {
            response.text().await.unwrap_or_else(|e| {
                debug!("discarding unreadable {status} body: {e}");
                String::new()
            })
        };

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
