//! Stateless request builder and response parser for the merge upload.
//!
//! # Design
//! `MergeRequestClient` carries no state at all. `build_submit` produces an
//! `HttpRequest`, `parse_submit` consumes an `HttpResponse`, and `submit`
//! runs the two around one `Transport::execute` call. Hosts that do their own
//! I/O can use the split methods directly. Building is async only because
//! the multipart encoder yields a stream; it performs no I/O.
//!
//! A non-2xx status yields `Ok(None)` without looking at the body. The
//! `*_checked` methods are the strict alternative and report the status as
//! `ApiError::HttpStatus`.

use log::debug;
use serde_json::Value;

use crate::endpoint::EndpointTarget;
use crate::error::ApiError;
use crate::form::FormPayload;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;

/// Client for posting a multipart form to the merge endpoint.
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeRequestClient;

impl MergeRequestClient {
    pub fn new() -> Self {
        Self
    }

    /// Build the POST for `payload`. The only header is the multipart content
    /// type; the URL is the target string unchanged.
    pub async fn build_submit(
        &self,
        payload: &FormPayload,
        target: &EndpointTarget,
    ) -> Result<HttpRequest, ApiError> {
        let encoded = payload.encode().await?;
        Ok(HttpRequest {
            url: target.as_str().to_string(),
            headers: vec![("content-type".to_string(), encoded.content_type)],
            body: encoded.body,
        })
    }

    /// Decode a 2xx body as JSON; any other status gives `Ok(None)`.
    pub fn parse_submit(&self, response: HttpResponse) -> Result<Option<Value>, ApiError> {
        if !response.is_success() {
            return Ok(None);
        }
        decode_json(&response.body).map(Some)
    }

    /// Like `parse_submit`, but a non-2xx status is an error.
    pub fn parse_submit_checked(&self, response: HttpResponse) -> Result<Value, ApiError> {
        if !response.is_success() {
            return Err(ApiError::HttpStatus {
                status: response.status,
                body: response.body,
            });
        }
        decode_json(&response.body)
    }

    /// Post `payload` to `target` and return the decoded JSON body.
    ///
    /// Transport failures and malformed JSON on a 2xx response are returned
    /// as `Err`; a non-2xx status is `Ok(None)`.
    pub async fn submit<T: Transport>(
        &self,
        transport: &T,
        payload: &FormPayload,
        target: &EndpointTarget,
    ) -> Result<Option<Value>, ApiError> {
        let response = self.send(transport, payload, target).await?;
        self.parse_submit(response)
    }

    /// Post `payload` to `target`, treating a non-2xx status as an error.
    pub async fn submit_checked<T: Transport>(
        &self,
        transport: &T,
        payload: &FormPayload,
        target: &EndpointTarget,
    ) -> Result<Value, ApiError> {
        let response = self.send(transport, payload, target).await?;
        self.parse_submit_checked(response)
    }

    async fn send<T: Transport>(
        &self,
        transport: &T,
        payload: &FormPayload,
        target: &EndpointTarget,
    ) -> Result<HttpResponse, ApiError> {
        let request = self.build_submit(payload, target).await?;
        debug!("submitting form to {}", request.url);
        let response = transport.execute(request).await?;
        debug!("{} answered {}", target.as_str(), response.status);
        Ok(response)
    }
}

fn decode_json(body: &str) -> Result<Value, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Deserialization(e.to_string()))
}
