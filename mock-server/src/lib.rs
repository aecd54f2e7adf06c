//! Stand-in for the external merge server.
//!
//! Serves `POST /merge-files` with the same reply shapes as the real server
//! and `ANY /status/{code}` for exercising non-2xx paths. Every request
//! passes through a recording layer so tests can inspect exactly what a
//! client sent.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, Path, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::{any, post},
    Json, Router,
};
use log::info;
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const WEB_FILE_FIELD: &str = "web_file";
pub const BITRIX_FILE_FIELD: &str = "bitrix_file";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MergeReply {
    Success { message: String, download_link: String },
    Failure { message: String, code: u16 },
}

/// A request as it arrived on the wire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub uri: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Shared log of every request the app has seen, oldest first.
///
/// Bodies are kept in full and nothing is ever evicted, so the log grows for
/// as long as the app lives. Meant for short-lived test servers only.
#[derive(Clone, Debug, Default)]
pub struct Recorder(Arc<RwLock<Vec<RecordedRequest>>>);

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.0.read().await.clone()
    }

    async fn push(&self, request: RecordedRequest) {
        self.0.write().await.push(request);
    }
}

pub fn app() -> Router {
    app_with_recorder(Recorder::new())
}

pub fn app_with_recorder(recorder: Recorder) -> Router {
    Router::new()
        .route(
            "/merge-files",
            post(merge_files).layer(DefaultBodyLimit::disable()),
        )
        .route("/status/{code}", any(status_reply))
        .layer(middleware::from_fn_with_state(recorder, record_request))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with_recorder(
    listener: TcpListener,
    recorder: Recorder,
) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_recorder(recorder)).await
}

/// Buffer the body, record the request, then hand an identical request on.
async fn record_request(
    State(recorder): State<Recorder>,
    request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .map_err(|_| StatusCode::BAD_REQUEST)?;
    info!("{} {} ({} bytes)", parts.method, parts.uri, bytes.len());

    let headers = parts
        .headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();
    recorder
        .push(RecordedRequest {
            method: parts.method.to_string(),
            uri: parts.uri.to_string(),
            headers,
            body: bytes.to_vec(),
        })
        .await;

    Ok(next.run(Request::from_parts(parts, Body::from(bytes))).await)
}

async fn merge_files(mut multipart: Multipart) -> Result<Json<MergeReply>, MultipartError> {
    let mut web_file = None;
    let mut bitrix_file = None;
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        field.bytes().await?;
        match name.as_str() {
            WEB_FILE_FIELD => web_file = file_name,
            BITRIX_FILE_FIELD => bitrix_file = file_name,
            _ => {}
        }
    }
    Ok(Json(merge_reply(web_file, bitrix_file)))
}

/// Validate the uploaded file names the way the merge server does.
///
/// Failures are reported in the body with `code: 400`, not in the status.
pub fn merge_reply(web_file: Option<String>, bitrix_file: Option<String>) -> MergeReply {
    let (Some(web_file), Some(bitrix_file)) = (web_file, bitrix_file) else {
        return failure("both web_file and bitrix_file are required");
    };
    if !is_xlsx(&web_file) {
        return failure("web system file must have the .xlsx extension");
    }
    if !is_xlsx(&bitrix_file) {
        return failure("bitrix file must have the .xlsx extension");
    }
    MergeReply::Success {
        message: "files merged".to_string(),
        download_link: format!("/download?link=merged_{}.xlsx", Uuid::new_v4().simple()),
    }
}

fn is_xlsx(file_name: &str) -> bool {
    file_name.to_lowercase().ends_with(".xlsx")
}

fn failure(message: &str) -> MergeReply {
    MergeReply::Failure {
        message: message.to_string(),
        code: 400,
    }
}

async fn status_reply(Path(code): Path<u16>) -> (StatusCode, Json<MergeReply>) {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::BAD_REQUEST);
    let reply = MergeReply::Failure {
        message: status.canonical_reason().unwrap_or("unknown").to_string(),
        code: status.as_u16(),
    };
    (status, Json(reply))
}
