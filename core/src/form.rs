//! Multipart form payloads.
//!
//! # Design
//! `FormPayload` is assembled by the caller and handed to
//! `reqwest::multipart::Form` for RFC 7578 encoding. The client never looks
//! inside it: whatever entries the caller adds are encoded in insertion order
//! and sent unchanged. Every encoding picks a fresh random boundary, so
//! `EncodedForm` carries the content type and the body together.

use std::io;
use std::path::Path;

use futures_util::TryStreamExt;
use reqwest::multipart::{Form, Part};

use crate::error::ApiError;

/// Field name the merge endpoint reads the web-system export from.
pub const WEB_FILE_FIELD: &str = "web_file";
/// Field name the merge endpoint reads the Bitrix export from.
pub const BITRIX_FILE_FIELD: &str = "bitrix_file";

/// File content for one multipart part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    file_name: String,
    content_type: String,
    data: Vec<u8>,
}

impl FilePart {
    /// Create a part, guessing its content type from the file name extension.
    pub fn new(file_name: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        let file_name = file_name.into();
        let content_type = mime_guess::from_path(&file_name)
            .first_or_octet_stream()
            .to_string();
        Self {
            file_name,
            content_type,
            data: data.into(),
        }
    }

    /// Read a file from disk. The part's file name is the last path component.
    pub fn from_path(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("{} has no file name", path.display()),
                )
            })?;
        let data = std::fs::read(path)?;
        Ok(Self::new(file_name, data))
    }

    /// Override the guessed content type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// One named entry of a form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEntry {
    Text { name: String, value: String },
    File { name: String, part: FilePart },
}

impl FormEntry {
    pub fn name(&self) -> &str {
        match self {
            FormEntry::Text { name, .. } | FormEntry::File { name, .. } => name.as_str(),
        }
    }
}

/// A caller-built multipart form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormPayload {
    entries: Vec<FormEntry>,
}

/// A form rendered to bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedForm {
    pub boundary: String,
    /// `multipart/form-data; boundary=...` matching `body`.
    pub content_type: String,
    pub body: Vec<u8>,
}

impl FormPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// The two-file form posted to the merge endpoint.
    pub fn merge_files(web_file: FilePart, bitrix_file: FilePart) -> Self {
        Self::new()
            .file(WEB_FILE_FIELD, web_file)
            .file(BITRIX_FILE_FIELD, bitrix_file)
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.push(FormEntry::Text {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn file(mut self, name: impl Into<String>, part: FilePart) -> Self {
        self.entries.push(FormEntry::File {
            name: name.into(),
            part,
        });
        self
    }

    pub fn entries(&self) -> &[FormEntry] {
        &self.entries
    }

    /// Build the equivalent `reqwest` form. Fails only on an unparsable
    /// content type set through `FilePart::with_content_type`.
    pub fn to_multipart(&self) -> Result<Form, ApiError> {
        let mut form = Form::new();
        for entry in &self.entries {
            form = match entry {
                FormEntry::Text { name, value } => form.text(name.clone(), value.clone()),
                FormEntry::File { name, part } => {
                    let part = Part::bytes(part.data.clone())
                        .file_name(part.file_name.clone())
                        .mime_str(&part.content_type)
                        .map_err(ApiError::Form)?;
                    form.part(name.clone(), part)
                }
            };
        }
        Ok(form)
    }

    /// Encode the form as a `multipart/form-data` body.
    ///
    /// All parts are in memory, so the stream never waits on I/O.
    pub async fn encode(&self) -> Result<EncodedForm, ApiError> {
        let form = self.to_multipart()?;
        let boundary = form.boundary().to_string();
        let body = form
            .into_stream()
            .map_ok(|chunk| chunk.to_vec())
            .try_concat()
            .await
            .map_err(ApiError::Form)?;
        Ok(EncodedForm {
            content_type: format!("multipart/form-data; boundary={boundary}"),
            boundary,
            body,
        })
    }
}
