//! Multipart form construction for slip verification requests.

use std::path::{Path, PathBuf};

use bytes::Bytes;
use futures::TryStreamExt;
use mime::Mime;
use reqwest::Body;
use reqwest::multipart::{Form, Part};
use tokio_util::io::ReaderStream;

use crate::error::{Error, Result};

/// Fixed filename used for in-memory buffer uploads.
const BUFFER_FILE_NAME: &str = "slip.jpg";

/// A slip image to be verified.
///
/// A fresh multipart form is built from the source for every attempt, since
/// streamed request bodies can only be sent once.
#[derive(Debug, Clone)]
pub enum SlipSource {
    /// A slip image on disk, streamed lazily when the request body is sent
    File(PathBuf),
    /// A slip image already in memory
    Bytes(Bytes),
    /// A URL pointing at a slip image, submitted as a plain form field
    ImageUrl(String),
}

impl SlipSource {
    /// Create a source from a file path.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    /// Create a source from an in-memory image buffer.
    pub fn bytes(bytes: impl Into<Bytes>) -> Self {
        Self::Bytes(bytes.into())
    }

    /// Create a source from a remote image URL.
    pub fn image_url(url: impl Into<String>) -> Self {
        Self::ImageUrl(url.into())
    }

    /// Build the multipart form for one request attempt.
    ///
    /// File sources stay lazy: the file is opened only when the transport
    /// polls the body, so a missing file surfaces as a send-time transport
    /// failure rather than a build-time error.
    pub(crate) fn to_form(&self, file_field: &str, url_field: &str) -> Result<Form> {
        match self {
            Self::File(path) => {
                let part = file_part(path)?;
                Ok(Form::new().part(file_field.to_owned(), part))
            }
            Self::Bytes(bytes) => {
                // Filename and content type are fixed for buffer uploads,
                // matching what the provider expects for raw slip images.
                let part = Part::bytes(bytes.to_vec())
                    .file_name(BUFFER_FILE_NAME)
                    .mime_str(mime::IMAGE_JPEG.as_ref())
                    .map_err(|e| Error::config(format!("invalid buffer content type: {e}")))?;
                Ok(Form::new().part(file_field.to_owned(), part))
            }
            Self::ImageUrl(url) => Ok(Form::new().text(url_field.to_owned(), url.clone())),
        }
    }
}

/// Build a lazily-streamed file part.
fn file_part(path: &Path) -> Result<Part> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| BUFFER_FILE_NAME.to_owned());

    let owned = path.to_path_buf();
    let stream = futures::stream::once(async move { tokio::fs::File::open(owned).await })
        .map_ok(ReaderStream::new)
        .try_flatten();

    let mut part = Part::stream(Body::wrap_stream(stream)).file_name(file_name);

    if let Some(mime) = mime_for_path(path) {
        part = part
            .mime_str(mime.as_ref())
            .map_err(|e| Error::config(format!("invalid content type for '{}': {e}", path.display())))?;
    }

    Ok(part)
}

/// Guess the image content type from a file extension.
///
/// Unrecognized extensions fall back to the transport default
/// (`application/octet-stream`) instead of failing.
fn mime_for_path(path: &Path) -> Option<Mime> {
    let extension = path.extension()?.to_str()?;

    match extension.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some(mime::IMAGE_JPEG),
        "png" => Some(mime::IMAGE_PNG),
        "gif" => Some(mime::IMAGE_GIF),
        "bmp" => Some(mime::IMAGE_BMP),
        "webp" => "image/webp".parse().ok(),
        _ => None,
    }
}
