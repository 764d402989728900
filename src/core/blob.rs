//! Binary export payloads (PDF/Excel) and saving them to disk

use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::core::client::ApiResponse;

/// Binary response body with the metadata needed to save it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
    /// Filename suggested by the server via `Content-Disposition`
    pub filename: Option<String>,
}

impl Blob {
    pub(crate) fn from_response(response: ApiResponse) -> Self {
        let filename = response
            .content_disposition
            .as_deref()
            .and_then(filename_from_disposition);
        Self {
            bytes: response.body,
            content_type: response.content_type,
            filename,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum BlobError {
    #[error("download directory does not exist: {0}")]
    MissingDirectory(PathBuf),

    #[error("invalid filename: {0}")]
    InvalidFilename(String),

    #[error("failed to save download: {0}")]
    Io(#[from] std::io::Error),
}

/// Extract the filename from a `Content-Disposition` header value
///
/// Handles `filename="a b.pdf"`, `filename=a.pdf` and the RFC 5987
/// `filename*=UTF-8''a.pdf` form (the latter wins when both are present).
pub fn filename_from_disposition(header: &str) -> Option<String> {
    let mut plain = None;
    let mut extended = None;

    for part in header.split(';').map(str::trim) {
        if let Some(value) = part.strip_prefix("filename*=") {
            let value = value.trim_matches('"');
            let name = value.rsplit("''").next().unwrap_or(value);
            if !name.is_empty() {
                extended = Some(name.to_string());
            }
        } else if let Some(value) = part.strip_prefix("filename=") {
            let name = value.trim().trim_matches('"');
            if !name.is_empty() {
                plain = Some(name.to_string());
            }
        }
    }

    extended.or(plain)
}

/// Save a blob into `dir`, named after the server's suggestion or `fallback_name`
///
/// The bytes are staged in a single temporary file inside `dir` and moved
/// into place once fully written. If anything fails the temporary file is
/// dropped, so no partial download is left behind.
pub fn download_blob(blob: &Blob, dir: &Path, fallback_name: &str) -> Result<PathBuf, BlobError> {
    if !dir.is_dir() {
        return Err(BlobError::MissingDirectory(dir.to_path_buf()));
    }

    let name = blob.filename.as_deref().unwrap_or(fallback_name);
    let name = sanitize_filename(name)?;
    let target = dir.join(&name);

    let mut staged = tempfile::NamedTempFile::new_in(dir)?;
    staged.write_all(&blob.bytes)?;
    staged.flush()?;
    staged.persist(&target).map_err(|e| BlobError::Io(e.error))?;

    debug!(path = %target.display(), bytes = blob.len(), "saved download");
    Ok(target)
}

/// Keep only the final path component so a server-supplied name cannot escape `dir`
fn sanitize_filename(name: &str) -> Result<String, BlobError> {
    let base = name.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or("").trim();
    if base.is_empty() || base == "." || base == ".." {
        return Err(BlobError::InvalidFilename(name.to_string()));
    }
    Ok(base.to_string())
}
