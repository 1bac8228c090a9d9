use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::AppResult;

pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadPhase {
    #[default]
    Idle,
    Validating,
    Uploading,
    Done,
    Error,
}

impl UploadPhase {
    /// Whether the file input is enabled. A failed upload can be retried directly.
    pub fn accepts_selection(&self) -> bool {
        matches!(self, UploadPhase::Idle | UploadPhase::Done | UploadPhase::Error)
    }
}

/// Snapshot published to observers of an upload.
///
/// `progress_percent` is simulated while uploading and only reaches 100 on a confirmed
/// completion; treat it as an indication that work is happening, not a byte count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadState {
    pub phase: UploadPhase,
    pub progress_percent: u8,
    pub preview_url: Option<String>,
    pub remote_url: Option<String>,
    pub error: Option<String>,
}

/// An image chosen by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub async fn from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let mime_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        Ok(Self::new(file_name, mime_type, bytes))
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

/// Image host reply; only the public HTTPS URL is used.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadResponse {
    pub secure_url: String,
}
