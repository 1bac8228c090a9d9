use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::errors::{AppError, AppResult};
use crate::models::upload_model::{SelectedFile, UploadPhase, UploadState, MAX_UPLOAD_BYTES};
use crate::services::storage_service::ImageHost;

const PROGRESS_TICK: Duration = Duration::from_millis(200);
const PROGRESS_STEP: u8 = 10;
const PROGRESS_CEILING: u8 = 90;

pub const NOT_AN_IMAGE: &str = "Please upload an image file";
pub const FILE_TOO_LARGE: &str = "File size should be less than 5MB";
pub const UPLOAD_FAILED: &str = "Failed to upload image. Please try again.";

/// Bytes of the selected file kept around for display until the remote URL replaces them.
struct LocalPreview {
    url: String,
    _bytes: Arc<[u8]>,
}

/// Runs one thumbnail upload at a time and publishes its state.
///
/// The host gives no byte-level progress, so while a transfer runs the percentage is
/// advanced on a timer up to 90 and set to 100 once the host confirms. Display it as
/// "working", never as a measurement.
#[derive(Clone)]
pub struct UploadCoordinator {
    host: Arc<dyn ImageHost>,
    state: Arc<watch::Sender<UploadState>>,
    preview: Arc<Mutex<Option<LocalPreview>>>,
    generation: Arc<AtomicU64>,
}

impl UploadCoordinator {
    pub fn new(host: Arc<dyn ImageHost>) -> Self {
        let (state, _) = watch::channel(UploadState::default());
        Self {
            host,
            state: Arc::new(state),
            preview: Arc::new(Mutex::new(None)),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<UploadState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> UploadState {
        self.state.borrow().clone()
    }

    pub fn is_uploading(&self) -> bool {
        matches!(
            self.state.borrow().phase,
            UploadPhase::Validating | UploadPhase::Uploading
        )
    }

    /// URL of the local preview still holding file bytes, if any.
    pub fn live_preview(&self) -> Option<String> {
        self.lock_preview().as_ref().map(|p| p.url.clone())
    }

    pub fn validate(file: &SelectedFile) -> Result<(), String> {
        if !file.is_image() {
            return Err(NOT_AN_IMAGE.to_string());
        }
        if file.size() > MAX_UPLOAD_BYTES {
            return Err(FILE_TOO_LARGE.to_string());
        }
        Ok(())
    }

    /// Validate `file`, send it to the image host and return its public URL.
    ///
    /// Rejected files never reach the network. On failure the caller's thumbnail must be
    /// left alone; the coordinator records the error and accepts a new selection.
    pub async fn upload(&self, file: SelectedFile) -> AppResult<String> {
        let mut accepted = false;
        self.state.send_if_modified(|state| {
            if !state.phase.accepts_selection() {
                return false;
            }
            state.phase = UploadPhase::Validating;
            state.error = None;
            accepted = true;
            true
        });
        if !accepted {
            return Err(AppError::Conflict(
                "An upload is already in progress".to_string(),
            ));
        }

        if let Err(message) = Self::validate(&file) {
            tracing::warn!(file_name = %file.file_name, reason = %message, "Rejected image");
            self.state.send_modify(|state| {
                state.phase = UploadPhase::Idle;
                state.error = Some(message.clone());
            });
            return Err(AppError::Validation(message));
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let preview_url = self.replace_preview(&file);

        self.state.send_modify(|state| {
            state.phase = UploadPhase::Uploading;
            state.progress_percent = 0;
            state.preview_url = Some(preview_url);
            state.remote_url = None;
        });

        let ticker = self.spawn_progress_ticker(generation);
        let result = self.host.upload_image(&file).await;
        ticker.abort();

        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(file_name = %file.file_name, "Upload finished after reset; ignoring");
            return Err(AppError::Discarded);
        }

        match result {
            Ok(url) => {
                self.release_preview();
                self.state.send_modify(|state| {
                    state.phase = UploadPhase::Done;
                    state.progress_percent = 100;
                    state.preview_url = Some(url.clone());
                    state.remote_url = Some(url.clone());
                    state.error = None;
                });
                tracing::info!(file_name = %file.file_name, url = %url, "Image uploaded");
                Ok(url)
            }
            Err(e) => {
                tracing::error!(file_name = %file.file_name, error = %e, "Upload error");
                self.state.send_modify(|state| {
                    state.phase = UploadPhase::Error;
                    state.progress_percent = 0;
                    state.remote_url = None;
                    state.error = Some(UPLOAD_FAILED.to_string());
                });
                Err(e)
            }
        }
    }

    /// Forget everything. An upload still in flight will be ignored when it completes.
    pub fn reset(&self) {
        self.reset_with_preview(None);
    }

    /// Reset, showing an already-hosted image (edit mode) as the preview.
    pub fn reset_with_preview(&self, preview_url: Option<String>) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        self.release_preview();
        self.state.send_replace(UploadState {
            preview_url: preview_url.filter(|u| !u.is_empty()),
            ..UploadState::default()
        });
    }

    fn lock_preview(&self) -> std::sync::MutexGuard<'_, Option<LocalPreview>> {
        self.preview.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn replace_preview(&self, file: &SelectedFile) -> String {
        let url = format!("preview://{}/{}", cuid2::create_id(), file.file_name);
        let previous = self.lock_preview().replace(LocalPreview {
            url: url.clone(),
            _bytes: Arc::from(file.bytes.as_slice()),
        });
        if let Some(previous) = previous {
            tracing::debug!(url = %previous.url, "Released previous preview");
        }
        url
    }

    fn release_preview(&self) {
        if let Some(preview) = self.lock_preview().take() {
            tracing::debug!(url = %preview.url, "Released preview");
        }
    }

    fn spawn_progress_ticker(&self, generation: u64) -> JoinHandle<()> {
        let state = Arc::clone(&self.state);
        let current = Arc::clone(&self.generation);

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(PROGRESS_TICK);
            interval.tick().await;

            loop {
                interval.tick().await;
                if current.load(Ordering::SeqCst) != generation {
                    break;
                }

                let mut finished = false;
                state.send_if_modified(|s| {
                    if s.phase != UploadPhase::Uploading || s.progress_percent >= PROGRESS_CEILING {
                        finished = true;
                        return false;
                    }
                    s.progress_percent = (s.progress_percent + PROGRESS_STEP).min(PROGRESS_CEILING);
                    true
                });
                if finished {
                    break;
                }
            }
        })
    }
}
