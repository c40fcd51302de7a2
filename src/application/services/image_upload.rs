//! Image selection, validation and upload.

use std::sync::Arc;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::error_messages::user_message;
use crate::application::dto::{UploadState, UploadStatus, ValidationResult};
use crate::domain::entities::{LocalFile, UploadKind, UploadedFile};
use crate::domain::errors::ApiError;
use crate::domain::ports::UploadPort;

const PROGRESS_STEP: u8 = 10;
const PROGRESS_CEILING: u8 = 90;
const PROGRESS_TICK: Duration = Duration::from_millis(200);

/// Default size limit: 5 MiB.
pub const DEFAULT_MAX_BYTES: u64 = 5 * 1024 * 1024;

/// Default MIME allow-list.
pub const DEFAULT_ALLOWED_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/webp", "image/gif"];

/// What a file must satisfy before it is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPolicy {
    /// Largest accepted file.
    pub max_bytes: u64,
    /// Empty means any type.
    pub allowed_types: Vec<String>,
    /// Use the local data URL when the server has no upload endpoint.
    pub inline_fallback: bool,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
            allowed_types: DEFAULT_ALLOWED_TYPES.iter().map(ToString::to_string).collect(),
            inline_fallback: false,
        }
    }
}

impl UploadPolicy {
    /// Checks type then size.
    /// Checks `file` without sending it.
    #[must_use]
    pub fn validate(&self, file: &LocalFile) -> ValidationResult {
        if !self.allowed_types.is_empty()
            && !self
                .allowed_types
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(file.mime()))
        {
            return ValidationResult::rejected(format!(
                "نوع الملف غير مدعوم. الأنواع المسموحة: {}",
                self.allowed_labels()
            ));
        }

        self.check_size(file.size())
    }

    /// Checks a byte count against the limit, before the file is read.
    #[must_use]
    pub fn check_size(&self, size: u64) -> ValidationResult {
        if size > self.max_bytes {
            return ValidationResult::rejected(format!(
                "حجم الملف يتجاوز الحد الأقصى ({})",
                format_size(self.max_bytes)
            ));
        }
        ValidationResult::ok()
    }

    fn allowed_labels(&self) -> String {
        self.allowed_types
            .iter()
            .map(|mime| {
                mime.rsplit('/')
                    .next()
                    .unwrap_or(mime)
                    .to_ascii_uppercase()
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[allow(clippy::cast_precision_loss)]
fn format_size(bytes: u64) -> String {
    const MIB: u64 = 1024 * 1024;
    if bytes >= MIB {
        let value = bytes as f64 / MIB as f64;
        if bytes % MIB == 0 {
            format!("{value:.0} ميجابايت")
        } else {
            format!("{value:.1} ميجابايت")
        }
    } else {
        format!("{} كيلوبايت", bytes.div_ceil(1024))
    }
}

/// Builds a `data:` URL for local preview.
pub async fn data_url(file: &LocalFile) -> String {
    let mime = file.mime().to_string();
    let bytes = file.bytes().clone();
    let encode = move || format!("data:{mime};base64,{}", STANDARD.encode(&bytes));

    match tokio::task::spawn_blocking(encode.clone()).await {
        Ok(url) => url,
        Err(e) => {
            debug!(error = %e, "Preview task failed, encoding inline");
            encode()
        }
    }
}

/// Drives one upload slot: validation, preview, simulated progress and retry.
///
/// State changes are published on a watch channel so a view can follow the
/// progress while [`Self::upload`] is awaited.
pub struct ImageUploader {
    port: Arc<dyn UploadPort>,
    policy: UploadPolicy,
    kind: UploadKind,
    state: watch::Sender<UploadState>,
    selected: Mutex<Option<LocalFile>>,
}

impl ImageUploader {
    /// Idle uploader for the image endpoint.
    #[must_use]
    pub fn new(port: Arc<dyn UploadPort>, policy: UploadPolicy) -> Self {
        Self {
            port,
            policy,
            kind: UploadKind::Image,
            state: watch::Sender::new(UploadState::default()),
            selected: Mutex::new(None),
        }
    }

    /// Targets another upload endpoint.
    #[must_use]
    pub fn with_kind(mut self, kind: UploadKind) -> Self {
        self.kind = kind;
        self
    }

    /// Limits applied to selected files.
    #[must_use]
    pub const fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    /// Checks `file` without sending it.
    #[must_use]
    pub fn validate(&self, file: &LocalFile) -> ValidationResult {
        self.policy.validate(file)
    }

    /// Follows state changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<UploadState> {
        self.state.subscribe()
    }

    /// Current state snapshot.
    #[must_use]
    pub fn state(&self) -> UploadState {
        self.state.borrow().clone()
    }

    /// Validates and uploads a newly selected file.
    ///
    /// # Errors
    /// Returns validation error without a request for rejected files, or the
    /// upload error. The file is kept for [`Self::retry`] after upload errors.
    pub async fn upload(&self, file: LocalFile) -> Result<UploadedFile, ApiError> {
        let validation = self.validate(&file);
        if !validation.valid {
            let message = validation.error.unwrap_or_default();
            debug!(name = file.name(), mime = file.mime(), reason = %message, "File rejected");
            *self.selected.lock() = None;
            self.state.send_replace(UploadState {
                status: UploadStatus::Failed,
                error: Some(message.clone()),
                ..UploadState::default()
            });
            return Err(ApiError::validation(message));
        }

        *self.selected.lock() = Some(file.clone());
        self.state.send_replace(UploadState {
            status: UploadStatus::Uploading,
            ..UploadState::default()
        });
        self.send(file).await
    }

    /// Sends the last selected file again.
    ///
    /// # Errors
    /// Returns validation error if nothing is selected, or the upload error.
    pub async fn retry(&self) -> Result<UploadedFile, ApiError> {
        let file = self
            .selected
            .lock()
            .clone()
            .ok_or_else(|| ApiError::validation("لم يتم اختيار ملف"))?;

        debug!(name = file.name(), "Retrying upload");
        self.state.send_modify(|state| {
            state.status = UploadStatus::Uploading;
            state.progress = 0;
            state.error = None;
        });
        self.send(file).await
    }

    /// Forgets the selection.
    pub fn reset(&self) {
        *self.selected.lock() = None;
        self.state.send_replace(UploadState::default());
    }

    async fn send(&self, file: LocalFile) -> Result<UploadedFile, ApiError> {
        let preview = async {
            match self.kind {
                UploadKind::Image => Some(self.preview(&file).await),
                UploadKind::File => None,
            }
        };
        let (preview, result) = tokio::join!(preview, self.upload_with_progress(&file));

        match (result, preview) {
            (Ok(uploaded), _) => {
                info!(name = file.name(), url = %uploaded.url, "Upload complete");
                self.complete(&uploaded);
                Ok(uploaded)
            }
            (Err(e), Some(preview))
                if self.policy.inline_fallback && matches!(e.status_code(), Some(404 | 501)) =>
            {
                warn!(error = %e, "Upload endpoint unavailable, keeping image inline");
                let uploaded = UploadedFile {
                    url: preview,
                    file_name: Some(file.name().to_string()),
                    size: Some(file.size()),
                    mime_type: Some(file.mime().to_string()),
                };
                self.complete(&uploaded);
                Ok(uploaded)
            }
            (Err(e), _) => {
                warn!(name = file.name(), error = %e, "Upload failed");
                let message = user_message(&e);
                self.state.send_modify(|state| {
                    state.status = UploadStatus::Failed;
                    state.progress = 0;
                    state.error = Some(message);
                });
                Err(e)
            }
        }
    }

    async fn preview(&self, file: &LocalFile) -> String {
        let url = data_url(file).await;
        self.state.send_if_modified(|state| {
            if state.preview.is_some() || state.url.is_some() {
                return false;
            }
            state.preview = Some(url.clone());
            true
        });
        url
    }

    async fn upload_with_progress(&self, file: &LocalFile) -> Result<UploadedFile, ApiError> {
        let upload = self.port.upload(self.kind, file);
        tokio::pin!(upload);

        let mut ticker = tokio::time::interval_at(
            tokio::time::Instant::now() + PROGRESS_TICK,
            PROGRESS_TICK,
        );

        loop {
            tokio::select! {
                result = &mut upload => return result,
                _ = ticker.tick() => self.advance(),
            }
        }
    }

    fn advance(&self) {
        self.state.send_if_modified(|state| {
            if state.progress >= PROGRESS_CEILING {
                return false;
            }
            state.progress = (state.progress + PROGRESS_STEP).min(PROGRESS_CEILING);
            true
        });
    }

    fn complete(&self, uploaded: &UploadedFile) {
        self.state.send_replace(UploadState {
            status: UploadStatus::Done,
            progress: 100,
            preview: Some(uploaded.url.clone()),
            url: Some(uploaded.url.clone()),
            error: None,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::mocks::{MockUploadPort, uploaded};

    fn png(size: usize) -> LocalFile {
        LocalFile::new("cover.png", "image/png", vec![7_u8; size])
    }

    #[test]
    fn test_pdf_rejected_by_type() {
        let result = UploadPolicy::default().validate(&LocalFile::new(
            "cv.pdf",
            "application/pdf",
            vec![0_u8; 10],
        ));

        assert!(!result.valid);
        let error = result.error.unwrap();
        assert!(error.contains("JPEG, PNG, WEBP, GIF"));
    }

    #[test]
    fn test_size_limit() {
        let policy = UploadPolicy::default();
        assert!(policy.validate(&png(5 * 1024 * 1024)).valid);

        let result = policy.validate(&png(5 * 1024 * 1024 + 1));
        assert!(!result.valid);
        assert!(result.error.unwrap().contains("5 ميجابايت"));
        assert!(!policy.check_size(DEFAULT_MAX_BYTES + 1).valid);
        assert!(policy.check_size(DEFAULT_MAX_BYTES).valid);
    }

    #[test]
    fn test_empty_allow_list_accepts_any_type() {
        let policy = UploadPolicy {
            allowed_types: Vec::new(),
            ..UploadPolicy::default()
        };
        assert!(policy.validate(&LocalFile::new("a.zip", "application/zip", vec![1_u8])).valid);
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(5 * 1024 * 1024), "5 ميجابايت");
        assert_eq!(format_size(1536 * 1024), "1.5 ميجابايت");
        assert_eq!(format_size(1000), "1 كيلوبايت");
    }

    #[tokio::test]
    async fn test_data_url() {
        let url = data_url(&LocalFile::new("a.gif", "image/gif", b"GIF".to_vec())).await;
        assert_eq!(url, "data:image/gif;base64,R0lG");
    }

    #[tokio::test]
    async fn test_invalid_file_never_reaches_network() {
        let port = Arc::new(MockUploadPort::succeeding("https://cdn.example.com/x.png"));
        let uploader = ImageUploader::new(port.clone(), UploadPolicy::default());

        let result = uploader
            .upload(LocalFile::new("cv.pdf", "application/pdf", vec![0_u8; 10]))
            .await;

        assert!(matches!(result, Err(ApiError::Validation { .. })));
        assert_eq!(port.calls(), 0);
        let state = uploader.state();
        assert_eq!(state.status, UploadStatus::Failed);
        assert!(!state.error.unwrap().is_empty());
        assert!(uploader.retry().await.is_err());
    }

    #[tokio::test]
    async fn test_success_swaps_preview_to_server_url() {
        let port = Arc::new(MockUploadPort::succeeding("https://cdn.example.com/cover.png"));
        let uploader = ImageUploader::new(port.clone(), UploadPolicy::default());

        let uploaded = uploader.upload(png(16)).await.unwrap();

        assert_eq!(uploaded.url, "https://cdn.example.com/cover.png");
        let state = uploader.state();
        assert_eq!(state.status, UploadStatus::Done);
        assert_eq!(state.progress, 100);
        assert_eq!(state.preview.as_deref(), Some("https://cdn.example.com/cover.png"));
        assert_eq!(port.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_progress_stops_at_ceiling_while_in_flight() {
        let port = Arc::new(
            MockUploadPort::succeeding("https://cdn.example.com/slow.png")
                .with_delay(Duration::from_secs(5)),
        );
        let uploader = ImageUploader::new(port, UploadPolicy::default());
        let state = uploader.subscribe();

        let observe = async {
            tokio::time::sleep(Duration::from_millis(1100)).await;
            let early = state.borrow().progress;
            tokio::time::sleep(Duration::from_secs(3)).await;
            let late = state.borrow().progress;
            (early, late)
        };

        let (result, (early, late)) = tokio::join!(uploader.upload(png(16)), observe);

        result.unwrap();
        assert_eq!(early, 50);
        assert_eq!(late, PROGRESS_CEILING);
        assert_eq!(uploader.state().progress, 100);
    }

    #[tokio::test]
    async fn test_failure_keeps_preview_and_retry_succeeds() {
        let port = Arc::new(MockUploadPort::new(vec![
            Err(ApiError::status(500, "disk full")),
            Ok(uploaded("https://cdn.example.com/cover.png")),
        ]));
        let uploader = ImageUploader::new(port.clone(), UploadPolicy::default());

        assert!(uploader.upload(png(16)).await.is_err());
        let failed = uploader.state();
        assert_eq!(failed.status, UploadStatus::Failed);
        assert!(failed.preview.unwrap().starts_with("data:image/png;base64,"));
        assert!(failed.error.is_some());

        let uploaded = uploader.retry().await.unwrap();
        assert_eq!(uploaded.url, "https://cdn.example.com/cover.png");
        assert_eq!(port.calls(), 2);
        assert!(uploader.state().error.is_none());
    }

    #[tokio::test]
    async fn test_inline_fallback_only_when_enabled() {
        let missing = || Arc::new(MockUploadPort::new(vec![Err(ApiError::status(404, "Not Found"))]));

        let strict = ImageUploader::new(missing(), UploadPolicy::default());
        assert!(strict.upload(png(4)).await.is_err());

        let lenient = ImageUploader::new(
            missing(),
            UploadPolicy {
                inline_fallback: true,
                ..UploadPolicy::default()
            },
        );
        let uploaded = lenient.upload(png(4)).await.unwrap();
        assert!(uploaded.url.starts_with("data:image/png;base64,"));
        assert_eq!(lenient.state().status, UploadStatus::Done);
    }

    #[tokio::test]
    async fn test_document_upload_builds_no_preview() {
        let port = Arc::new(MockUploadPort::new(vec![Err(ApiError::status(404, "Not Found"))]));
        let uploader = ImageUploader::new(
            port,
            UploadPolicy {
                allowed_types: Vec::new(),
                inline_fallback: true,
                ..UploadPolicy::default()
            },
        )
        .with_kind(UploadKind::File);

        let result = uploader
            .upload(LocalFile::new("cv.pdf", "application/pdf", vec![0_u8; 64]))
            .await;

        assert!(matches!(result, Err(ApiError::Status { status: 404, .. })));
        let state = uploader.state();
        assert_eq!(state.status, UploadStatus::Failed);
        assert!(state.preview.is_none());
    }
}
