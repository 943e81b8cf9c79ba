//! Upload coordination: re-validates a file set and hands it to the transport.
//!
//! Observable state (`UploadStatus`) is published on a `watch` channel so any
//! number of views can follow it. Validation failures and transport failures
//! end up in the same `upload_error` slot; nothing is retried automatically.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::{watch, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::errors::WizardError;
use crate::models::CandidateFile;
use crate::transport::{TransportError, UploadResponse, UploadTransport};
use crate::validation::FileValidator;

/// Coarse progress shown while the transport call is pending.
///
/// The transport reports no byte-level progress, so this is a midpoint marker,
/// not a measurement.
pub const PENDING_PROGRESS: u8 = 50;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UploadStatus {
    pub is_uploading: bool,
    pub upload_error: Option<String>,
    pub upload_progress: u8,
}

pub struct UploadCoordinator {
    validator: Arc<FileValidator>,
    transport: Arc<dyn UploadTransport>,
    status: watch::Sender<UploadStatus>,
    in_flight: Mutex<()>,
}

impl UploadCoordinator {
    pub fn new(validator: Arc<FileValidator>, transport: Arc<dyn UploadTransport>) -> Self {
        let (status, _) = watch::channel(UploadStatus::default());
        Self {
            validator,
            transport,
            status,
            in_flight: Mutex::new(()),
        }
    }

    pub fn status(&self) -> UploadStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<UploadStatus> {
        self.status.subscribe()
    }

    pub fn reset_error(&self) {
        self.status.send_modify(|s| s.upload_error = None);
    }

    pub async fn upload(&self, files: &[CandidateFile]) -> Result<UploadResponse, WizardError> {
        self.upload_cancellable(files, &CancellationToken::new()).await
    }

    /// Like [`upload`](Self::upload), but gives up as soon as `cancel` fires,
    /// whether the set is still being validated or already on the wire.
    pub async fn upload_cancellable(
        &self,
        files: &[CandidateFile],
        cancel: &CancellationToken,
    ) -> Result<UploadResponse, WizardError> {
        let _guard = self
            .in_flight
            .try_lock()
            .map_err(|_| WizardError::UploadInFlight)?;

        self.reset_error();

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(WizardError::Cancelled),
            result = self.validate_and_transmit(files) => result,
        };

        let upload_error = result.as_ref().err().map(|e| e.to_string());
        self.status.send_modify(|s| {
            s.is_uploading = false;
            s.upload_progress = 0;
            s.upload_error = upload_error;
        });

        result
    }

    async fn validate_and_transmit(
        &self,
        files: &[CandidateFile],
    ) -> Result<UploadResponse, WizardError> {
        self.validator.validate(files).await.into_result()?;

        self.status.send_modify(|s| {
            s.is_uploading = true;
            s.upload_progress = PENDING_PROGRESS;
        });

        let response = self.transport.transmit(files).await.map_err(|e| {
            error!(files = files.len(), error = %e, "Upload transport failed");
            WizardError::Transport(e)
        })?;

        if !response.success {
            let message = response
                .error
                .clone()
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| response.message.clone());
            error!(files = files.len(), %message, "Upload rejected by server");
            return Err(WizardError::Transport(TransportError::Unsuccessful { message }));
        }

        info!(
            files = files.len(),
            file_id = response.file_id.as_deref().unwrap_or("-"),
            "Upload complete"
        );
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use tokio::sync::Notify;

    use super::*;
    use crate::transport::MockUploadTransport;
    use crate::validation::files::test_support::{png, validator};

    fn accepted() -> UploadResponse {
        UploadResponse {
            success: true,
            message: "stored".to_string(),
            file_id: Some("f-1".to_string()),
            error: None,
        }
    }

    fn coordinator(transport: impl UploadTransport + 'static) -> UploadCoordinator {
        UploadCoordinator::new(Arc::new(validator(1)), Arc::new(transport))
    }

    /// Blocks inside `transmit` until released, so tests can observe the pending state.
    struct GatedTransport {
        entered: Notify,
        release: Notify,
    }

    impl GatedTransport {
        fn new() -> Self {
            Self {
                entered: Notify::new(),
                release: Notify::new(),
            }
        }
    }

    #[async_trait]
    impl UploadTransport for Arc<GatedTransport> {
        async fn transmit(&self, _files: &[CandidateFile]) -> Result<UploadResponse, TransportError> {
            self.entered.notify_one();
            self.release.notified().await;
            Ok(accepted())
        }
    }

    #[tokio::test]
    async fn test_empty_upload_never_reaches_transport() {
        let mut transport = MockUploadTransport::new();
        transport.expect_transmit().never();
        let coord = coordinator(transport);

        let err = coord.upload(&[]).await.unwrap_err();
        assert_eq!(err.to_string(), "No files selected.");
        assert_eq!(
            coord.status(),
            UploadStatus {
                is_uploading: false,
                upload_error: Some("No files selected.".to_string()),
                upload_progress: 0,
            }
        );
    }

    #[tokio::test]
    async fn test_invalid_set_never_reaches_transport() {
        let mut transport = MockUploadTransport::new();
        transport.expect_transmit().never();
        let coord = coordinator(transport);

        let files: Vec<_> = (0..4).map(|i| png(&format!("{i}.png"), 10)).collect();
        assert!(coord.upload(&files).await.unwrap_err().is_user_correctable());
    }

    #[tokio::test]
    async fn test_successful_upload() {
        let mut transport = MockUploadTransport::new();
        transport
            .expect_transmit()
            .withf(|files| files.len() == 2)
            .times(1)
            .returning(|_| Ok(accepted()));
        let coord = coordinator(transport);

        let response = coord
            .upload(&[png("a.png", 10), png("b.png", 10)])
            .await
            .unwrap();
        assert_eq!(response.file_id.as_deref(), Some("f-1"));
        assert_eq!(coord.status(), UploadStatus::default());
    }

    #[tokio::test]
    async fn test_transport_failure_surfaces_as_upload_error() {
        let mut transport = MockUploadTransport::new();
        transport.expect_transmit().times(1).returning(|_| {
            Err(TransportError::Rejected {
                status: 503,
                message: "Upload failed: 503 Service Unavailable".to_string(),
            })
        });
        let coord = coordinator(transport);

        let err = coord.upload(&[png("a.png", 10)]).await.unwrap_err();
        assert!(matches!(err, WizardError::Transport(_)));
        let status = coord.status();
        assert!(!status.is_uploading);
        assert_eq!(
            status.upload_error.as_deref(),
            Some("Upload failed: 503 Service Unavailable")
        );
    }

    #[tokio::test]
    async fn test_unsuccessful_body_is_a_failure() {
        let mut transport = MockUploadTransport::new();
        transport.expect_transmit().returning(|_| {
            Ok(UploadResponse {
                success: false,
                message: "could not parse".to_string(),
                file_id: None,
                error: None,
            })
        });
        let coord = coordinator(transport);

        let err = coord.upload(&[png("a.png", 10)]).await.unwrap_err();
        assert!(matches!(
            err,
            WizardError::Transport(TransportError::Unsuccessful { .. })
        ));
        assert_eq!(err.to_string(), "could not parse");
    }

    #[tokio::test]
    async fn test_retry_after_failure_clears_error() {
        let mut transport = MockUploadTransport::new();
        let mut seq = mockall::Sequence::new();
        transport
            .expect_transmit()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                Err(TransportError::Rejected {
                    status: 500,
                    message: "boom".to_string(),
                })
            });
        transport
            .expect_transmit()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(accepted()));
        let coord = coordinator(transport);

        assert!(coord.upload(&[png("a.png", 10)]).await.is_err());
        assert!(coord.status().upload_error.is_some());
        assert!(coord.upload(&[png("a.png", 10)]).await.is_ok());
        assert!(coord.status().upload_error.is_none());
    }

    #[tokio::test]
    async fn test_pending_state_and_single_flight() {
        let gate = Arc::new(GatedTransport::new());
        let coord = Arc::new(coordinator(gate.clone()));

        let task = {
            let coord = coord.clone();
            tokio::spawn(async move { coord.upload(&[png("a.png", 10)]).await })
        };

        gate.entered.notified().await;
        let status = coord.status();
        assert!(status.is_uploading);
        assert_eq!(status.upload_progress, PENDING_PROGRESS);

        let second = coord.upload(&[png("b.png", 10)]).await.unwrap_err();
        assert!(matches!(second, WizardError::UploadInFlight));

        gate.release.notify_one();
        assert!(task.await.unwrap().is_ok());
        assert_eq!(coord.status(), UploadStatus::default());
    }

    #[tokio::test]
    async fn test_cancel_while_in_flight() {
        let gate = Arc::new(GatedTransport::new());
        let coord = Arc::new(coordinator(gate.clone()));
        let cancel = CancellationToken::new();

        let task = {
            let coord = coord.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move {
                coord
                    .upload_cancellable(&[png("a.png", 10)], &cancel)
                    .await
            })
        };

        gate.entered.notified().await;
        cancel.cancel();

        let err = task.await.unwrap().unwrap_err();
        assert!(matches!(err, WizardError::Cancelled));
        let status = coord.status();
        assert!(!status.is_uploading);
        assert_eq!(status.upload_error.as_deref(), Some("Upload cancelled."));
    }
}
