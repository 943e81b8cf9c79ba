use thiserror::Error;

use crate::transport::TransportError;

/// Crate-level error type.
///
/// Every variant renders as a single human-readable message suitable for
/// replacing whatever error the wizard was showing before.
#[derive(Debug, Error)]
pub enum WizardError {
    /// User-correctable: bad format, too many files, oversized, too many pages.
    #[error("{0}")]
    Validation(String),

    /// Network or server failure during an actual upload.
    #[error("{0}")]
    Transport(#[from] TransportError),

    #[error("An upload is already in progress.")]
    UploadInFlight,

    #[error("Upload cancelled.")]
    Cancelled,
}

impl WizardError {
    pub fn validation(reason: impl Into<String>) -> Self {
        WizardError::Validation(reason.into())
    }

    /// True when the user can fix the problem by changing their input.
    pub fn is_user_correctable(&self) -> bool {
        matches!(self, WizardError::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_is_verbatim() {
        let err = WizardError::validation("No files selected.");
        assert_eq!(err.to_string(), "No files selected.");
        assert!(err.is_user_correctable());
    }

    #[test]
    fn test_transport_error_is_not_user_correctable() {
        let err = WizardError::from(TransportError::Rejected {
            status: 500,
            message: "Upload failed: 500 Internal Server Error".to_string(),
        });
        assert_eq!(err.to_string(), "Upload failed: 500 Internal Server Error");
        assert!(!err.is_user_correctable());
    }

    #[test]
    fn test_every_non_validation_variant_is_not_user_correctable() {
        assert!(!WizardError::UploadInFlight.is_user_correctable());
        assert!(!WizardError::Cancelled.is_user_correctable());
        assert_eq!(WizardError::Cancelled.to_string(), "Upload cancelled.");
    }
}
