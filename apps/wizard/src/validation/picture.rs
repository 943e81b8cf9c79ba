use crate::config::UploadLimits;
use crate::errors::WizardError;
use crate::models::{CandidateFile, FileCategory};

/// Profile pictures are optional, but when given must be a reasonably small image.
pub fn validate_profile_picture(file: &CandidateFile, limits: &UploadLimits) -> Result<(), WizardError> {
    if file.category() != FileCategory::Image {
        return Err(WizardError::validation("Please upload an image file"));
    }
    if file.size_bytes() > limits.picture_max_size_bytes() {
        return Err(WizardError::validation(format!(
            "File size should not exceed {}MB",
            limits.picture_max_size_mb
        )));
    }
    Ok(())
}
