use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::UploadLimits;
use crate::errors::WizardError;
use crate::models::file::{is_programmatic_text, CandidateFile, FileCategory};
use crate::validation::page_count::PageCounter;

pub const MAX_PDF_FILES: usize = 1;
pub const MAX_IMAGE_FILES: usize = 3;

pub const NO_FILES_SELECTED: &str = "No files selected.";
pub const RAW_TEXT_UPLOAD: &str =
    "TXT files cannot be uploaded directly. Please enter text using the 'Enter Resume Text' option.";
pub const MIXED_PDF_AND_IMAGES: &str =
    "You can upload either images or a PDF file, but not both at the same time.";
pub const TOO_MANY_PDFS: &str = "You can only upload 1 PDF file at a time.";
pub const TOO_MANY_IMAGES: &str = "You can only upload a maximum of 3 images.";

/// Outcome of validating a whole proposed file set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileValidationResult {
    pub passed: bool,
    pub reason: Option<String>,
}

impl FileValidationResult {
    pub fn pass() -> Self {
        Self {
            passed: true,
            reason: None,
        }
    }

    pub fn reject(reason: impl Into<String>) -> Self {
        Self {
            passed: false,
            reason: Some(reason.into()),
        }
    }

    pub fn into_result(self) -> Result<(), WizardError> {
        match self.reason {
            Some(reason) if !self.passed => Err(WizardError::Validation(reason)),
            _ => Ok(()),
        }
    }
}

/// Checks every rule that needs no I/O, in precedence order.
///
/// Returns the single PDF that still needs its page count checked, if any.
/// Rules, first failure wins:
/// 1. empty set
/// 2. unsupported category
/// 3. raw `.txt` upload (a lone programmatic text artifact skips 4–6 and 8)
/// 4. PDF mixed with images
/// 5. more than one PDF
/// 6. more than three images
/// 7. oversized file
/// 8. extension not in the accepted list
pub fn check_composition<'a>(
    files: &'a [CandidateFile],
    limits: &UploadLimits,
) -> Result<Option<&'a CandidateFile>, String> {
    if files.is_empty() {
        return Err(NO_FILES_SELECTED.to_string());
    }

    if let Some(other) = files.iter().find(|f| f.category() == FileCategory::Other) {
        return Err(format!(
            "File \"{}\" has an unsupported format. Only PDF and image files (PNG, JPG, JPEG, WEBP) are supported for direct upload.",
            other.name
        ));
    }

    let programmatic = is_programmatic_text(files);
    let count = |category: FileCategory| files.iter().filter(|f| f.category() == category).count();
    let pdfs = count(FileCategory::Pdf);
    let images = count(FileCategory::Image);

    if !programmatic {
        if count(FileCategory::PlainText) > 0 {
            return Err(RAW_TEXT_UPLOAD.to_string());
        }
        if pdfs > 0 && images > 0 {
            return Err(MIXED_PDF_AND_IMAGES.to_string());
        }
        if pdfs > MAX_PDF_FILES {
            return Err(TOO_MANY_PDFS.to_string());
        }
        if images > MAX_IMAGE_FILES {
            return Err(TOO_MANY_IMAGES.to_string());
        }
    }

    let max_bytes = limits.max_size_bytes();
    if files.iter().any(|f| f.size_bytes() > max_bytes) {
        return Err(format!(
            "File size should not exceed {}MB. Please compress your file(s).",
            limits.max_size_mb
        ));
    }

    if programmatic {
        return Ok(None);
    }

    let accepted = limits.accepted_extensions();
    for file in files {
        let known = file
            .extension()
            .map(|ext| accepted.iter().any(|a| *a == ext))
            .unwrap_or(false);
        if !known {
            return Err(format!(
                "File \"{}\" has an unsupported format. Please upload files with these formats: {}",
                file.name, limits.accepted_file_types
            ));
        }
    }

    Ok(files.iter().find(|f| f.category() == FileCategory::Pdf))
}

/// Applies the full rule set, including the PDF page-count check.
///
/// Validation always looks at the entire proposed set, never at one file in
/// isolation, so the cross-file rules stay consistent.
pub struct FileValidator {
    limits: UploadLimits,
    page_counter: Arc<dyn PageCounter>,
}

impl FileValidator {
    pub fn new(limits: UploadLimits, page_counter: Arc<dyn PageCounter>) -> Self {
        Self {
            limits,
            page_counter,
        }
    }

    pub fn limits(&self) -> &UploadLimits {
        &self.limits
    }

    pub async fn validate(&self, files: &[CandidateFile]) -> FileValidationResult {
        let pdf = match check_composition(files, &self.limits) {
            Ok(pdf) => pdf,
            Err(reason) => {
                debug!(files = files.len(), %reason, "File set rejected");
                return FileValidationResult::reject(reason);
            }
        };

        if let Some(pdf) = pdf {
            match self.page_counter.count_pages(pdf).await {
                Ok(pages) if pages > self.limits.max_pages => {
                    return FileValidationResult::reject(format!(
                        "PDF exceeds maximum {} pages (has {} pages)",
                        self.limits.max_pages, pages
                    ));
                }
                Ok(_) => {}
                Err(e) => {
                    debug!(file = %pdf.name, error = %e, "Page count failed");
                    return FileValidationResult::reject(e.to_string());
                }
            }
        }

        FileValidationResult::pass()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use async_trait::async_trait;

    use super::*;
    use crate::validation::page_count::PageCountError;

    /// Reports the same page count for every PDF.
    pub struct FixedPageCounter(pub usize);

    #[async_trait]
    impl PageCounter for FixedPageCounter {
        async fn count_pages(&self, _file: &CandidateFile) -> Result<usize, PageCountError> {
            Ok(self.0)
        }
    }

    pub fn validator(pages: usize) -> FileValidator {
        FileValidator::new(UploadLimits::default(), Arc::new(FixedPageCounter(pages)))
    }

    pub const MB: usize = 1024 * 1024;

    pub fn png(name: &str, bytes: usize) -> CandidateFile {
        CandidateFile::new(name, "image/png", vec![0u8; bytes])
    }

    pub fn pdf(name: &str, bytes: usize) -> CandidateFile {
        CandidateFile::new(name, "application/pdf", vec![0u8; bytes])
    }
}
