//! PDF page counting, the only place the wizard looks inside a PDF.
//!
//! Parsing is CPU-bound and runs inside `tokio::task::spawn_blocking`.

use async_trait::async_trait;
use lopdf::Document;
use thiserror::Error;
use tracing::debug;

#[cfg(test)]
use mockall::automock;

use crate::models::CandidateFile;

#[derive(Debug, Error)]
pub enum PageCountError {
    #[error("Could not read PDF \"{name}\": {message}")]
    Unreadable { name: String, message: String },

    #[error("PDF page counting was interrupted")]
    Interrupted,
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait PageCounter: Send + Sync {
    async fn count_pages(&self, file: &CandidateFile) -> Result<usize, PageCountError>;
}

/// Walks the PDF page tree with lopdf.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfPageCounter;

#[async_trait]
impl PageCounter for LopdfPageCounter {
    async fn count_pages(&self, file: &CandidateFile) -> Result<usize, PageCountError> {
        let content = file.content.clone();
        let name = file.name.clone();

        let pages = tokio::task::spawn_blocking(move || {
            Document::load_mem(&content).map(|doc| doc.get_pages().len())
        })
        .await
        .map_err(|_| PageCountError::Interrupted)?
        .map_err(|e| PageCountError::Unreadable {
            name: name.clone(),
            message: e.to_string(),
        })?;

        debug!(file = %name, pages, "Counted PDF pages");
        Ok(pages)
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::pdf_with_pages;
    use super::*;
    use crate::models::file::MIME_PDF;

    #[tokio::test]
    async fn test_counts_pages_of_real_pdf() {
        let file = CandidateFile::new("cv.pdf", MIME_PDF, pdf_with_pages(4));
        assert_eq!(LopdfPageCounter.count_pages(&file).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_single_page_pdf() {
        let file = CandidateFile::new("cv.pdf", MIME_PDF, pdf_with_pages(1));
        assert_eq!(LopdfPageCounter.count_pages(&file).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_garbage_is_unreadable() {
        let file = CandidateFile::new("broken.pdf", MIME_PDF, "definitely not a pdf");
        let err = LopdfPageCounter.count_pages(&file).await.unwrap_err();
        assert!(matches!(err, PageCountError::Unreadable { .. }));
        assert!(err.to_string().contains("broken.pdf"));
    }
}
