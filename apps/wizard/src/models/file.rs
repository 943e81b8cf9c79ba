use std::path::Path;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_PLAIN_TEXT: &str = "text/plain";
pub const MIME_OCTET_STREAM: &str = "application/octet-stream";

/// Reserved name carried by résumé text that the user typed or pasted.
pub const RESUME_TEXT_FILENAME: &str = "resume.txt";

/// Broad classification of a file by its MIME type. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileCategory {
    Pdf,
    Image,
    PlainText,
    Other,
}

impl FileCategory {
    pub fn from_mime(mime_type: &str) -> Self {
        let mime = mime_type.trim().to_ascii_lowercase();
        if mime == MIME_PDF {
            FileCategory::Pdf
        } else if mime.starts_with("image/") {
            FileCategory::Image
        } else if mime == MIME_PLAIN_TEXT {
            FileCategory::PlainText
        } else {
            FileCategory::Other
        }
    }
}

/// A file being considered for upload, either picked by the user or
/// synthesized from pasted text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    pub name: String,
    pub mime_type: String,
    pub content: Bytes,
}

impl CandidateFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            content: content.into(),
        }
    }

    /// Wraps pasted résumé text so it can travel the regular upload path.
    pub fn from_pasted_text(text: &str) -> Self {
        Self::new(
            RESUME_TEXT_FILENAME,
            MIME_PLAIN_TEXT,
            Bytes::copy_from_slice(text.as_bytes()),
        )
    }

    /// Reads a file from disk, guessing its MIME type from the extension.
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let content = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mime_type = mime_for_name(&name);
        Ok(Self::new(name, mime_type, content))
    }

    pub fn size_bytes(&self) -> u64 {
        self.content.len() as u64
    }

    pub fn category(&self) -> FileCategory {
        FileCategory::from_mime(&self.mime_type)
    }

    /// Lower-cased text after the last dot, if the name has one.
    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.name.rsplit_once('.')?;
        if stem.is_empty() && ext.is_empty() {
            return None;
        }
        Some(ext.to_lowercase())
    }
}

/// True when `files` is exactly one synthetic résumé-text artifact.
pub fn is_programmatic_text(files: &[CandidateFile]) -> bool {
    matches!(files, [only] if only.category() == FileCategory::PlainText
        && only.name == RESUME_TEXT_FILENAME)
}

/// Maps a file name's extension to the MIME type a browser would report.
pub fn mime_for_name(name: &str) -> &'static str {
    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => MIME_PDF,
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "txt" => MIME_PLAIN_TEXT,
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => MIME_OCTET_STREAM,
    }
}
