// Input validation: résumé file sets, PDF page limits, job URLs, profile pictures.
// Every rule returns a user-facing message; nothing here panics or retries.

pub mod files;
pub mod job_url;
pub mod page_count;
pub mod picture;

pub use files::{FileValidationResult, FileValidator};
pub use job_url::{validate_job_url, JobUrlError};
pub use page_count::{LopdfPageCounter, PageCountError, PageCounter};
pub use picture::validate_profile_picture;
