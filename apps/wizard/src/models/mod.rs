pub mod file;
pub mod template;

pub use file::{CandidateFile, FileCategory};
pub use template::Template;
