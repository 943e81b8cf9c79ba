use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_ACCEPTED_FILE_TYPES: &str = ".pdf,.png,.jpg,.jpeg,.webp";
pub const DEFAULT_MAX_SIZE_MB: u64 = 3;
pub const DEFAULT_MAX_PAGES: usize = 3;
pub const DEFAULT_MAX_TEXT_LENGTH: usize = 2000;
pub const DEFAULT_PICTURE_MAX_SIZE_MB: u64 = 5;
pub const DEFAULT_UPLOAD_URL: &str = "http://localhost:8000/reader/resume";
pub const DEFAULT_JOB_URL_ENDPOINT: &str = "http://localhost:8000/api/process-job-url";

/// The knobs consumed by the file validator and the text inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadLimits {
    /// Comma-separated extension list, e.g. `.pdf,.png`.
    pub accepted_file_types: String,
    pub max_size_mb: u64,
    pub max_pages: usize,
    pub max_text_length: usize,
    pub picture_max_size_mb: u64,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            accepted_file_types: DEFAULT_ACCEPTED_FILE_TYPES.to_string(),
            max_size_mb: DEFAULT_MAX_SIZE_MB,
            max_pages: DEFAULT_MAX_PAGES,
            max_text_length: DEFAULT_MAX_TEXT_LENGTH,
            picture_max_size_mb: DEFAULT_PICTURE_MAX_SIZE_MB,
        }
    }
}

impl UploadLimits {
    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_mb.saturating_mul(1024 * 1024)
    }

    pub fn picture_max_size_bytes(&self) -> u64 {
        self.picture_max_size_mb.saturating_mul(1024 * 1024)
    }

    /// Lower-cased extensions without the leading dot.
    pub fn accepted_extensions(&self) -> Vec<String> {
        self.accepted_file_types
            .split(',')
            .map(|t| t.trim().trim_start_matches('.').to_lowercase())
            .filter(|t| !t.is_empty())
            .collect()
    }
}

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed numbers are reported, not ignored.
#[derive(Debug, Clone)]
pub struct Config {
    pub limits: UploadLimits,
    pub upload_url: String,
    pub job_url_endpoint: String,
    pub http_timeout_secs: u64,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            limits: UploadLimits {
                accepted_file_types: env_or(
                    "WIZARD_ACCEPTED_FILE_TYPES",
                    DEFAULT_ACCEPTED_FILE_TYPES,
                ),
                max_size_mb: parse_env("WIZARD_MAX_SIZE_MB", DEFAULT_MAX_SIZE_MB)?,
                max_pages: parse_env("WIZARD_MAX_PAGES", DEFAULT_MAX_PAGES)?,
                max_text_length: parse_env("WIZARD_MAX_TEXT_LENGTH", DEFAULT_MAX_TEXT_LENGTH)?,
                picture_max_size_mb: parse_env(
                    "WIZARD_PICTURE_MAX_SIZE_MB",
                    DEFAULT_PICTURE_MAX_SIZE_MB,
                )?,
            },
            upload_url: env_or("UPLOAD_URL", DEFAULT_UPLOAD_URL),
            job_url_endpoint: env_or("JOB_URL_ENDPOINT", DEFAULT_JOB_URL_ENDPOINT),
            http_timeout_secs: parse_env("HTTP_TIMEOUT_SECS", 60)?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}
