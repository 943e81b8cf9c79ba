//! The HTTP boundary of the wizard.
//!
//! Two collaborators live behind traits so the core can be exercised without a
//! network: the résumé upload endpoint and the job-URL processing endpoint.
//! `HttpBackend` implements both over a single reqwest client. Neither call is
//! retried; the caller decides whether to try again.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[cfg(test)]
use mockall::automock;

use crate::models::CandidateFile;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// 2xx response whose body reported `success: false`.
    #[error("{message}")]
    Unsuccessful { message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Body returned by the upload endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub file_id: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
struct JobUrlRequest<'a> {
    url: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobUrlResponse {
    job_details: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Sends a validated file set to the storage backend.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait UploadTransport: Send + Sync {
    async fn transmit(&self, files: &[CandidateFile]) -> Result<UploadResponse, TransportError>;
}

/// Turns a job posting URL into the posting's text.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait JobDetailsFetcher: Send + Sync {
    async fn fetch_job_details(&self, url: &str) -> Result<String, TransportError>;
}

/// reqwest-backed implementation of both collaborators.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    upload_url: String,
    job_url_endpoint: String,
}

impl HttpBackend {
    pub fn new(
        upload_url: impl Into<String>,
        job_url_endpoint: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, TransportError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            upload_url: upload_url.into(),
            job_url_endpoint: job_url_endpoint.into(),
        })
    }
}

#[async_trait]
impl UploadTransport for HttpBackend {
    async fn transmit(&self, files: &[CandidateFile]) -> Result<UploadResponse, TransportError> {
        let form = build_form(files)?;

        let response = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Rejected {
                status: status.as_u16(),
                message: upload_failure_message(status, &body),
            });
        }

        let body: UploadResponse = response.json().await?;
        debug!(
            files = files.len(),
            file_id = body.file_id.as_deref().unwrap_or("-"),
            "Upload accepted"
        );
        Ok(body)
    }
}

#[async_trait]
impl JobDetailsFetcher for HttpBackend {
    async fn fetch_job_details(&self, url: &str) -> Result<String, TransportError> {
        let response = self
            .client
            .post(&self.job_url_endpoint)
            .json(&JobUrlRequest { url })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Rejected {
                status: status.as_u16(),
                message: "Failed to process job URL".to_string(),
            });
        }

        let body: JobUrlResponse = response.json().await?;
        Ok(body.job_details)
    }
}

/// One multipart part per file, named `file-0`, `file-1`, ...
fn build_form(files: &[CandidateFile]) -> Result<Form, TransportError> {
    let mut form = Form::new();
    for (index, file) in files.iter().enumerate() {
        let part = Part::bytes(file.content.to_vec())
            .file_name(file.name.clone())
            .mime_str(&file.mime_type)?;
        form = form.part(format!("file-{index}"), part);
    }
    Ok(form)
}

/// Prefers the server's JSON `error` field, falling back to the status line.
fn upload_failure_message(status: StatusCode, body: &str) -> String {
    if let Ok(ErrorBody { error: Some(error) }) = serde_json::from_str::<ErrorBody>(body) {
        return error;
    }
    match status.canonical_reason() {
        Some(reason) => format!("Upload failed: {} {}", status.as_u16(), reason),
        None => format!("Upload failed: {}", status.as_u16()),
    }
}
