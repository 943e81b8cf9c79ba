use std::sync::Arc;
use std::time::Duration;

use crate::config::{Config, UploadLimits};
use crate::transport::{HttpBackend, JobDetailsFetcher, TransportError, UploadTransport};
use crate::validation::{FileValidator, LopdfPageCounter, PageCounter};

/// Collaborators injected into a wizard instance.
#[derive(Clone)]
pub struct WizardServices {
    pub limits: UploadLimits,
    /// Pluggable PDF page counter. Default: LopdfPageCounter.
    pub page_counter: Arc<dyn PageCounter>,
    pub upload_transport: Arc<dyn UploadTransport>,
    pub job_fetcher: Arc<dyn JobDetailsFetcher>,
}

impl WizardServices {
    /// Wires the HTTP backend and the lopdf page counter from configuration.
    pub fn from_config(config: &Config) -> Result<Self, TransportError> {
        let backend = Arc::new(HttpBackend::new(
            config.upload_url.clone(),
            config.job_url_endpoint.clone(),
            Duration::from_secs(config.http_timeout_secs),
        )?);
        Ok(Self {
            limits: config.limits.clone(),
            page_counter: Arc::new(LopdfPageCounter),
            upload_transport: backend.clone(),
            job_fetcher: backend,
        })
    }

    pub fn file_validator(&self) -> FileValidator {
        FileValidator::new(self.limits.clone(), self.page_counter.clone())
    }
}
