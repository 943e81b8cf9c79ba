use reqwest::Url;
use tracing::debug;

use crate::input::reconciler::{
    InputKind, InputMode, InputReconciler, InputRequest, InputSlot, SwitchCancelled,
    SwitchConfirmed, TextSubmission,
};
use crate::validation::{validate_job_url, JobUrlError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlSubmission {
    Submitted(Url),
    /// Pasted job text exists; the URL is held until the switch is confirmed.
    ConfirmationRequired,
}

/// Result of confirming a switch on the job slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSwitch {
    pub confirmed: SwitchConfirmed,
    /// Set when a URL was waiting on the confirmation and is now submitted.
    pub submitted_url: Option<Url>,
}

/// The job posting slot: a single URL or pasted job text.
#[derive(Debug, Clone)]
pub struct JobInput {
    reconciler: InputReconciler,
    url: Option<Url>,
    pending_url: Option<Url>,
}

impl JobInput {
    pub fn new(max_text_length: usize) -> Self {
        Self {
            reconciler: InputReconciler::new(InputSlot::JobPosting, max_text_length),
            url: None,
            pending_url: None,
        }
    }

    pub fn mode(&self) -> InputMode {
        self.reconciler.mode()
    }

    pub fn url(&self) -> Option<&Url> {
        self.url.as_ref()
    }

    pub fn text(&self) -> &str {
        self.reconciler.text()
    }

    pub fn submit_url(&mut self, raw: &str) -> Result<UrlSubmission, JobUrlError> {
        let url = validate_job_url(raw)?;
        if let InputMode::PendingSwitchConfirmation {
            from: InputKind::File,
        } = self.reconciler.mode()
        {
            // Back to URL input: the pending switch to text is abandoned.
            self.reconciler.cancel_switch();
        }
        match self.reconciler.request_file_input() {
            InputRequest::ConfirmationRequired { .. } => {
                debug!(%url, "Job URL waiting on switch confirmation");
                self.pending_url = Some(url);
                Ok(UrlSubmission::ConfirmationRequired)
            }
            InputRequest::Proceed(_) => {
                self.commit_url(url.clone());
                Ok(UrlSubmission::Submitted(url))
            }
        }
    }

    fn commit_url(&mut self, url: Url) {
        self.url = Some(url);
        self.reconciler.attachment_committed();
    }

    pub fn clear_url(&mut self) {
        self.url = None;
        self.pending_url = None;
        self.reconciler.attachment_cleared();
    }

    pub fn request_text_input(&mut self) -> InputRequest {
        self.reconciler.request_text_input()
    }

    pub fn confirm_switch(&mut self) -> Option<JobSwitch> {
        let confirmed = self.reconciler.confirm_switch()?;
        let submitted_url = match confirmed.discarded {
            InputKind::Text => self.pending_url.take().map(|url| {
                self.commit_url(url.clone());
                url
            }),
            InputKind::File => {
                self.url = None;
                self.pending_url = None;
                None
            }
        };
        Some(JobSwitch {
            confirmed,
            submitted_url,
        })
    }

    pub fn cancel_switch(&mut self) -> Option<SwitchCancelled> {
        self.pending_url = None;
        self.reconciler.cancel_switch()
    }

    pub fn submit_text(&mut self, text: &str) -> TextSubmission {
        self.reconciler.submit_text(text)
    }

    pub fn reset(&mut self) {
        self.reconciler.reset();
        self.url = None;
        self.pending_url = None;
    }
}
