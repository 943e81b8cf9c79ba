//! The résumé wizard: step machine, both input slots, the upload coordinator
//! and the profile picture preview, wired from explicit collaborators.
//!
//! Slot operations return what the slot reported; the wizard applies it to
//! [`WizardState`] before returning, so the state is always in sync with the
//! slots.

pub mod steps;

use std::sync::Arc;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::errors::WizardError;
use crate::input::{
    InputKind, InputRequest, JobInput, JobSwitch, ResumeInput, Selection, SlotPayload,
    SwitchCancelled, SwitchConfirmed, TextSubmission, UrlSubmission,
};
use crate::models::template::find_template;
use crate::models::CandidateFile;
use crate::preview::{PreviewRegistry, PreviewSlot};
use crate::state::WizardServices;
use crate::transport::UploadResponse;
use crate::upload::{UploadCoordinator, UploadStatus};
use crate::validation::{validate_profile_picture, JobUrlError};

pub use steps::{Step, Transition, WizardState};

pub struct Wizard {
    services: WizardServices,
    state: WizardState,
    resume: ResumeInput,
    job: JobInput,
    uploads: UploadCoordinator,
    previews: PreviewRegistry,
    picture_preview: PreviewSlot,
}

impl Wizard {
    pub fn new(services: WizardServices) -> Self {
        let validator = Arc::new(services.file_validator());
        let max_text_length = services.limits.max_text_length;
        Self {
            resume: ResumeInput::new(validator.clone()),
            job: JobInput::new(max_text_length),
            uploads: UploadCoordinator::new(validator, services.upload_transport.clone()),
            previews: PreviewRegistry::new(),
            picture_preview: PreviewSlot::default(),
            state: WizardState::new(),
            services,
        }
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn resume(&self) -> &ResumeInput {
        &self.resume
    }

    pub fn job(&self) -> &JobInput {
        &self.job
    }

    pub fn previews(&self) -> &PreviewRegistry {
        &self.previews
    }

    // ────────────────────────────────────────────────────────────────────
    // Résumé slot
    // ────────────────────────────────────────────────────────────────────

    pub fn request_resume_file_input(&mut self) -> InputRequest {
        self.resume.request_file_input()
    }

    pub fn request_resume_text_input(&mut self) -> InputRequest {
        self.resume.request_text_input()
    }

    pub async fn confirm_resume_switch(&mut self) -> Option<SwitchConfirmed> {
        let confirmed = self.resume.confirm_switch().await?;
        self.sync_cv_file().await;
        Some(confirmed)
    }

    pub async fn cancel_resume_switch(&mut self) -> Option<SwitchCancelled> {
        self.resume.cancel_switch().await
    }

    pub async fn add_resume_files(
        &mut self,
        files: Vec<CandidateFile>,
    ) -> Result<Option<Selection>, WizardError> {
        let selection = self.resume.add_files(files).await?;
        self.sync_cv_file().await;
        Ok(selection)
    }

    pub async fn pick_resume_files(
        &mut self,
        files: Vec<CandidateFile>,
    ) -> Result<Option<Selection>, WizardError> {
        let selection = self.resume.select_from_picker(files).await?;
        self.sync_cv_file().await;
        Ok(selection)
    }

    pub async fn remove_resume_file(&mut self, index: usize) -> Option<Selection> {
        let selection = self.resume.remove_file(index).await;
        self.sync_cv_file().await;
        selection
    }

    pub fn submit_resume_text(&mut self, text: &str) -> TextSubmission {
        let submission = self.resume.submit_text(text);
        if let TextSubmission::Committed(SlotPayload::ResumeText(file)) = &submission {
            self.state.cv_file = Some(file.clone());
        }
        submission
    }

    /// Drops pasted résumé text, leaving the slot empty.
    pub fn remove_resume_text(&mut self) -> Option<Selection> {
        let selection = self.resume.remove_text()?;
        self.state.cv_file = None;
        Some(selection)
    }

    /// `cv_file` mirrors the head of whatever the résumé slot would upload.
    async fn sync_cv_file(&mut self) {
        self.state.cv_file = self.resume.upload_set().await.into_iter().next();
    }

    pub async fn can_add_more_resume_files(&self) -> bool {
        self.resume.can_add_more().await
    }

    // ────────────────────────────────────────────────────────────────────
    // Job slot
    // ────────────────────────────────────────────────────────────────────

    /// Validates and submits a job URL, then fetches its details.
    pub async fn submit_job_url(&mut self, raw: &str) -> Result<UrlSubmission, JobUrlError> {
        let submission = self.job.submit_url(raw)?;
        if let UrlSubmission::Submitted(url) = &submission {
            self.state.job_url = Some(url.to_string());
            self.process_job_url().await;
        }
        Ok(submission)
    }

    /// Drops the submitted URL and the details fetched for it.
    pub fn clear_job_url(&mut self) {
        if self.job.url().is_none() {
            return;
        }
        self.job.clear_url();
        self.state.job_url = None;
        self.state.job_details.clear();
    }

    pub fn request_job_text_input(&mut self) -> InputRequest {
        self.job.request_text_input()
    }

    pub async fn confirm_job_switch(&mut self) -> Option<JobSwitch> {
        let switch = self.job.confirm_switch()?;
        match switch.confirmed.discarded {
            InputKind::Text => self.state.job_details.clear(),
            InputKind::File => {
                self.state.job_url = None;
                self.state.job_details.clear();
            }
        }
        if let Some(url) = &switch.submitted_url {
            self.state.job_url = Some(url.to_string());
            self.process_job_url().await;
        }
        Some(switch)
    }

    pub fn cancel_job_switch(&mut self) -> Option<SwitchCancelled> {
        self.job.cancel_switch()
    }

    pub fn submit_job_text(&mut self, text: &str) -> TextSubmission {
        let submission = self.job.submit_text(text);
        if let TextSubmission::Committed(SlotPayload::JobText(details)) = &submission {
            self.state.job_details = details.clone();
        }
        submission
    }

    /// Populates `job_details` from the submitted URL.
    ///
    /// Collaborator failures are logged and swallowed; the user can still
    /// paste the posting by hand. `is_processing_url` is always cleared.
    pub async fn process_job_url(&mut self) {
        let Some(url) = self.state.job_url.clone() else {
            return;
        };
        self.state.is_processing_url = true;
        match self.services.job_fetcher.fetch_job_details(&url).await {
            Ok(details) => {
                info!(%url, chars = details.chars().count(), "Job details fetched");
                self.state.job_details = details;
            }
            Err(e) => error!(%url, error = %e, "Failed to process job URL"),
        }
        self.state.is_processing_url = false;
    }

    // ────────────────────────────────────────────────────────────────────
    // Profile picture, template, instructions
    // ────────────────────────────────────────────────────────────────────

    pub fn set_profile_picture(&mut self, picture: CandidateFile) -> Result<&str, WizardError> {
        validate_profile_picture(&picture, &self.services.limits)?;
        let url = self.picture_preview.replace(&self.previews, &picture);
        self.state.profile_picture = Some(picture);
        Ok(url)
    }

    pub fn remove_profile_picture(&mut self) {
        self.picture_preview.clear();
        self.state.profile_picture = None;
    }

    pub fn picture_preview_url(&self) -> Option<&str> {
        self.picture_preview.url()
    }

    /// Returns false for ids outside the catalog.
    pub fn select_template(&mut self, id: &str) -> bool {
        if find_template(id).is_none() {
            return false;
        }
        self.state.selected_template_id = Some(id.to_string());
        true
    }

    pub fn set_ai_instructions(&mut self, instructions: impl Into<String>) {
        self.state.ai_instructions = instructions.into();
    }

    // ────────────────────────────────────────────────────────────────────
    // Navigation
    // ────────────────────────────────────────────────────────────────────

    pub fn next(&mut self) -> Transition {
        self.state.next()
    }

    pub fn back(&mut self) -> Transition {
        self.state.back()
    }

    pub fn continue_without_picture(&mut self) -> Transition {
        self.state.continue_without_picture()
    }

    pub fn add_picture_instead(&mut self) {
        self.state.add_picture_instead();
    }

    pub fn finish_generation(&mut self) -> Transition {
        self.state.finish_generation()
    }

    pub async fn reset(&mut self) {
        self.state.reset();
        self.resume.reset().await;
        self.job.reset();
        self.picture_preview.clear();
        self.uploads.reset_error();
        info!("Wizard restarted");
    }

    // ────────────────────────────────────────────────────────────────────
    // Upload
    // ────────────────────────────────────────────────────────────────────

    pub fn upload_status(&self) -> UploadStatus {
        self.uploads.status()
    }

    pub fn subscribe_upload_status(&self) -> watch::Receiver<UploadStatus> {
        self.uploads.subscribe()
    }

    /// Uploads whatever the résumé slot currently holds.
    pub async fn upload_resume(&self) -> Result<UploadResponse, WizardError> {
        self.upload_resume_cancellable(&CancellationToken::new()).await
    }

    pub async fn upload_resume_cancellable(
        &self,
        cancel: &CancellationToken,
    ) -> Result<UploadResponse, WizardError> {
        let files = self.resume.upload_set().await;
        self.uploads.upload_cancellable(&files, cancel).await
    }
}
