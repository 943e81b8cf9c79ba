use std::sync::Arc;

use crate::errors::WizardError;
use crate::input::file_set::{FileSetManager, Selection};
use crate::input::reconciler::{
    InputKind, InputMode, InputReconciler, InputRequest, InputSlot, SwitchCancelled,
    SwitchConfirmed, TextSubmission,
};
use crate::models::CandidateFile;
use crate::validation::FileValidator;

pub const SWITCH_PENDING: &str = "Please confirm or cancel switching the input type first.";

/// The résumé slot: a validated file set or pasted text, never both.
pub struct ResumeInput {
    reconciler: InputReconciler,
    files: FileSetManager,
}

impl ResumeInput {
    pub fn new(validator: Arc<FileValidator>) -> Self {
        let max_text_length = validator.limits().max_text_length;
        Self {
            reconciler: InputReconciler::new(InputSlot::Resume, max_text_length),
            files: FileSetManager::new(validator),
        }
    }

    pub fn mode(&self) -> InputMode {
        self.reconciler.mode()
    }

    pub fn text(&self) -> &str {
        self.reconciler.text()
    }

    pub fn file_set(&self) -> &FileSetManager {
        &self.files
    }

    pub fn request_file_input(&mut self) -> InputRequest {
        self.reconciler.request_file_input()
    }

    pub fn request_text_input(&mut self) -> InputRequest {
        self.reconciler.request_text_input()
    }

    pub async fn confirm_switch(&mut self) -> Option<SwitchConfirmed> {
        let confirmed = self.reconciler.confirm_switch()?;
        if confirmed.discarded == InputKind::File {
            self.files.clear().await;
        }
        Some(confirmed)
    }

    pub async fn cancel_switch(&mut self) -> Option<SwitchCancelled> {
        let cancelled = self.reconciler.cancel_switch()?;
        if cancelled.reset_file_picker {
            self.files.clear_picker().await;
        }
        Some(cancelled)
    }

    fn ensure_file_mode(&self) -> Result<(), WizardError> {
        let has_text = self.reconciler.mode() == InputMode::PastedText
            && !self.reconciler.text().trim().is_empty();
        if has_text || self.reconciler.is_pending() {
            return Err(WizardError::validation(SWITCH_PENDING));
        }
        Ok(())
    }

    pub async fn add_files(
        &mut self,
        new_files: Vec<CandidateFile>,
    ) -> Result<Option<Selection>, WizardError> {
        self.ensure_file_mode()?;
        let selection = self.files.add_files(new_files).await?;
        self.sync_attachment().await;
        Ok(selection)
    }

    pub async fn select_from_picker(
        &mut self,
        picked: Vec<CandidateFile>,
    ) -> Result<Option<Selection>, WizardError> {
        self.ensure_file_mode()?;
        let selection = self.files.select_from_picker(picked).await?;
        self.sync_attachment().await;
        Ok(selection)
    }

    pub async fn remove_file(&mut self, index: usize) -> Option<Selection> {
        let selection = self.files.remove_file(index).await;
        self.sync_attachment().await;
        selection
    }

    async fn sync_attachment(&mut self) {
        if self.files.is_empty().await {
            self.reconciler.attachment_cleared();
        } else {
            self.reconciler.attachment_committed();
        }
    }

    pub fn submit_text(&mut self, text: &str) -> TextSubmission {
        self.reconciler.submit_text(text)
    }

    /// Drops the pasted text. Returns `Some(Selection::Cleared)` when there was any.
    pub fn remove_text(&mut self) -> Option<Selection> {
        self.reconciler.clear_text().then_some(Selection::Cleared)
    }

    pub async fn can_add_more(&self) -> bool {
        self.reconciler.text().trim().is_empty() && self.files.can_add_more().await
    }

    /// The set that would be uploaded right now: the file set, or the pasted
    /// text wrapped as a single artifact.
    pub async fn upload_set(&self) -> Vec<CandidateFile> {
        let text = self.reconciler.text();
        if text.trim().is_empty() {
            self.files.files().await
        } else {
            vec![CandidateFile::from_pasted_text(text)]
        }
    }

    pub async fn reset(&mut self) {
        self.reconciler.reset();
        self.files.clear().await;
    }
}
