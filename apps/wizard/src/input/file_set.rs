//! Owns the résumé slot's selected file set.
//!
//! Every mutation validates the whole proposed set and either replaces the
//! current set or leaves it untouched. Mutations are serialized through a
//! `tokio::sync::Mutex` held across validation, so two rapid drops never
//! validate against the same stale snapshot.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::errors::WizardError;
use crate::input::picker::FilePickerControl;
use crate::models::{CandidateFile, FileCategory};
use crate::validation::files::MAX_IMAGE_FILES;
use crate::validation::FileValidator;

/// Notification for the owning wizard slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Selected(CandidateFile),
    Cleared,
}

#[derive(Debug, Default)]
struct FileSetState {
    files: Vec<CandidateFile>,
    picker: FilePickerControl,
    validation_error: Option<String>,
}

pub struct FileSetManager {
    validator: Arc<FileValidator>,
    state: Mutex<FileSetState>,
}

impl FileSetManager {
    pub fn new(validator: Arc<FileValidator>) -> Self {
        Self {
            validator,
            state: Mutex::new(FileSetState::default()),
        }
    }

    pub async fn files(&self) -> Vec<CandidateFile> {
        self.state.lock().await.files.clone()
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.files.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state.lock().await.files.is_empty()
    }

    /// Reason the last rejected mutation gave, cleared by the next accepted one.
    pub async fn validation_error(&self) -> Option<String> {
        self.state.lock().await.validation_error.clone()
    }

    pub async fn picker_value(&self) -> Option<String> {
        self.state.lock().await.picker.value().map(str::to_string)
    }

    /// Merges `new_files` into the set, keeping the first file seen for each name.
    ///
    /// Returns `Some(Selection::Selected(_))` only when the set was empty and
    /// exactly one file was added.
    pub async fn add_files(
        &self,
        new_files: Vec<CandidateFile>,
    ) -> Result<Option<Selection>, WizardError> {
        let mut state = self.state.lock().await;
        self.add_locked(&mut state, new_files).await
    }

    /// Same as [`add_files`](Self::add_files), but routed through the picker
    /// control: a selection equal to the control's current value is ignored.
    pub async fn select_from_picker(
        &self,
        picked: Vec<CandidateFile>,
    ) -> Result<Option<Selection>, WizardError> {
        let mut state = self.state.lock().await;
        if !state.picker.select(&picked) {
            debug!("Picker selection unchanged, ignoring");
            return Ok(None);
        }
        let result = self.add_locked(&mut state, picked).await;
        if result.is_err() {
            state.picker.clear();
        }
        result
    }

    async fn add_locked(
        &self,
        state: &mut FileSetState,
        new_files: Vec<CandidateFile>,
    ) -> Result<Option<Selection>, WizardError> {
        let was_empty = state.files.is_empty();
        let added = new_files.len();

        let mut seen: HashSet<String> = state.files.iter().map(|f| f.name.clone()).collect();
        let mut union = state.files.clone();
        for file in new_files {
            if seen.insert(file.name.clone()) {
                union.push(file);
            }
        }

        let verdict = self.validator.validate(&union).await;
        if !verdict.passed {
            let reason = verdict.reason.unwrap_or_default();
            info!(proposed = union.len(), %reason, "File set rejected");
            state.validation_error = Some(reason.clone());
            return Err(WizardError::Validation(reason));
        }

        state.validation_error = None;
        state.files = union;
        debug!(files = state.files.len(), "File set updated");

        if was_empty && added == 1 {
            return Ok(state.files.first().cloned().map(Selection::Selected));
        }
        Ok(None)
    }

    /// Removes the entry at `index`, keeping the order of the rest.
    ///
    /// The picker control is always cleared so the same file can be picked
    /// again. Returns `Some(Selection::Cleared)` when the set became empty.
    pub async fn remove_file(&self, index: usize) -> Option<Selection> {
        let mut state = self.state.lock().await;
        state.picker.clear();
        if index >= state.files.len() {
            return None;
        }
        let removed = state.files.remove(index);
        state.validation_error = None;
        debug!(file = %removed.name, remaining = state.files.len(), "File removed");

        state.files.is_empty().then_some(Selection::Cleared)
    }

    pub async fn can_add_more(&self) -> bool {
        can_add_more(&self.state.lock().await.files)
    }

    pub async fn clear_picker(&self) {
        self.state.lock().await.picker.clear();
    }

    pub async fn clear(&self) {
        *self.state.lock().await = FileSetState::default();
    }
}

/// True when the set is empty, or holds fewer than the image limit of images only.
pub fn can_add_more(files: &[CandidateFile]) -> bool {
    if files.is_empty() {
        return true;
    }
    let all_images = files.iter().all(|f| f.category() == FileCategory::Image);
    all_images && files.len() < MAX_IMAGE_FILES
}
