//! Keeps each input slot on exactly one kind of input.
//!
//! A slot holds either an attachment (résumé files, or the job posting URL) or
//! pasted text, never both. Switching away from a kind that already has
//! content parks the slot in `PendingSwitchConfirmation` until the user
//! confirms (content discarded) or cancels (nothing changes).
//!
//! The reconciler does not own the attachment itself. Its owner reports
//! attachment changes through [`InputReconciler::attachment_committed`] and
//! [`InputReconciler::attachment_cleared`], and applies the effects returned by
//! each operation.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::CandidateFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputSlot {
    Resume,
    JobPosting,
}

/// The two mutually exclusive kinds of input a slot can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    File,
    Text,
}

impl InputKind {
    fn opposite(self) -> Self {
        match self {
            InputKind::File => InputKind::Text,
            InputKind::Text => InputKind::File,
        }
    }

    fn mode(self) -> InputMode {
        match self {
            InputKind::File => InputMode::FileSet,
            InputKind::Text => InputMode::PastedText,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    Empty,
    FileSet,
    PastedText,
    /// Waiting for the user to confirm discarding `from` in favour of its opposite.
    PendingSwitchConfirmation { from: InputKind },
}

/// What the owner should open once a request is allowed through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    OpenFilePicker,
    OpenTextEditor { initial_text: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputRequest {
    Proceed(InputAction),
    /// Nothing happens until `confirm_switch` or `cancel_switch`.
    ConfirmationRequired { discards: InputKind },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchConfirmed {
    /// The owner must drop this kind of content (text is already dropped here).
    pub discarded: InputKind,
    pub action: InputAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwitchCancelled {
    /// The owner must clear its file-picker control so a stale selection is not reused.
    pub reset_file_picker: bool,
}

/// Text handed to the owning wizard slot after a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotPayload {
    ResumeText(CandidateFile),
    JobText(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSubmission {
    Committed(SlotPayload),
    /// Empty or whitespace-only; nothing changed.
    Blank,
    TooLong { max: usize, actual: usize },
    /// An attachment is present; the switch has to be confirmed first.
    AttachmentPresent,
}

#[derive(Debug, Clone)]
pub struct InputReconciler {
    slot: InputSlot,
    mode: InputMode,
    text: String,
    has_attachment: bool,
    max_text_length: usize,
}

impl InputReconciler {
    pub fn new(slot: InputSlot, max_text_length: usize) -> Self {
        Self {
            slot,
            mode: InputMode::Empty,
            text: String::new(),
            has_attachment: false,
            max_text_length,
        }
    }

    pub fn slot(&self) -> InputSlot {
        self.slot
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.mode, InputMode::PendingSwitchConfirmation { .. })
    }

    fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }

    pub fn request_file_input(&mut self) -> InputRequest {
        if let InputMode::PendingSwitchConfirmation { from } = self.mode {
            return InputRequest::ConfirmationRequired { discards: from };
        }
        if self.mode == InputMode::PastedText && self.has_text() {
            return self.park(InputKind::Text);
        }
        InputRequest::Proceed(InputAction::OpenFilePicker)
    }

    pub fn request_text_input(&mut self) -> InputRequest {
        if let InputMode::PendingSwitchConfirmation { from } = self.mode {
            return InputRequest::ConfirmationRequired { discards: from };
        }
        if self.mode == InputMode::FileSet && self.has_attachment {
            return self.park(InputKind::File);
        }
        InputRequest::Proceed(InputAction::OpenTextEditor {
            initial_text: self.text.clone(),
        })
    }

    fn park(&mut self, from: InputKind) -> InputRequest {
        debug!(slot = ?self.slot, ?from, "Input switch needs confirmation");
        self.mode = InputMode::PendingSwitchConfirmation { from };
        InputRequest::ConfirmationRequired { discards: from }
    }

    /// Discards the old kind's content and moves to the requested kind.
    /// Returns `None` when no switch was pending.
    pub fn confirm_switch(&mut self) -> Option<SwitchConfirmed> {
        let InputMode::PendingSwitchConfirmation { from } = self.mode else {
            return None;
        };
        let to = from.opposite();

        match from {
            InputKind::Text => self.text.clear(),
            InputKind::File => self.has_attachment = false,
        }
        self.mode = to.mode();
        debug!(slot = ?self.slot, ?from, ?to, "Input switch confirmed");

        let action = match to {
            InputKind::File => InputAction::OpenFilePicker,
            InputKind::Text => InputAction::OpenTextEditor {
                initial_text: String::new(),
            },
        };
        Some(SwitchConfirmed {
            discarded: from,
            action,
        })
    }

    /// Returns to the mode the slot was in before the request, or to `Empty`
    /// if that mode's content went away in the meantime.
    pub fn cancel_switch(&mut self) -> Option<SwitchCancelled> {
        let InputMode::PendingSwitchConfirmation { from } = self.mode else {
            return None;
        };
        let still_has_content = match from {
            InputKind::Text => self.has_text(),
            InputKind::File => self.has_attachment,
        };
        self.mode = if still_has_content {
            from.mode()
        } else {
            InputMode::Empty
        };
        Some(SwitchCancelled {
            reset_file_picker: from.opposite() == InputKind::File,
        })
    }

    pub fn submit_text(&mut self, text: &str) -> TextSubmission {
        if text.trim().is_empty() {
            return TextSubmission::Blank;
        }
        let actual = text.chars().count();
        if actual > self.max_text_length {
            return TextSubmission::TooLong {
                max: self.max_text_length,
                actual,
            };
        }
        if self.has_attachment || self.is_pending() {
            return TextSubmission::AttachmentPresent;
        }

        self.text = text.to_string();
        self.mode = InputMode::PastedText;

        let payload = match self.slot {
            InputSlot::Resume => SlotPayload::ResumeText(CandidateFile::from_pasted_text(text)),
            InputSlot::JobPosting => SlotPayload::JobText(self.text.clone()),
        };
        TextSubmission::Committed(payload)
    }

    /// The owner committed a non-empty attachment (files or URL).
    /// A pending switch stays pending.
    pub fn attachment_committed(&mut self) {
        self.has_attachment = true;
        if !self.is_pending() {
            self.mode = InputMode::FileSet;
        }
    }

    /// The owner's attachment became empty.
    pub fn attachment_cleared(&mut self) {
        self.has_attachment = false;
        if matches!(
            self.mode,
            InputMode::FileSet | InputMode::PendingSwitchConfirmation { from: InputKind::File }
        ) {
            self.mode = InputMode::Empty;
        }
    }

    /// Drops pasted text. Returns false when there was none.
    pub fn clear_text(&mut self) -> bool {
        if !self.has_text() {
            return false;
        }
        self.text.clear();
        if matches!(
            self.mode,
            InputMode::PastedText | InputMode::PendingSwitchConfirmation { from: InputKind::Text }
        ) {
            self.mode = InputMode::Empty;
        }
        true
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.slot, self.max_text_length);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::file::RESUME_TEXT_FILENAME;

    fn resume() -> InputReconciler {
        InputReconciler::new(InputSlot::Resume, 2000)
    }

    fn with_text(text: &str) -> InputReconciler {
        let mut r = resume();
        assert!(matches!(r.submit_text(text), TextSubmission::Committed(_)));
        r
    }

    #[test]
    fn test_empty_slot_opens_either_input_directly() {
        let mut r = resume();
        assert_eq!(r.request_file_input(), InputRequest::Proceed(InputAction::OpenFilePicker));
        assert_eq!(
            r.request_text_input(),
            InputRequest::Proceed(InputAction::OpenTextEditor {
                initial_text: String::new()
            })
        );
        assert_eq!(r.mode(), InputMode::Empty);
    }

    #[test]
    fn test_text_to_file_requires_confirmation() {
        let mut r = with_text("My résumé");
        assert_eq!(
            r.request_file_input(),
            InputRequest::ConfirmationRequired {
                discards: InputKind::Text
            }
        );
        // Nothing is cleared until confirmation.
        assert_eq!(r.text(), "My résumé");
        assert!(r.is_pending());

        let confirmed = r.confirm_switch().unwrap();
        assert_eq!(confirmed.discarded, InputKind::Text);
        assert_eq!(confirmed.action, InputAction::OpenFilePicker);
        assert_eq!(r.text(), "");
        assert_eq!(r.mode(), InputMode::FileSet);
    }

    #[test]
    fn test_cancel_restores_text_mode_and_resets_picker() {
        let mut r = with_text("keep me");
        r.request_file_input();
        let cancelled = r.cancel_switch().unwrap();
        assert!(cancelled.reset_file_picker);
        assert_eq!(r.mode(), InputMode::PastedText);
        assert_eq!(r.text(), "keep me");
    }

    #[test]
    fn test_file_to_text_requires_confirmation() {
        let mut r = resume();
        r.attachment_committed();
        assert_eq!(
            r.request_text_input(),
            InputRequest::ConfirmationRequired {
                discards: InputKind::File
            }
        );
        let confirmed = r.confirm_switch().unwrap();
        assert_eq!(confirmed.discarded, InputKind::File);
        assert_eq!(r.mode(), InputMode::PastedText);
        assert!(matches!(r.submit_text("new text"), TextSubmission::Committed(_)));
    }

    #[test]
    fn test_cancel_file_to_text_keeps_files_and_picker() {
        let mut r = resume();
        r.attachment_committed();
        r.request_text_input();
        let cancelled = r.cancel_switch().unwrap();
        assert!(!cancelled.reset_file_picker);
        assert_eq!(r.mode(), InputMode::FileSet);
    }

    #[test]
    fn test_whitespace_text_does_not_need_confirmation() {
        let mut r = resume();
        assert_eq!(r.submit_text("   \n"), TextSubmission::Blank);
        assert_eq!(r.request_file_input(), InputRequest::Proceed(InputAction::OpenFilePicker));
    }

    #[test]
    fn test_confirm_and_cancel_without_pending_are_noops() {
        let mut r = resume();
        assert!(r.confirm_switch().is_none());
        assert!(r.cancel_switch().is_none());
        assert_eq!(r.mode(), InputMode::Empty);
    }

    #[test]
    fn test_repeated_request_while_pending() {
        let mut r = with_text("abc");
        r.request_file_input();
        assert_eq!(
            r.request_text_input(),
            InputRequest::ConfirmationRequired {
                discards: InputKind::Text
            }
        );
    }

    #[test]
    fn test_submit_text_wraps_resume_artifact() {
        let mut r = resume();
        match r.submit_text("Jane Doe") {
            TextSubmission::Committed(SlotPayload::ResumeText(file)) => {
                assert_eq!(file.name, RESUME_TEXT_FILENAME);
                assert_eq!(&file.content[..], b"Jane Doe");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(r.mode(), InputMode::PastedText);
    }

    #[test]
    fn test_submit_text_for_job_slot() {
        let mut r = InputReconciler::new(InputSlot::JobPosting, 2000);
        assert_eq!(
            r.submit_text("Senior Rust Engineer"),
            TextSubmission::Committed(SlotPayload::JobText("Senior Rust Engineer".to_string()))
        );
    }

    #[test]
    fn test_submit_text_too_long() {
        let mut r = InputReconciler::new(InputSlot::Resume, 5);
        assert_eq!(
            r.submit_text("ééééééé"),
            TextSubmission::TooLong { max: 5, actual: 7 }
        );
        assert_eq!(r.mode(), InputMode::Empty);
    }

    #[test]
    fn test_submit_text_with_attachment_rejected() {
        let mut r = resume();
        r.attachment_committed();
        assert_eq!(r.submit_text("text"), TextSubmission::AttachmentPresent);
        assert_eq!(r.mode(), InputMode::FileSet);
    }

    #[test]
    fn test_attachment_cleared_returns_to_empty() {
        let mut r = resume();
        r.attachment_committed();
        r.attachment_cleared();
        assert_eq!(r.mode(), InputMode::Empty);
        assert_eq!(
            r.request_text_input(),
            InputRequest::Proceed(InputAction::OpenTextEditor {
                initial_text: String::new()
            })
        );
    }

    #[test]
    fn test_editing_existing_text_prefills_editor() {
        let mut r = with_text("draft");
        assert_eq!(
            r.request_text_input(),
            InputRequest::Proceed(InputAction::OpenTextEditor {
                initial_text: "draft".to_string()
            })
        );
    }

    #[test]
    fn test_attachment_cleared_while_pending_collapses_to_empty() {
        let mut r = resume();
        r.attachment_committed();
        r.request_text_input();
        r.attachment_cleared();
        assert_eq!(r.mode(), InputMode::Empty);
        assert!(r.cancel_switch().is_none());
        assert_eq!(r.mode(), InputMode::Empty);
    }

    #[test]
    fn test_cancel_without_remaining_content_goes_empty() {
        let mut r = with_text("draft");
        r.request_file_input();
        r.text.clear();
        r.cancel_switch().unwrap();
        assert_eq!(r.mode(), InputMode::Empty);
    }

    #[test]
    fn test_clear_text() {
        let mut r = with_text("draft");
        assert!(r.clear_text());
        assert_eq!(r.mode(), InputMode::Empty);
        assert_eq!(r.text(), "");
        assert!(!r.clear_text());
        assert_eq!(r.request_file_input(), InputRequest::Proceed(InputAction::OpenFilePicker));
    }
}
