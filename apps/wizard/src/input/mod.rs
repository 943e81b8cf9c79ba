// Input slots: the résumé (file set or pasted text) and the job posting (URL or pasted text).

pub mod file_set;
pub mod job;
pub mod picker;
pub mod reconciler;
pub mod resume;

pub use file_set::{FileSetManager, Selection};
pub use job::{JobInput, JobSwitch, UrlSubmission};
pub use picker::FilePickerControl;
pub use reconciler::{
    InputAction, InputKind, InputMode, InputReconciler, InputRequest, InputSlot, SlotPayload,
    SwitchCancelled, SwitchConfirmed, TextSubmission,
};
pub use resume::ResumeInput;
