use crate::models::CandidateFile;

/// Models a native file-picker control.
///
/// Pickers only fire a change event when their value differs from the last
/// selection, so re-picking the same file after removing it is silently
/// ignored unless the control is cleared first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilePickerControl {
    value: Option<String>,
}

impl FilePickerControl {
    /// Records a selection. Returns `false` when nothing changed and the
    /// selection should be ignored.
    pub fn select(&mut self, files: &[CandidateFile]) -> bool {
        if files.is_empty() {
            return false;
        }
        let value = files
            .iter()
            .map(|f| f.name.as_str())
            .collect::<Vec<_>>()
            .join(",");
        if self.value.as_deref() == Some(value.as_str()) {
            return false;
        }
        self.value = Some(value);
        true
    }

    pub fn clear(&mut self) {
        self.value = None;
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}
