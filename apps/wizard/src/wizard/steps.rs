use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::template::{resolve_template, TEMPLATES};
use crate::models::{CandidateFile, Template};

/// Wizard steps in their strict forward order.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    #[default]
    Upload,
    TemplateSelection,
    JobDetailsReview,
    Generating,
    Preview,
}

impl Step {
    pub const ALL: [Step; 5] = [
        Step::Upload,
        Step::TemplateSelection,
        Step::JobDetailsReview,
        Step::Generating,
        Step::Preview,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn title(self) -> &'static str {
        match self {
            Step::Upload => "Upload",
            Step::TemplateSelection => "Choose a template",
            Step::JobDetailsReview => "Review job details",
            Step::Generating => "Generating",
            Step::Preview => "Preview",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Moved { from: Step, to: Step },
    /// Upload has everything but a profile picture; the user must choose first.
    PictureWarningRaised,
    /// Precondition not met. Nothing changed and nothing is reported.
    Blocked,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WizardState {
    current_step: Step,
    pub cv_file: Option<CandidateFile>,
    pub job_url: Option<String>,
    pub job_details: String,
    pub profile_picture: Option<CandidateFile>,
    pub selected_template_id: Option<String>,
    pub ai_instructions: String,
    pub is_processing_url: bool,
    pub show_picture_warning: bool,
    pub reset_at: Option<DateTime<Utc>>,
}

impl WizardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_step(&self) -> Step {
        self.current_step
    }

    fn has_job_input(&self) -> bool {
        self.job_url.as_deref().is_some_and(|u| !u.is_empty())
            || !self.job_details.trim().is_empty()
    }

    /// Whether `Next` may leave the current step.
    pub fn precondition_met(&self) -> bool {
        match self.current_step {
            Step::Upload => self.cv_file.is_some() && self.has_job_input(),
            Step::TemplateSelection => self.selected_template_id.is_some(),
            Step::JobDetailsReview => !self.job_details.trim().is_empty(),
            Step::Generating | Step::Preview => false,
        }
    }

    pub fn next(&mut self) -> Transition {
        if !self.precondition_met() {
            return Transition::Blocked;
        }
        match self.current_step {
            Step::Upload if self.profile_picture.is_none() => {
                self.show_picture_warning = true;
                Transition::PictureWarningRaised
            }
            Step::Upload => self.move_to(Step::TemplateSelection),
            Step::TemplateSelection => self.move_to(Step::JobDetailsReview),
            Step::JobDetailsReview => self.move_to(Step::Generating),
            Step::Generating | Step::Preview => Transition::Blocked,
        }
    }

    pub fn back(&mut self) -> Transition {
        match self.current_step {
            Step::Upload | Step::Preview => Transition::Blocked,
            Step::TemplateSelection => self.move_to(Step::Upload),
            Step::JobDetailsReview => self.move_to(Step::TemplateSelection),
            Step::Generating => self.move_to(Step::JobDetailsReview),
        }
    }

    /// Dismisses the picture warning and leaves Upload anyway.
    pub fn continue_without_picture(&mut self) -> Transition {
        if !self.show_picture_warning {
            return Transition::Blocked;
        }
        self.show_picture_warning = false;
        if self.current_step != Step::Upload || !self.precondition_met() {
            return Transition::Blocked;
        }
        self.move_to(Step::TemplateSelection)
    }

    /// Dismisses the picture warning and stays on Upload.
    pub fn add_picture_instead(&mut self) {
        self.show_picture_warning = false;
    }

    /// Generation finished; the only way into Preview.
    pub fn finish_generation(&mut self) -> Transition {
        if self.current_step != Step::Generating {
            return Transition::Blocked;
        }
        self.move_to(Step::Preview)
    }

    pub fn reset(&mut self) {
        *self = Self {
            reset_at: Some(Utc::now()),
            ..Self::default()
        };
        debug!("Wizard reset");
    }

    /// The chosen template, or the first catalog entry when none is chosen.
    pub fn selected_template(&self) -> Option<&'static Template> {
        resolve_template(TEMPLATES, self.selected_template_id.as_deref())
    }

    fn move_to(&mut self, to: Step) -> Transition {
        let from = self.current_step;
        self.current_step = to;
        debug!(?from, ?to, "Wizard step changed");
        Transition::Moved { from, to }
    }
}
