//! State for the six-step report assembly flow.
//!
//! The frontend is presentation only; everything it needs to remember lives
//! in [`WizardState`], a plain value with explicit update functions.  Each
//! operation returns the next state (or an error and no state change), so
//! there is no shared mutable flow state anywhere.

use thiserror::Error;

use crate::model::{ReportData, ReportPatch};
use crate::render::{self, RenderError, RenderedReport};

/// The fixed step sequence of the report flow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Choose the facility.
    Site,
    /// Select the equipment.
    Machine,
    /// Pick the report format.
    ReportType,
    /// Fill in report details and labor entries.
    DataEntry,
    /// Review and edit before download.
    Preview,
    /// The report has been generated.
    Download,
}

impl Step {
    /// Total number of steps in the flow.
    pub const COUNT: usize = 6;

    /// Returns the 1-based step number.
    pub fn number(self) -> usize {
        match self {
            Step::Site => 1,
            Step::Machine => 2,
            Step::ReportType => 3,
            Step::DataEntry => 4,
            Step::Preview => 5,
            Step::Download => 6,
        }
    }

    /// Returns the step indicator title.
    pub fn title(self) -> &'static str {
        match self {
            Step::Site => "Site",
            Step::Machine => "Machine",
            Step::ReportType => "Report Type",
            Step::DataEntry => "Data Entry",
            Step::Preview => "Preview",
            Step::Download => "Download",
        }
    }

    /// Returns the step indicator description.
    pub fn description(self) -> &'static str {
        match self {
            Step::Site => "Choose location",
            Step::Machine => "Select equipment",
            Step::ReportType => "Pick format",
            Step::DataEntry => "Fill details",
            Step::Preview => "Review & edit",
            Step::Download => "Get PDF",
        }
    }
}

/// A required field was missing at a step boundary.
///
/// Non-fatal: the frontend re-prompts the user and the state is unchanged.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// No site selected at the end of step 1.
    #[error("Please select a site before proceeding.")]
    MissingSite,
    /// No machine selected at the end of step 2.
    #[error("Please select a machine before proceeding.")]
    MissingMachine,
    /// No report type selected at the end of step 3.
    #[error("Please select a report type before proceeding.")]
    MissingReportType,
    /// Engineer name or date missing at the end of step 4.
    #[error("Please fill in engineer name and date.")]
    MissingRequiredFields,
}

/// The complete state of one in-progress report flow.
#[derive(Clone, Debug, PartialEq)]
pub struct WizardState {
    step: Step,
    draft: ReportData,
}

impl WizardState {
    /// Starts a fresh flow at step 1 with a default draft.
    pub fn new() -> Self {
        Self {
            step: Step::Site,
            draft: ReportData::new(),
        }
    }

    /// Returns the current step.
    pub fn step(&self) -> Step {
        self.step
    }

    /// Returns the report draft.
    pub fn draft(&self) -> &ReportData {
        &self.draft
    }

    /// Merges a patch into the draft and returns the updated state.
    pub fn update_draft(&self, patch: ReportPatch) -> Self {
        Self {
            step: self.step,
            draft: self.draft.update(patch),
        }
    }

    /// Replaces the whole draft and returns the updated state.
    ///
    /// Used by the data-entry step, whose labor operations already produce
    /// complete [`ReportData`] values.
    pub fn with_draft(&self, draft: ReportData) -> Self {
        Self {
            step: self.step,
            draft,
        }
    }

    /// Moves to the next step if the current step's required fields are
    /// filled in; otherwise returns the validation error and the caller
    /// keeps the unchanged state.
    ///
    /// Advancing stops at [`Step::Preview`]; [`Step::Download`] is reached
    /// only through a successful [`WizardState::download`].
    pub fn advance(&self) -> Result<Self, ValidationError> {
        let next = match self.step {
            Step::Site => {
                if self.draft.site().is_empty() {
                    return Err(ValidationError::MissingSite);
                }
                Step::Machine
            }
            Step::Machine => {
                if self.draft.machine().is_empty() {
                    return Err(ValidationError::MissingMachine);
                }
                Step::ReportType
            }
            Step::ReportType => {
                if self.draft.report_type().is_empty() {
                    return Err(ValidationError::MissingReportType);
                }
                Step::DataEntry
            }
            Step::DataEntry => {
                if self.draft.engineer_name().is_empty() || self.draft.date().is_empty() {
                    return Err(ValidationError::MissingRequiredFields);
                }
                Step::Preview
            }
            Step::Preview | Step::Download => self.step,
        };
        Ok(Self {
            step: next,
            draft: self.draft.clone(),
        })
    }

    /// Moves to the previous step, clamped at step 1.
    pub fn back(&self) -> Self {
        let previous = match self.step {
            Step::Site | Step::Machine => Step::Site,
            Step::ReportType => Step::Machine,
            Step::DataEntry => Step::ReportType,
            Step::Preview => Step::DataEntry,
            Step::Download => Step::Preview,
        };
        Self {
            step: previous,
            draft: self.draft.clone(),
        }
    }

    /// Runs layout and emission for the draft in one synchronous pass.
    ///
    /// On success the returned state sits at [`Step::Download`]; on failure
    /// the caller keeps the unchanged state and may retry.
    pub fn download(&self) -> Result<(RenderedReport, Self), RenderError> {
        let rendered = render::render_report(&self.draft)?;
        let next = Self {
            step: Step::Download,
            draft: self.draft.clone(),
        };
        Ok((rendered, next))
    }

    /// Discards the draft and starts over at step 1.
    pub fn reset(&self) -> Self {
        Self::new()
    }
}

impl Default for WizardState {
    fn default() -> Self {
        Self::new()
    }
}
