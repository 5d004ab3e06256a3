//! # Wizard Module
//!
//! The multi-step assessment state machine.
//!
//! A [`Wizard`] owns the current step, the answers, the validation errors of
//! the last navigation attempt and the submission state. It is a plain value:
//! each front end creates its own and passes it around by reference.
//!
//! Submission is split in two so the wizard never performs I/O itself:
//!
//! ```text
//! begin_submit()  ── invalid ──► jump to earliest invalid step, Idle
//!       │
//!       ▼ (payload)
//!    Loading ── caller sends payload ──► complete_submit(outcome)
//!                                              │
//!                                 Succeeded(result) / Failed(message)
//! ```

use crate::SchemaError;
use crate::prediction::PredictionResult;
use crate::profile::HealthProfile;
use crate::schema::{Field, FieldSpec, Step};
use crate::validation::{ValidationErrors, errors_for_all_steps, errors_for_step};
use thiserror::Error;

/// Where the last submission stands.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SubmissionState {
    #[default]
    Idle,
    Loading,
    Succeeded(PredictionResult),
    Failed(String),
}

impl SubmissionState {
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, SubmissionState::Loading)
    }

    #[must_use]
    pub fn result(&self) -> Option<&PredictionResult> {
        match self {
            SubmissionState::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            SubmissionState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Why [`Wizard::begin_submit`] did not start a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitBlocked {
    /// Required fields are missing; the wizard moved to `step`.
    #[error("step {step} has missing answers")]
    Invalid { step: Step },

    /// A previous submission has not completed yet.
    #[error("a submission is already in progress")]
    InFlight,
}

/// The assessment wizard.
#[derive(Debug, Clone, PartialEq)]
pub struct Wizard {
    step: Step,
    profile: HealthProfile,
    errors: ValidationErrors,
    submission: SubmissionState,
}

impl Default for Wizard {
    fn default() -> Self {
        Self::new()
    }
}

impl Wizard {
    /// A wizard on step 1 with an empty profile.
    #[must_use]
    pub fn new() -> Self {
        Self::with_profile(HealthProfile::new())
    }

    /// A wizard on step 1 with pre-filled answers.
    #[must_use]
    pub fn with_profile(profile: HealthProfile) -> Self {
        Self {
            step: Step::FIRST,
            profile,
            errors: ValidationErrors::new(),
            submission: SubmissionState::Idle,
        }
    }

    #[must_use]
    pub fn step(&self) -> Step {
        self.step
    }

    #[must_use]
    pub fn profile(&self) -> &HealthProfile {
        &self.profile
    }

    #[must_use]
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    #[must_use]
    pub fn submission(&self) -> &SubmissionState {
        &self.submission
    }

    /// Fields shown on the current step.
    pub fn current_fields(&self) -> impl Iterator<Item = &'static FieldSpec> + use<> {
        self.step.fields()
    }

    /// Progress through the steps as a whole percentage (33, 66, 100).
    #[must_use]
    pub fn progress_percent(&self) -> u8 {
        let total = Step::ALL.len() as u32;
        (u32::from(self.step.number()) * 100 / total) as u8
    }

    /// Move to the next step if the current one is complete.
    ///
    /// Returns `true` when the current step validated. On failure the step
    /// is unchanged and [`Wizard::errors`] lists the missing fields.
    pub fn advance(&mut self) -> bool {
        let errors = errors_for_step(self.step, &self.profile);
        if !errors.is_empty() {
            self.errors = errors;
            return false;
        }
        self.errors.clear();
        self.step = self.step.next();
        true
    }

    /// Move to the previous step. Errors are always cleared.
    pub fn retreat(&mut self) {
        self.step = self.step.prev();
        self.errors.clear();
    }

    /// Overwrite one answer and clear its error.
    ///
    /// Invalid input is rejected and leaves both the answer and its error as
    /// they were.
    pub fn update_field(&mut self, field: Field, raw: &str) -> Result<(), SchemaError> {
        self.profile.set(field, raw)?;
        self.errors.remove(field);
        Ok(())
    }

    /// Validate every step and, if all answers are present, enter Loading.
    ///
    /// Returns the payload to send. When answers are missing, the wizard
    /// jumps to the earliest step holding one and records the errors of all
    /// steps.
    pub fn begin_submit(&mut self) -> Result<HealthProfile, SubmitBlocked> {
        if self.submission.is_loading() {
            return Err(SubmitBlocked::InFlight);
        }

        let errors = errors_for_all_steps(&self.profile);
        if let Some(step) = errors.first_step() {
            self.step = step;
            self.errors = errors;
            return Err(SubmitBlocked::Invalid { step });
        }

        self.errors.clear();
        self.submission = SubmissionState::Loading;
        Ok(self.profile.clone())
    }

    /// Leave Loading with the gateway's outcome.
    pub fn complete_submit(&mut self, outcome: Result<PredictionResult, String>) {
        self.submission = match outcome {
            Ok(result) => SubmissionState::Succeeded(result),
            Err(message) => SubmissionState::Failed(message),
        };
    }

    /// Dismiss a failure banner, returning to Idle. Other states are kept.
    pub fn dismiss_error(&mut self) {
        if matches!(self.submission, SubmissionState::Failed(_)) {
            self.submission = SubmissionState::Idle;
        }
    }

    /// Back to step 1 with an empty profile, no errors and no submission.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

// =============================================================================
// TESTS
// =============================================================================
