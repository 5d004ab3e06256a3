//! # DiaCheck Core
//!
//! The assessment wizard behind DiaCheck.
//!
//! This crate holds everything that decides *what* the questionnaire is and
//! *when* it may be submitted:
//! - [`schema`]: the ordered field table, grouped into three steps
//! - [`profile`]: the answers collected so far ([`HealthProfile`])
//! - [`validation`]: per-step required-field checks
//! - [`wizard`]: the step / submission state machine ([`Wizard`])
//! - [`prediction`]: the result returned by the prediction endpoint
//!
//! The crate performs no I/O. Sending the profile to the prediction endpoint
//! is the job of the application layer (`apps/diacheck`), which drives
//! [`Wizard::begin_submit`] and [`Wizard::complete_submit`] around its own
//! network call.

pub mod prediction;
pub mod profile;
pub mod schema;
pub mod validation;
pub mod wizard;

pub use prediction::{
    Classification, POSITIVE_THRESHOLD, PredictionReply, PredictionResult, ReplyError,
};
pub use profile::{Answer, Gender, HealthProfile, YesNo};
pub use schema::{FIELDS, Field, FieldKind, FieldSpec, Step};
pub use validation::{
    ValidationErrors, errors_for_all_steps, errors_for_step, first_invalid_step,
};
pub use wizard::{SubmissionState, SubmitBlocked, Wizard};

use thiserror::Error;

// =============================================================================
// ERROR TYPE
// =============================================================================

/// Errors raised while reading answers into a [`HealthProfile`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The key does not name any field of the questionnaire.
    #[error("unknown field: {0:?}")]
    UnknownField(String),

    /// The value cannot be stored in the field (e.g. "maybe" for a Yes/No).
    #[error("invalid value {value:?} for {field}")]
    InvalidValue { field: &'static str, value: String },
}
