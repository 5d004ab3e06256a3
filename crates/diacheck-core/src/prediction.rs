//! # Prediction Module
//!
//! What the prediction endpoint answers, and how it is shown.
//!
//! The endpoint replies with either
//! `{"probability_positive": 0.83, "diabetic": "Positive"}` or
//! `{"error": "...", "details": "..."}`. [`PredictionReply`] accepts both
//! shapes; [`PredictionReply::into_result`] decides which one it got.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Probability at or above which a reply without a label counts as Positive.
pub const POSITIVE_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    Positive,
    Negative,
}

impl Classification {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Classification::Positive => "Positive",
            Classification::Negative => "Negative",
        }
    }

    /// Label derived from the probability alone.
    #[must_use]
    pub fn from_probability(probability: f64) -> Self {
        if probability >= POSITIVE_THRESHOLD {
            Classification::Positive
        } else {
            Classification::Negative
        }
    }
}

/// A successful prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionResult {
    /// Probability of the positive class, in [0, 1].
    pub probability_positive: f64,
    pub diabetic: Classification,
}

impl PredictionResult {
    #[must_use]
    pub fn new(probability_positive: f64, diabetic: Classification) -> Self {
        Self {
            probability_positive,
            diabetic,
        }
    }

    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.diabetic == Classification::Positive
    }

    /// Probability as a percentage with one decimal, e.g. `"83.0%"`.
    #[must_use]
    #[allow(clippy::float_arithmetic)]
    pub fn percent_label(&self) -> String {
        format!("{:.1}%", self.probability_positive * 100.0)
    }

    /// `"Prediction: Positive"` or `"Prediction: Negative"`.
    #[must_use]
    pub fn headline(&self) -> String {
        format!("Prediction: {}", self.diabetic.as_str())
    }

    /// Follow-up advice for the classification.
    #[must_use]
    pub fn advice(&self) -> &'static str {
        match self.diabetic {
            Classification::Positive => {
                "Please consult with a healthcare professional for proper diagnosis and treatment."
            }
            Classification::Negative => {
                "Continue maintaining a healthy lifestyle with regular check-ups."
            }
        }
    }
}

/// Why a reply could not be turned into a [`PredictionResult`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplyError {
    /// The endpoint reported an error; `message` is shown verbatim.
    #[error("{message}")]
    Application {
        message: String,
        details: Option<String>,
    },

    /// The reply is well-formed JSON but not a usable prediction.
    #[error("invalid prediction reply: {0}")]
    Invalid(String),
}

/// Raw body returned by the prediction endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probability_positive: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diabetic: Option<Classification>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl PredictionReply {
    /// Interpret the reply.
    ///
    /// A non-empty `error` wins over everything else. Otherwise the
    /// probability must be present and within [0, 1]; a missing label is
    /// derived from it.
    pub fn into_result(self) -> Result<PredictionResult, ReplyError> {
        if let Some(message) = self.error.filter(|message| !message.is_empty()) {
            return Err(ReplyError::Application {
                message,
                details: self.details,
            });
        }

        let probability = self
            .probability_positive
            .ok_or_else(|| ReplyError::Invalid("missing probability_positive".to_string()))?;

        if !probability.is_finite() || !(0.0..=1.0).contains(&probability) {
            return Err(ReplyError::Invalid(format!(
                "probability_positive {} outside [0, 1]",
                probability
            )));
        }

        let diabetic = self
            .diabetic
            .unwrap_or_else(|| Classification::from_probability(probability));

        Ok(PredictionResult::new(probability, diabetic))
    }
}

// =============================================================================
// TESTS
// =============================================================================
