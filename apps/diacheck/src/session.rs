//! # Submission Driver
//!
//! Runs one wizard submission end to end: validate, send, record.

use crate::gateway::PredictionGateway;
use diacheck_core::{SubmissionState, SubmitBlocked, Wizard};
use tracing::{info, warn};

/// Submit the wizard's answers through `gateway`.
///
/// Missing answers block the submission before any request is made; the
/// wizard is then on the earliest incomplete step. Otherwise the wizard is
/// Loading for the duration of the request and ends up Succeeded or Failed.
/// Gateway failures never escape: they become the Failed message.
pub async fn submit<'w, G: PredictionGateway>(
    wizard: &'w mut Wizard,
    gateway: &G,
) -> Result<&'w SubmissionState, SubmitBlocked> {
    let payload = match wizard.begin_submit() {
        Ok(payload) => payload,
        Err(blocked) => {
            info!(reason = %blocked, missing = wizard.errors().len(), "submission blocked");
            return Err(blocked);
        }
    };

    info!(fields = payload.filled_count(), "submitting assessment");
    let outcome = match gateway.predict(&payload).await {
        Ok(result) => {
            info!(
                probability = result.probability_positive,
                diabetic = result.diabetic.as_str(),
                "prediction received"
            );
            Ok(result)
        }
        Err(err) => {
            warn!(error = %err, "prediction failed");
            Err(err.user_message())
        }
    };

    wizard.complete_submit(outcome);
    Ok(wizard.submission())
}
