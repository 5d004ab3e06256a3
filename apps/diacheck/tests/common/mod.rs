//! Shared test helpers.

#![allow(dead_code, clippy::unwrap_used)]

use diacheck::gateway::{GatewayError, PredictionGateway};
use diacheck_core::{Field, HealthProfile, PredictionReply, PredictionResult, Step, Wizard};
use std::sync::Mutex;

/// Replays a canned reply body and remembers every payload it was sent.
pub struct StubGateway {
    reply: Option<String>,
    sent: Mutex<Vec<String>>,
}

impl StubGateway {
    /// Answers every call with `body`, interpreted like a real reply.
    pub fn replying(body: impl Into<String>) -> Self {
        Self {
            reply: Some(body.into()),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Fails every call as if the service were down.
    pub fn offline() -> Self {
        Self {
            reply: None,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    /// JSON payloads received so far.
    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

impl PredictionGateway for StubGateway {
    async fn predict(&self, profile: &HealthProfile) -> Result<PredictionResult, GatewayError> {
        let payload = serde_json::to_string(profile)?;
        self.sent.lock().unwrap().push(payload);
        match &self.reply {
            Some(body) => {
                let reply: PredictionReply = serde_json::from_str(body)?;
                Ok(reply.into_result()?)
            }
            None => Err(GatewayError::InvalidResponse("service offline".to_string())),
        }
    }
}

/// Answer every field of `step`: Age 57, Female, Yes to the first two
/// symptoms, No to the rest.
pub fn fill(wizard: &mut Wizard, step: Step) {
    for spec in step.fields() {
        let value = match spec.field {
            Field::Age => "57",
            Field::Gender => "Female",
            Field::Polyuria | Field::Polydipsia => "Yes",
            _ => "No",
        };
        wizard.update_field(spec.field, value).unwrap();
    }
}

pub fn complete_wizard() -> Wizard {
    let mut wizard = Wizard::new();
    for step in Step::ALL {
        fill(&mut wizard, step);
    }
    wizard
}
