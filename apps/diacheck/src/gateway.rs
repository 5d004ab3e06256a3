//! # Prediction Gateway
//!
//! Sends a completed [`HealthProfile`] to the prediction endpoint and reads
//! back a [`PredictionResult`].
//!
//! One POST per submission, no retries. The wizard only cares about two
//! outcomes: a result, or a message to show. [`GatewayError::user_message`]
//! collapses the error taxonomy into that message:
//!
//! | Error                         | Shown to the user                  |
//! |-------------------------------|------------------------------------|
//! | `Application` (`{"error"}`)   | the endpoint's message, verbatim   |
//! | `Transport` / `Decode` / `InvalidResponse` | [`CONNECTION_FAILED`] |

use crate::config::AppConfig;
use diacheck_core::{HealthProfile, PredictionReply, PredictionResult, ReplyError};
use serde::{Deserialize, Serialize};
use std::future::Future;
use thiserror::Error;
use tracing::{debug, warn};

/// Message shown for every failure that is not reported by the endpoint.
pub const CONNECTION_FAILED: &str =
    "Failed to connect to backend. Please make sure the server is running.";

// =============================================================================
// ERROR TYPE
// =============================================================================

/// Errors from the prediction gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Connection, timeout or HTTP client failure.
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The body was not the expected JSON.
    #[error("JSON error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The endpoint answered with an `error` field.
    #[error("{message}")]
    Application {
        message: String,
        details: Option<String>,
    },

    /// The endpoint answered with JSON that is not a usable prediction.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl GatewayError {
    /// The text to show in place of a result.
    pub fn user_message(&self) -> String {
        match self {
            GatewayError::Application { message, .. } => message.clone(),
            _ => CONNECTION_FAILED.to_string(),
        }
    }
}

impl From<ReplyError> for GatewayError {
    fn from(err: ReplyError) -> Self {
        match err {
            ReplyError::Application { message, details } => {
                GatewayError::Application { message, details }
            }
            ReplyError::Invalid(reason) => GatewayError::InvalidResponse(reason),
        }
    }
}

// =============================================================================
// GATEWAY TRAIT
// =============================================================================

/// Anything that can turn a complete profile into a prediction.
pub trait PredictionGateway {
    fn predict(
        &self,
        profile: &HealthProfile,
    ) -> impl Future<Output = Result<PredictionResult, GatewayError>> + Send;
}

// =============================================================================
// HTTP GATEWAY
// =============================================================================

/// Health probe response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

/// JSON-over-HTTP client for the prediction service.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    predict_url: String,
    health_url: String,
    client: reqwest::Client,
}

impl HttpGateway {
    /// Create a gateway for the configured service, applying its timeout to
    /// every request.
    pub fn new(config: &AppConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            predict_url: config.predict_url(),
            health_url: config.health_url(),
            client,
        })
    }

    pub fn predict_url(&self) -> &str {
        &self.predict_url
    }

    /// Probe the service's health endpoint.
    pub async fn health(&self) -> Result<HealthResponse, GatewayError> {
        debug!(url = %self.health_url, "probing prediction service");
        let body = self.client.get(&self.health_url).send().await?.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

impl PredictionGateway for HttpGateway {
    async fn predict(&self, profile: &HealthProfile) -> Result<PredictionResult, GatewayError> {
        debug!(url = %self.predict_url, fields = profile.filled_count(), "sending profile");

        let response = self
            .client
            .post(&self.predict_url)
            .json(profile)
            .send()
            .await
            .inspect_err(|e| warn!(error = %e, "prediction request failed"))?;

        // Error replies arrive with a 5xx status and a JSON body, so the
        // status alone decides nothing.
        let status = response.status();
        let body = response.bytes().await?;
        debug!(%status, bytes = body.len(), "prediction reply received");

        let reply: PredictionReply = serde_json::from_slice(&body)
            .inspect_err(|e| warn!(%status, error = %e, "prediction reply is not JSON"))?;

        reply.into_result().map_err(|err| {
            match &err {
                ReplyError::Application { message, details } => {
                    debug!(%status, %message, details = ?details, "prediction service reported an error");
                }
                ReplyError::Invalid(reason) => {
                    warn!(%status, %reason, "unusable prediction reply");
                }
            }
            GatewayError::from(err)
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
