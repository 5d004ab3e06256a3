//! Integration tests for the submission driver.
//!
//! Uses an in-memory gateway that records every call.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic, clippy::float_arithmetic)]

mod common;

use common::{StubGateway, complete_wizard, fill};
use diacheck::gateway::CONNECTION_FAILED;
use diacheck::session;
use diacheck_core::{
    Classification, Field, HealthProfile, Step, SubmissionState, SubmitBlocked, Wizard,
};

// =============================================================================
// SCENARIOS
// =============================================================================

#[tokio::test]
async fn test_complete_profile_shows_prediction() {
    let gateway = StubGateway::replying(r#"{"probability_positive":0.83,"diabetic":"Positive"}"#);
    let mut wizard = complete_wizard();

    let state = session::submit(&mut wizard, &gateway).await.unwrap();
    let result = state.result().unwrap();

    assert_eq!(result.percent_label(), "83.0%");
    assert_eq!(result.headline(), "Prediction: Positive");
    assert_eq!(gateway.calls(), 1);
}

#[tokio::test]
async fn test_missing_age_blocks_advance_without_request() {
    let gateway = StubGateway::replying(r#"{"probability_positive":0.1}"#);
    let mut wizard = Wizard::new();
    fill(&mut wizard, Step::One);
    wizard.update_field(Field::Age, "").unwrap();

    assert!(!wizard.advance());
    assert_eq!(wizard.step(), Step::One);
    assert!(wizard.errors().contains(Field::Age));

    let blocked = session::submit(&mut wizard, &gateway).await.unwrap_err();
    assert_eq!(blocked, SubmitBlocked::Invalid { step: Step::One });
    assert_eq!(gateway.calls(), 0);
}

#[tokio::test]
async fn test_network_failure_keeps_form_and_allows_retry() {
    let gateway = StubGateway::offline();
    let mut wizard = complete_wizard();
    wizard.advance();
    wizard.advance();
    let profile_before = wizard.profile().clone();

    let state = session::submit(&mut wizard, &gateway).await.unwrap();
    assert_eq!(state, &SubmissionState::Failed(CONNECTION_FAILED.to_string()));
    assert!(state.error().unwrap().starts_with("Failed to connect to backend"));
    assert_eq!(wizard.step(), Step::Three);
    assert_eq!(wizard.profile(), &profile_before);

    // A second attempt is another single request.
    let state = session::submit(&mut wizard, &gateway).await.unwrap();
    assert!(state.error().is_some());
    assert_eq!(gateway.calls(), 2);
}

#[tokio::test]
async fn test_missing_step_three_answers_jump_back_without_request() {
    let gateway = StubGateway::replying(r#"{"probability_positive":0.5}"#);
    let mut wizard = Wizard::new();
    fill(&mut wizard, Step::One);
    wizard.advance();
    fill(&mut wizard, Step::Two);
    wizard.advance();
    wizard.update_field(Field::Weakness, "").unwrap();
    assert_eq!(wizard.step(), Step::Three);

    let blocked = session::submit(&mut wizard, &gateway).await.unwrap_err();

    assert_eq!(blocked, SubmitBlocked::Invalid { step: Step::Two });
    assert_eq!(wizard.step(), Step::Two);
    assert!(wizard.errors().contains(Field::Weakness));
    assert!(wizard.errors().contains(Field::Obesity));
    assert_eq!(wizard.submission(), &SubmissionState::Idle);
    assert_eq!(gateway.calls(), 0);
}

#[tokio::test]
async fn test_application_error_is_shown_verbatim() {
    let gateway = StubGateway::replying(r#"{"error":"No model file found in the 'api' directory."}"#);
    let mut wizard = complete_wizard();

    let state = session::submit(&mut wizard, &gateway).await.unwrap();

    assert_eq!(
        state.error(),
        Some("No model file found in the 'api' directory.")
    );
}

#[tokio::test]
async fn test_probability_is_echoed_into_percentage() {
    for probability in [0.0, 0.05, 0.333, 0.5, 0.999, 1.0] {
        let body = serde_json::json!({
            "probability_positive": probability,
            "diabetic": Classification::from_probability(probability),
        })
        .to_string();
        let gateway = StubGateway::replying(body);
        let mut wizard = complete_wizard();

        let state = session::submit(&mut wizard, &gateway).await.unwrap();
        let result = state.result().unwrap();

        assert_eq!(result.probability_positive, probability);
        assert_eq!(result.percent_label(), format!("{:.1}%", probability * 100.0));
    }
}

#[tokio::test]
async fn test_payload_round_trips_through_wire_format() {
    let gateway = StubGateway::replying(r#"{"probability_positive":0.2,"diabetic":"Negative"}"#);
    let mut wizard = complete_wizard();

    session::submit(&mut wizard, &gateway).await.unwrap();

    let sent = gateway.sent();
    let decoded: HealthProfile = serde_json::from_str(&sent[0]).unwrap();
    assert_eq!(&decoded, wizard.profile());
    assert!(sent[0].contains(r#""sudden weight loss":"No""#));
}

#[tokio::test]
async fn test_reset_after_result() {
    let gateway = StubGateway::replying(r#"{"probability_positive":0.2,"diabetic":"Negative"}"#);
    let mut wizard = complete_wizard();
    session::submit(&mut wizard, &gateway).await.unwrap();

    wizard.reset();

    assert_eq!(wizard, Wizard::new());
}
