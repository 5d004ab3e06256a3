//! Integration tests for the HTTP prediction gateway.
//!
//! Uses wiremock to mock the prediction service.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use diacheck::config::AppConfig;
use diacheck::gateway::{CONNECTION_FAILED, GatewayError, HttpGateway, PredictionGateway};
use diacheck_core::{Classification, Field, HealthProfile};
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

fn complete_profile() -> HealthProfile {
    let mut profile = HealthProfile::baseline();
    profile.set(Field::Age, "45").unwrap();
    profile.set(Field::Polyuria, "Yes").unwrap();
    profile.set(Field::SuddenWeightLoss, "Yes").unwrap();
    profile
}

/// A gateway pointed at a local port nothing listens on.
fn unreachable_gateway() -> HttpGateway {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    let config = AppConfig::for_base_url(&format!("http://127.0.0.1:{port}")).unwrap();
    HttpGateway::new(&config).unwrap()
}

fn gateway_for(server: &MockServer) -> HttpGateway {
    let config = AppConfig::for_base_url(&server.uri()).unwrap();
    HttpGateway::new(&config).unwrap()
}

// =============================================================================
// SUCCESS
// =============================================================================

#[tokio::test]
async fn test_predict_posts_wire_payload() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/predict"))
        .and(header("content-type", "application/json"))
        .and(body_json(serde_json::json!({
            "Age": "45",
            "Gender": "Male",
            "Polyuria": "Yes",
            "Polydipsia": "No",
            "sudden weight loss": "Yes",
            "weakness": "No",
            "Polyphagia": "No",
            "Genital thrush": "No",
            "visual blurring": "No",
            "Itching": "No",
            "Irritability": "No",
            "delayed healing": "No",
            "partial paresis": "No",
            "muscle stiffness": "No",
            "Alopecia": "No",
            "Obesity": "No"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "probability_positive": 0.83,
            "diabetic": "Positive"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = gateway_for(&server)
        .predict(&complete_profile())
        .await
        .unwrap();

    assert_eq!(result.probability_positive, 0.83);
    assert_eq!(result.diabetic, Classification::Positive);
    assert_eq!(result.percent_label(), "83.0%");
    assert_eq!(result.headline(), "Prediction: Positive");
}

#[tokio::test]
async fn test_predict_derives_label_from_probability() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "probability_positive": 0.12
        })))
        .mount(&server)
        .await;

    let result = gateway_for(&server)
        .predict(&complete_profile())
        .await
        .unwrap();

    assert_eq!(result.diabetic, Classification::Negative);
    assert_eq!(result.percent_label(), "12.0%");
}

#[tokio::test]
async fn test_predict_uses_configured_path() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "probability_positive": 0.4,
            "diabetic": "Negative"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = AppConfig::for_base_url(&server.uri()).unwrap();
    config.predict_path = "/predict".to_string();
    let gateway = HttpGateway::new(&config).unwrap();

    assert!(gateway.predict(&complete_profile()).await.is_ok());
}

// =============================================================================
// FAILURES
// =============================================================================

#[tokio::test]
async fn test_predict_reports_application_error_verbatim() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/predict"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "error": "Prediction failed due to an internal error.",
            "details": "could not convert string to float"
        })))
        .mount(&server)
        .await;

    let err = gateway_for(&server)
        .predict(&complete_profile())
        .await
        .unwrap_err();

    match &err {
        GatewayError::Application { message, details } => {
            assert_eq!(message, "Prediction failed due to an internal error.");
            assert_eq!(details.as_deref(), Some("could not convert string to float"));
        }
        other => panic!("expected application error, got {other:?}"),
    }
    assert_eq!(err.user_message(), "Prediction failed due to an internal error.");
}

#[tokio::test]
async fn test_predict_non_json_reply_is_connection_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/predict"))
        .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let err = gateway_for(&server)
        .predict(&complete_profile())
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::Decode(_)));
    assert_eq!(err.user_message(), CONNECTION_FAILED);
}

#[tokio::test]
async fn test_predict_out_of_range_probability_is_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/predict"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "probability_positive": 83.0,
            "diabetic": "Positive"
        })))
        .mount(&server)
        .await;

    let err = gateway_for(&server)
        .predict(&complete_profile())
        .await
        .unwrap_err();

    assert!(matches!(err, GatewayError::InvalidResponse(_)));
    assert_eq!(err.user_message(), CONNECTION_FAILED);
}

#[tokio::test]
async fn test_predict_unreachable_server_is_transport_error() {
    let gateway = unreachable_gateway();

    let err = gateway.predict(&complete_profile()).await.unwrap_err();

    assert!(matches!(err, GatewayError::Transport(_)));
    assert_eq!(err.user_message(), CONNECTION_FAILED);
}

#[tokio::test]
async fn test_predict_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/predict"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"probability_positive": 0.5}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let config = AppConfig::for_base_url(&server.uri())
        .unwrap()
        .with_timeout(Duration::from_millis(200));
    let gateway = HttpGateway::new(&config).unwrap();

    let err = gateway.predict(&complete_profile()).await.unwrap_err();
    match err {
        GatewayError::Transport(e) => assert!(e.is_timeout()),
        other => panic!("expected timeout, got {other:?}"),
    }
}

// =============================================================================
// HEALTH
// =============================================================================

#[tokio::test]
async fn test_health_ok() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/health"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "ok"
        })))
        .mount(&server)
        .await;

    let health = gateway_for(&server).health().await.unwrap();
    assert!(health.is_ok());
}

#[tokio::test]
async fn test_health_unreachable() {
    let gateway = unreachable_gateway();

    assert!(matches!(
        gateway.health().await,
        Err(GatewayError::Transport(_))
    ));
}
