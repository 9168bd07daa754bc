//! HTTP behaviour of GeminiGateway against a local mock server.
//!
//! Run with: cargo test -p gemini-gateway --test http_tests

use gemini_gateway::{
    AssistError, GeminiGateway, GeminiGatewayConfig, ModelGateway, ModelRequest, Operation,
};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ENDPOINT: &str = "/v1beta/models/gemini-test:generateContent";

fn gateway_for(server: &MockServer) -> GeminiGateway {
    let config = GeminiGatewayConfig::builder()
        .api_key("test-key")
        .api_url(server.uri())
        .model("gemini-test")
        .timeout(Duration::from_millis(500))
        .build();
    GeminiGateway::new(config).unwrap()
}

fn completion(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [{"text": text}]},
            "finishReason": "STOP"
        }],
        "usageMetadata": {"promptTokenCount": 10, "candidatesTokenCount": 5, "totalTokenCount": 15}
    })
}

#[tokio::test]
async fn test_successful_completion() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "contents": [{"role": "user", "parts": [{"text": "Summarize the chapter"}]}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("The hero leaves home.")))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let request = ModelRequest::text(Operation::Summary, "Summarize the chapter");

    let text = gateway.generate(&request).await.unwrap();
    assert_eq!(text, "The hero leaves home.");
}

#[tokio::test]
async fn test_structured_request_sets_mime_type() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .and(body_partial_json(json!({
            "generationConfig": {"responseMimeType": "application/json"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(r#"["Fantasy"]"#)))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let request = ModelRequest::structured(Operation::Genres, "Suggest genres");

    let response = gateway.call(&request).await;
    assert_eq!(response.raw_text.as_deref(), Some(r#"["Fantasy"]"#));
}

#[tokio::test]
async fn test_api_error_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"code": 400, "message": "API key not valid", "status": "INVALID_ARGUMENT"}
        })))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let request = ModelRequest::text(Operation::Synopsis, "Write a synopsis");

    match gateway.generate(&request).await {
        Err(AssistError::Unavailable(msg)) => {
            assert!(msg.contains("400"));
            assert!(msg.contains("API key not valid"));
        }
        other => panic!("Expected Unavailable, got {:?}", other),
    }

    // The absorbing call never surfaces the error.
    assert!(gateway.call(&request).await.is_none());
}

#[tokio::test]
async fn test_blocked_prompt_is_no_answer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"promptFeedback": {"blockReason": "SAFETY"}})),
        )
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let request = ModelRequest::text(Operation::Rewrite, "Rewrite this");

    let err = gateway.generate(&request).await.unwrap_err();
    assert!(err.to_string().contains("SAFETY"));
    assert!(gateway.call(&request).await.is_none());
}

#[tokio::test]
async fn test_slow_server_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion("too late"))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let request = ModelRequest::text(Operation::Summary, "Summarize");

    let err = gateway.generate(&request).await.unwrap_err();
    assert_eq!(err, AssistError::Timeout);
}

#[tokio::test]
async fn test_non_json_body_is_unavailable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let request = ModelRequest::text(Operation::Summary, "Summarize");

    assert!(matches!(
        gateway.generate(&request).await,
        Err(AssistError::Unavailable(_))
    ));
}

#[tokio::test]
async fn test_truncated_completion_is_not_served() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "The rain fell softly over the"}]},
                "finishReason": "MAX_TOKENS"
            }]
        })))
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let request = ModelRequest::text(Operation::Rewrite, "Rewrite this passage");

    let err = gateway.generate(&request).await.unwrap_err();
    assert!(matches!(err, AssistError::Malformed(_)));
    assert!(err.to_string().contains("MAX_TOKENS"));
    assert!(gateway.call(&request).await.is_none());
}

#[tokio::test]
async fn test_default_request_leaves_output_cap_to_model() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENDPOINT))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("A long answer.")))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = gateway_for(&server);
    let request = ModelRequest::text(Operation::Rewrite, "Rewrite this passage");
    assert_eq!(gateway.generate(&request).await.unwrap(), "A long answer.");

    let received = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
    assert!(body["generationConfig"].get("maxOutputTokens").is_none());
}
