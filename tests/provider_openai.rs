// tests/provider_openai.rs
//
// OpenAI-compatible provider against a local mock server: request shape,
// status mapping, empty completions and the engine-level deadline.

use std::time::Duration;

use serde_json::{json, Value};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use atendos_engine::config::{EngineConfig, ProviderKind};
use atendos_engine::provider::{ChatMessage, CompletionProvider, OpenAiProvider};
use atendos_engine::{DecisionEngine, EngineError, GenerationFailure};

fn config(server: &MockServer) -> EngineConfig {
    EngineConfig {
        provider: ProviderKind::OpenAi,
        provider_api_key: "test-key".into(),
        base_url: server.uri(),
        model_name: "gpt-test".into(),
        timeout_ms: 2_000,
        ..EngineConfig::default()
    }
}

fn completion(content: &str) -> Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [
            { "index": 0, "message": { "role": "assistant", "content": content }, "finish_reason": "stop" }
        ]
    })
}

#[tokio::test]
async fn posts_system_first_with_bearer_auth() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("  Olá! Como posso ajudar?  ")))
        .expect(1)
        .mount(&server)
        .await;

    let p = OpenAiProvider::from_config(&config(&server)).unwrap();
    let out = p
        .complete("Você é um assistente.", &[ChatMessage::user("oi")])
        .await
        .unwrap();
    assert_eq!(out, "Olá! Como posso ajudar?");

    let requests = server.received_requests().await.unwrap();
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["model"], "gpt-test");
    assert_eq!(body["max_tokens"], 500);
    assert_eq!(body["messages"][0]["role"], "system");
    assert_eq!(body["messages"][0]["content"], "Você é um assistente.");
    assert_eq!(body["messages"][1]["role"], "user");
    assert_eq!(body["messages"][1]["content"], "oi");
}

#[tokio::test]
async fn unauthorized_is_a_configuration_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let p = OpenAiProvider::from_config(&config(&server)).unwrap();
    let err = p.complete("sys", &[ChatMessage::user("oi")]).await.unwrap_err();
    assert!(matches!(err, EngineError::Configuration(_)), "got {err:?}");
}

#[tokio::test]
async fn server_error_keeps_status_and_truncated_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("x".repeat(1_000)))
        .mount(&server)
        .await;

    let p = OpenAiProvider::from_config(&config(&server)).unwrap();
    match p.complete("sys", &[]).await {
        Err(EngineError::Generation(GenerationFailure::Status { status, body })) => {
            assert_eq!(status, 500);
            assert_eq!(body.chars().count(), 300);
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn empty_content_and_garbage_are_generation_failures() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("")))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let p = OpenAiProvider::from_config(&config(&server)).unwrap();
    assert!(matches!(
        p.complete("sys", &[]).await,
        Err(EngineError::Generation(GenerationFailure::EmptyCompletion))
    ));
    assert!(matches!(
        p.complete("sys", &[]).await,
        Err(EngineError::Generation(GenerationFailure::Malformed(_)))
    ));
}

#[tokio::test]
async fn engine_retries_overload_then_decides() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Atendemos das 8h às 18h.")))
        .mount(&server)
        .await;

    let cfg = EngineConfig {
        max_retries: 1,
        retry_backoff_ms: 10,
        ..config(&server)
    };
    let engine = DecisionEngine::from_config(&cfg).unwrap();
    let d = engine.decide("qual o horário?", &[], &[]).await.unwrap();
    assert_eq!(d.content, "Atendemos das 8h às 18h.");
    assert_eq!(d.confidence, 0.5);
    assert!(d.should_escalate);
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn slow_provider_hits_the_deadline() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion("tarde demais"))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let cfg = EngineConfig {
        timeout_ms: 200,
        ..config(&server)
    };
    let engine = DecisionEngine::from_config(&cfg).unwrap();
    let err = engine.decide("olá", &[], &[]).await.unwrap_err();
    assert!(matches!(
        err,
        EngineError::Generation(GenerationFailure::Timeout(_))
    ));
}
