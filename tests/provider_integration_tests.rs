use std::time::Duration;

use parley::inference::{
    CompletionProvider, CompletionRequest, HttpProvider, OutboundMessage, ProviderError, Role,
    Turn,
};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_json, method, path},
};

// ============================================================================
// Helper Functions
// ============================================================================

/// A one-turn transcript: the user said "Hello".
fn hello() -> Vec<OutboundMessage> {
    vec![OutboundMessage::from(&Turn::user("Hello"))]
}

fn provider_for(server: &MockServer) -> HttpProvider {
    HttpProvider::new(server.uri(), None, None).unwrap()
}

async fn mount_reply(server: &MockServer, body: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

// ============================================================================
// Successful exchanges
// ============================================================================

#[tokio::test]
async fn test_reply_with_sources() {
    let server = MockServer::start().await;
    mount_reply(
        &server,
        json!({
            "response": "Hi there!",
            "sources": [
                {"title": "Getting started"},
                {"page_content": "...", "metadata": {"source": "guide.md"}}
            ]
        }),
    )
    .await;

    let messages = hello();
    let reply = provider_for(&server)
        .complete(CompletionRequest {
            messages: &messages,
            domain: None,
        })
        .await
        .unwrap();

    assert_eq!(reply.response, "Hi there!");
    let turn = reply.into_turn();
    assert_eq!(turn.role, Role::Assistant);
    assert_eq!(turn.source_labels(), vec!["Getting started", "guide.md"]);
}

#[tokio::test]
async fn test_reply_without_sources_field() {
    let server = MockServer::start().await;
    mount_reply(&server, json!({"response": "Plain answer"})).await;

    let messages = hello();
    let reply = provider_for(&server)
        .complete(CompletionRequest {
            messages: &messages,
            domain: None,
        })
        .await
        .unwrap();

    assert_eq!(reply.response, "Plain answer");
    assert_eq!(reply.sources, None);
}

#[tokio::test]
async fn test_reply_with_null_sources() {
    let server = MockServer::start().await;
    mount_reply(&server, json!({"response": "Plain answer", "sources": null})).await;

    let messages = hello();
    let reply = provider_for(&server)
        .complete(CompletionRequest {
            messages: &messages,
            domain: None,
        })
        .await
        .unwrap();

    assert_eq!(reply.into_turn().sources, None);
}

// ============================================================================
// Request shape
// ============================================================================

#[tokio::test]
async fn test_request_body_is_whole_transcript_without_domain() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_json(json!({
            "messages": [
                {"role": "user", "content": "Hello"},
                {"role": "assistant", "content": "Hi there!"},
                {"role": "user", "content": "What's new?"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let messages: Vec<OutboundMessage> = [
        Turn::user("Hello"),
        Turn::assistant("Hi there!", None),
        Turn::user("What's new?"),
    ]
    .iter()
    .map(OutboundMessage::from)
    .collect();

    provider_for(&server)
        .complete(CompletionRequest {
            messages: &messages,
            domain: None,
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_request_body_carries_domain() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_json(json!({
            "messages": [{"role": "user", "content": "Hello"}],
            "domain": "projects"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let messages = hello();
    provider_for(&server)
        .complete(CompletionRequest {
            messages: &messages,
            domain: Some("projects"),
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn test_custom_chat_path() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v2/ask"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"response": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let provider =
        HttpProvider::new(format!("{}/", server.uri()), Some("v2/ask".into()), None).unwrap();
    let messages = hello();
    let reply = provider
        .complete(CompletionRequest {
            messages: &messages,
            domain: None,
        })
        .await
        .unwrap();
    assert_eq!(reply.response, "ok");
}

// ============================================================================
// Failures
// ============================================================================

#[tokio::test]
async fn test_server_error_is_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_string("index not loaded"))
        .mount(&server)
        .await;

    let messages = hello();
    let err = provider_for(&server)
        .complete(CompletionRequest {
            messages: &messages,
            domain: None,
        })
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ProviderError::Api {
            status: 500,
            message: "index not loaded".into()
        }
    );
}

#[tokio::test]
async fn test_undecodable_body_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let messages = hello();
    let err = provider_for(&server)
        .complete(CompletionRequest {
            messages: &messages,
            domain: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::Parse(_)), "got {err:?}");
}

#[tokio::test]
async fn test_missing_response_field_is_parse_error() {
    let server = MockServer::start().await;
    mount_reply(&server, json!({"answer": "wrong key"})).await;

    let messages = hello();
    let err = provider_for(&server)
        .complete(CompletionRequest {
            messages: &messages,
            domain: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::Parse(_)), "got {err:?}");
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    let server = MockServer::start().await;
    let provider = provider_for(&server);
    drop(server);

    let messages = hello();
    let err = provider
        .complete(CompletionRequest {
            messages: &messages,
            domain: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::Network(_)), "got {err:?}");
}

#[tokio::test]
async fn test_timeout_is_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"response": "too late"}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let provider =
        HttpProvider::new(server.uri(), None, Some(Duration::from_millis(100))).unwrap();
    let messages = hello();
    let err = provider
        .complete(CompletionRequest {
            messages: &messages,
            domain: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ProviderError::Network(_)), "got {err:?}");
}

// ============================================================================
// Liveness probe
// ============================================================================

#[tokio::test]
async fn test_probe_reads_service_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"message": "Portfolio assistant API is running"})),
        )
        .mount(&server)
        .await;

    let greeting = provider_for(&server).probe().await.unwrap();
    assert_eq!(greeting, "Portfolio assistant API is running");
}

#[tokio::test]
async fn test_probe_failure_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = provider_for(&server).probe().await.unwrap_err();
    assert!(matches!(err, ProviderError::Api { status: 503, .. }), "got {err:?}");
}
