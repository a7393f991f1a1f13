#![expect(
    clippy::tests_outside_test_module,
    reason = "integration tests are only compiled in test mode"
)]

// Integration tests for the streaming chat client against a mock
// DeepSeek-compatible endpoint

use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gridwatch::GridError;
use gridwatch::chat::{ChatClient, ChatMessage};

fn sse_body(fragments: &[&str]) -> String {
    let mut body = String::from(
        "data: {\"id\":\"1\",\"choices\":[{\"index\":0,\"delta\":{\"role\":\"assistant\"}}]}\n\n",
    );
    for fragment in fragments {
        body.push_str(&format!(
            "data: {{\"id\":\"1\",\"choices\":[{{\"index\":0,\"delta\":{{\"content\":\"{fragment}\"}}}}]}}\n\n"
        ));
    }
    body.push_str("data: [DONE]\n\n");
    body
}

fn client_for(server: &MockServer) -> ChatClient {
    let url = Url::parse(&format!("{}/chat/completions", server.uri())).expect("mock url parses");
    ChatClient::with_credentials(url, "deepseek-chat".to_string(), "sk-test".to_string())
}

#[tokio::test]
async fn streams_deltas_and_returns_full_answer() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(sse_body(&["The DC bus ", "is 500 kV."]), "text/event-stream"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut deltas = Vec::new();
    let answer = client
        .stream_chat(&[ChatMessage::user("What is the DC bus voltage?")], |d| {
            deltas.push(d.to_string());
        })
        .await
        .expect("stream succeeds");

    assert_eq!(answer, "The DC bus is 500 kV.");
    assert_eq!(deltas, vec!["The DC bus ", "is 500 kV."]);
}

#[tokio::test]
async fn sends_conversation_and_stream_flag() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(sse_body(&["ok"]), "text/event-stream"),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let conversation = vec![
        ChatMessage::assistant("Hello!"),
        ChatMessage::user("First question"),
        ChatMessage::assistant("First answer"),
        ChatMessage::user("Second question"),
    ];
    client
        .stream_chat(&conversation, |_| {})
        .await
        .expect("stream succeeds");

    let requests = server.received_requests().await.expect("requests recorded");
    assert_eq!(requests.len(), 1);

    let body: serde_json::Value =
        serde_json::from_slice(&requests[0].body).expect("request body is json");
    assert_eq!(body["model"], "deepseek-chat");
    assert_eq!(body["stream"], true);

    let messages = body["messages"].as_array().expect("messages array");
    assert_eq!(messages.len(), 4);
    assert_eq!(messages[0]["role"], "assistant");
    assert_eq!(messages[3]["content"], "Second question");
}

#[tokio::test]
async fn service_error_is_surfaced_not_panicked() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(402).set_body_string(r#"{"error":"Insufficient Balance"}"#),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client
        .stream_chat(&[ChatMessage::user("question")], |_| {})
        .await;

    match result {
        Err(GridError::Chat(message)) => {
            assert!(message.contains("402"));
            assert!(message.contains("Insufficient Balance"));
        }
        other => panic!("expected chat error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_stream_payload_is_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("data: {not valid json}\n\n", "text/event-stream"),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client
        .stream_chat(&[ChatMessage::user("question")], |_| {})
        .await;

    assert!(matches!(result, Err(GridError::Chat(_))));
}

#[tokio::test]
async fn keepalive_comments_are_ignored() {
    let server = MockServer::start().await;
    let body = format!(": keepalive\n\n{}", sse_body(&["answer"]));
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let answer = client
        .stream_chat(&[ChatMessage::user("question")], |_| {})
        .await
        .expect("stream succeeds");

    assert_eq!(answer, "answer");
}
