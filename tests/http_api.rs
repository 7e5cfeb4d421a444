//! HttpChatApi against a mocked backend.

use poll_chat::error::TransportError;
use poll_chat::network::{ChatApi, HttpChatApi};
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_for(server: &MockServer) -> HttpChatApi {
    HttpChatApi::new(format!("{}/exec", server.uri()))
}

#[tokio::test]
async fn fetch_channels_reads_chat_names() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/exec"))
        .and(query_param("action", "getChats"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"chats":["general","random"]}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let channels = api_for(&server).fetch_channels().await.unwrap();
    assert_eq!(channels, vec!["general".to_string(), "random".to_string()]);
}

#[tokio::test]
async fn fetch_messages_passes_channel_and_count_and_decodes_bodies() {
    let server = MockServer::start().await;
    let body = r#"{"messages":[
        {"sender":"a","message":"hi","timestamp":"2024-01-02T10:00:00.000Z"},
        {"sender":"b","message":"two%e%lines","timestamp":"2024-01-03T10:00:00.000Z"}
    ]}"#;
    Mock::given(method("GET"))
        .and(path("/exec"))
        .and(query_param("action", "getMessages"))
        .and(query_param("chat", "general"))
        .and(query_param("number", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(&server)
        .await;

    let messages = api_for(&server)
        .fetch_messages("general", 50)
        .await
        .unwrap();

    let lines: Vec<String> = messages.iter().map(|m| m.display_line()).collect();
    assert_eq!(
        lines,
        vec![
            "[2024-01-02] a: hi".to_string(),
            "[2024-01-03] b: two\nlines".to_string(),
        ]
    );
}

#[tokio::test]
async fn send_message_carries_encoded_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/exec"))
        .and(query_param("action", "sendMessage"))
        .and(query_param("chat", "general"))
        .and(query_param("sender", "bob & co"))
        .and(query_param("message", "hi%e%there"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"status":"ok"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let ack = api_for(&server)
        .send_message("general", "bob & co", "hi%e%there")
        .await
        .unwrap();
    assert_eq!(ack["status"], "ok");
}

#[tokio::test]
async fn malformed_json_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/exec"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>quota exceeded</html>"))
        .mount(&server)
        .await;

    let err = api_for(&server)
        .fetch_messages("general", 50)
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Decode(_)), "got {err:?}");
}

#[tokio::test]
async fn error_status_is_a_request_error_not_an_empty_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/exec"))
        .respond_with(
            ResponseTemplate::new(500).set_body_string(r#"{"error":"Chat not found"}"#),
        )
        .mount(&server)
        .await;

    let err = api_for(&server)
        .fetch_messages("general", 50)
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Request(_)), "got {err:?}");
}

#[tokio::test]
async fn unknown_path_404_is_a_request_error() {
    let server = MockServer::start().await;

    let err = api_for(&server).fetch_channels().await.unwrap_err();
    assert!(matches!(err, TransportError::Request(_)), "got {err:?}");
}

#[tokio::test]
async fn ok_body_without_messages_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/exec"))
        .and(query_param("action", "getMessages"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"{"error":"Chat not found"}"#),
        )
        .mount(&server)
        .await;

    let err = api_for(&server)
        .fetch_messages("general", 50)
        .await
        .unwrap_err();
    assert!(matches!(err, TransportError::Decode(_)), "got {err:?}");
}

#[tokio::test]
async fn unreachable_backend_is_a_request_error() {
    // Lấy một cổng trống rồi đóng lại để chắc không có ai lắng nghe
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    let api = HttpChatApi::new(format!("http://127.0.0.1:{port}/exec"));

    let err = api.fetch_channels().await.unwrap_err();
    assert!(matches!(err, TransportError::Request(_)), "got {err:?}");
}
