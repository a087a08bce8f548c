//! Tests for follow-up messages.

use super::*;
use crate::client::ClientConfig;
use interaction_mux_core::{Attachment, BotToken};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> InteractionClient {
    let config = ClientConfig::default().with_api_url(server.uri());
    InteractionClient::new(Snowflake::new(42), BotToken::new("bot-token"), config).unwrap()
}

fn sent(id: &str, content: &str) -> serde_json::Value {
    json!({"id": id, "channel_id": "5", "content": content})
}

#[tokio::test]
async fn test_create_followup_posts_to_webhook() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhooks/42/tok-123"))
        .and(body_json(json!({"content": "done", "flags": 64})))
        .respond_with(ResponseTemplate::new(200).set_body_json(sent("77", "done")))
        .expect(1)
        .mount(&server)
        .await;

    // Act
    let message = client_for(&server)
        .create_followup("tok-123", Message::new("done").ephemeral())
        .await
        .unwrap();

    // Assert
    assert_eq!(message.id, Snowflake::new(77));
    assert_eq!(message.channel_id, Some(Snowflake::new(5)));
    assert_eq!(message.content, "done");
}

#[tokio::test]
async fn test_edit_original_response_patches_original() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/webhooks/42/tok-123/messages/@original"))
        .and(body_json(json!({"content": "finished"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(sent("1", "finished")))
        .expect(1)
        .mount(&server)
        .await;

    let message = client_for(&server)
        .edit_original_response("tok-123", Message::new("finished"))
        .await
        .unwrap();

    assert_eq!(message.content, "finished");
}

#[tokio::test]
async fn test_delete_original_response() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/webhooks/42/tok-123/messages/@original"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server).delete_original_response("tok-123").await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_edit_and_delete_followup_by_id() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/webhooks/42/tok-123/messages/77"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sent("77", "edited")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/webhooks/42/tok-123/messages/77"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server);

    let edited = client
        .edit_followup("tok-123", Snowflake::new(77), Message::new("edited"))
        .await
        .unwrap();
    let deleted = client.delete_followup("tok-123", Snowflake::new(77)).await;

    assert_eq!(edited.content, "edited");
    assert!(deleted.is_ok());
}

#[tokio::test]
async fn test_expired_token_reports_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhooks/42/expired"))
        .respond_with(
            ResponseTemplate::new(404)
                .set_body_string("{\"message\":\"Unknown Webhook\",\"code\":10015}"),
        )
        .mount(&server)
        .await;

    let result = client_for(&server)
        .create_followup("expired", Message::new("late"))
        .await;

    match result {
        Err(ClientError::HttpError { status, body }) => {
            assert_eq!(status, 404);
            assert!(body.contains("10015"));
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_followup_with_attachments_is_multipart() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhooks/42/tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sent("78", "files")))
        .expect(1)
        .mount(&server)
        .await;
    let message = Message::new("files")
        .attachment(Attachment::from_bytes("first.txt", "one"))
        .attachment(Attachment::from_bytes("second.csv", "a,b"));

    // Act
    let sent_message = client_for(&server)
        .create_followup("tok-123", message)
        .await
        .unwrap();

    // Assert
    assert_eq!(sent_message.id, Snowflake::new(78));
    let requests = server.received_requests().await.unwrap();
    let content_type = requests[0]
        .headers
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("multipart/form-data; boundary="));

    let body = String::from_utf8_lossy(&requests[0].body).to_string();
    let payload = body.find("name=\"payload_json\"").unwrap();
    let first = body.find("name=\"files[0]\"; filename=\"first.txt\"").unwrap();
    let second = body.find("name=\"files[1]\"; filename=\"second.csv\"").unwrap();
    assert!(payload < first && first < second);
    assert!(body.contains(r#""attachments":[{"id":"0","filename":"first.txt"},{"id":"1","filename":"second.csv"}]"#));
    assert!(body[first..].contains("one"));
    assert!(body[second..].contains("a,b"));
}

#[tokio::test]
async fn test_edit_original_response_with_attachment_is_multipart() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/webhooks/42/tok-123/messages/@original"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sent("1", "report")))
        .expect(1)
        .mount(&server)
        .await;
    let message = Message::new("report").attachment(Attachment::from_bytes("report.txt", "ok"));

    let result = client_for(&server)
        .edit_original_response("tok-123", message)
        .await;

    assert!(result.is_ok());
    let requests = server.received_requests().await.unwrap();
    let body = String::from_utf8_lossy(&requests[0].body).to_string();
    assert!(body.contains("name=\"files[0]\"; filename=\"report.txt\""));
}

#[tokio::test]
async fn test_get_original_response_and_followup() {
    // Arrange
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/webhooks/42/tok-123/messages/@original"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sent("1", "original")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/webhooks/42/tok-123/messages/77"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sent("77", "later")))
        .expect(1)
        .mount(&server)
        .await;
    let client = client_for(&server);

    // Act
    let original = client.get_original_response("tok-123").await.unwrap();
    let followup = client.get_followup("tok-123", Snowflake::new(77)).await.unwrap();

    // Assert
    assert_eq!(original.id, Snowflake::new(1));
    assert_eq!(original.content, "original");
    assert_eq!(followup.id, Snowflake::new(77));
    assert_eq!(followup.content, "later");
}

#[tokio::test]
async fn test_token_with_path_characters_is_rejected() {
    let server = MockServer::start().await;

    let result = client_for(&server).delete_original_response("a/../b").await;

    assert!(matches!(result, Err(ClientError::InvalidRequest { .. })));
}
