//! Tests for the HTTP router: signature layer, dispatch and encoding.

use super::*;
use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Request, StatusCode},
};
use ed25519_dalek::{Signer, SigningKey};
use interaction_mux_core::{Attachment, ButtonData, Message, SlashCommandData, Snowflake};
use serde_json::json;
use tower::ServiceExt;

const TIMESTAMP: &str = "1700000000";

fn signing_key() -> SigningKey {
    SigningKey::from_bytes(b"12345678901234567890123456789012")
}

fn test_mux() -> Mux {
    let public_key = hex::encode(signing_key().verifying_key().as_bytes());
    let mut mux = Mux::new(&public_key, Snowflake::new(42)).unwrap();
    mux.button("click_one", click_one);
    mux.button("report", report);
    mux.route("todo", |r| r.command("add", add_todo));
    mux
}

fn signed_request(uri: &str, body: &serde_json::Value) -> Request<Body> {
    signed_bytes(uri, serde_json::to_vec(body).unwrap())
}

fn signed_bytes(uri: &str, body: Vec<u8>) -> Request<Body> {
    let mut message = TIMESTAMP.as_bytes().to_vec();
    message.extend_from_slice(&body);
    let signature = hex::encode(signing_key().sign(&message).to_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .header(SIGNATURE_HEADER, signature)
        .header(TIMESTAMP_HEADER, TIMESTAMP)
        .body(Body::from(body))
        .unwrap()
}

fn component(custom_id: &str) -> serde_json::Value {
    json!({
        "id": "1",
        "application_id": "42",
        "type": 3,
        "token": "t",
        "version": 1,
        "data": {"custom_id": custom_id, "component_type": 2}
    })
}

async fn body_json(response: Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn click_one(
    writer: ResponseWriter,
    _request: InteractionRequest<ButtonData>,
) -> Result<(), HandlerError> {
    writer.respond("you clicked one")?;
    Ok(())
}

async fn report(
    writer: ResponseWriter,
    _request: InteractionRequest<ButtonData>,
) -> Result<(), HandlerError> {
    let message = Message::new("report attached")
        .attachment(Attachment::from_bytes("report.csv", "a,b\n1,2\n"))
        .attachment(Attachment::from_bytes("summary.txt", "ok"));
    writer.respond(message)?;
    Ok(())
}

async fn add_todo(
    writer: ResponseWriter,
    request: InteractionRequest<SlashCommandData>,
) -> Result<(), HandlerError> {
    let item = request.data.options.string("item")?;
    writer.respond(format!("added {}", item))?;
    Ok(())
}

// ============================================================================
// Pipeline
// ============================================================================

#[tokio::test]
async fn test_ping_is_answered_with_type_1() {
    // Arrange
    let app = create_router(test_mux(), &ServerConfig::default());

    // Act
    let response = app
        .oneshot(signed_request("/", &json!({"type": 1})))
        .await
        .unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(CONTENT_TYPE).unwrap(),
        "application/json"
    );
    assert_eq!(body_json(response).await, json!({"type": 1}));
}

#[tokio::test]
async fn test_button_click_runs_handler() {
    let app = create_router(test_mux(), &ServerConfig::default());

    let response = app
        .oneshot(signed_request("/", &component("click_one")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"type": 4, "data": {"content": "you clicked one"}})
    );
}

#[tokio::test]
async fn test_slash_subcommand_is_dispatched() {
    // Arrange
    let app = create_router(test_mux(), &ServerConfig::default());
    let body = json!({
        "id": "2",
        "application_id": "42",
        "type": 2,
        "token": "t",
        "version": 1,
        "data": {
            "id": "9",
            "name": "todo",
            "type": 1,
            "options": [{
                "name": "add",
                "type": 1,
                "options": [{"name": "item", "type": 3, "value": "milk"}]
            }]
        }
    });

    // Act
    let response = app.oneshot(signed_request("/", &body)).await.unwrap();

    // Assert
    assert_eq!(
        body_json(response).await,
        json!({"type": 4, "data": {"content": "added milk"}})
    );
}

#[tokio::test]
async fn test_attachments_are_sent_as_multipart() {
    let app = create_router(test_mux(), &ServerConfig::default());

    let response = app
        .oneshot(signed_request("/", &component("report")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("multipart/form-data; boundary="));

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = String::from_utf8(bytes.to_vec()).unwrap();
    let payload = body.find("name=\"payload_json\"").unwrap();
    let first = body.find("name=\"files[0]\"; filename=\"report.csv\"").unwrap();
    let second = body.find("name=\"files[1]\"; filename=\"summary.txt\"").unwrap();
    assert!(payload < first && first < second);
}

#[tokio::test]
async fn test_correlation_id_is_propagated() {
    let app = create_router(test_mux(), &ServerConfig::default());
    let mut request = signed_request("/", &json!({"type": 1}));
    request
        .headers_mut()
        .insert("x-correlation-id", "abc-123".parse().unwrap());

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.headers().get("x-correlation-id").unwrap(), "abc-123");
}

#[tokio::test]
async fn test_custom_base_path() {
    let config = ServerConfig {
        base_path: "/interactions".to_string(),
        ..ServerConfig::default()
    };
    let app = create_router(test_mux(), &config);

    let response = app
        .clone()
        .oneshot(signed_request("/interactions", &json!({"type": 1})))
        .await
        .unwrap();
    let elsewhere = app
        .oneshot(signed_request("/", &json!({"type": 1})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(elsewhere.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Rejections
// ============================================================================

#[tokio::test]
async fn test_bad_signature_is_rejected_before_dispatch() {
    // Arrange
    let app = create_router(test_mux(), &ServerConfig::default());
    let mut request = signed_request("/", &component("click_one"));
    let forged = hex::encode(SigningKey::from_bytes(&[3u8; 32]).sign(b"x").to_bytes());
    request
        .headers_mut()
        .insert(SIGNATURE_HEADER, forged.parse().unwrap());

    // Act
    let response = app.oneshot(request).await.unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["status"], 401);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = create_router(test_mux(), &ServerConfig::default());

    let response = app
        .oneshot(signed_request("/", &json!({"type": 3, "data": {}})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unrouted_interaction_is_server_error() {
    let app = create_router(test_mux(), &ServerConfig::default());

    let response = app
        .oneshot(signed_request("/", &component("nowhere")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_router_body_limit_follows_server_config() {
    // Arrange: a ping padded past the multiplexer's default cap
    let config = ServerConfig {
        max_body_size: 16 * 1024 * 1024,
        ..ServerConfig::default()
    };
    let app = create_router(test_mux(), &config);
    let mut body = br#"{"type":1}"#.to_vec();
    body.resize(9 * 1024 * 1024, b' ');

    // Act
    let response = app.oneshot(signed_bytes("/", body)).await.unwrap();

    // Assert
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"type": 1}));
}

#[tokio::test]
async fn test_router_rejects_body_over_configured_limit() {
    let config = ServerConfig {
        max_body_size: 64,
        ..ServerConfig::default()
    };
    let app = create_router(test_mux(), &config);
    let mut body = br#"{"type":1}"#.to_vec();
    body.resize(128, b' ');

    let response = app.oneshot(signed_bytes("/", body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body_json(response).await["status"], 413);
}

#[tokio::test]
async fn test_start_server_reports_bind_failure() {
    let blocker = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = blocker.local_addr().unwrap().port();
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port,
        ..ServerConfig::default()
    };

    let result = start_server(test_mux(), &config, std::future::ready(())).await;

    assert!(matches!(result, Err(ServiceError::BindFailed { .. })));
}

#[tokio::test]
async fn test_start_server_stops_on_shutdown_signal() {
    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        ..ServerConfig::default()
    };

    let result = tokio::time::timeout(
        Duration::from_secs(5),
        start_server(test_mux(), &config, std::future::ready(())),
    )
    .await;

    assert!(matches!(result, Ok(Ok(()))));
}
