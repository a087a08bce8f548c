use super::*;
use crate::handler::{HandlerError, InteractionRequest};
use crate::responder::ResponseWriter;
use axum::body::to_bytes;
use ed25519_dalek::SigningKey;
use interaction_mux_core::{
    ButtonData, InnerKind, InteractionType, RouteNamespace, SlashCommandData,
};
use serde_json::json;

fn public_key() -> String {
    let key = SigningKey::from_bytes(b"12345678901234567890123456789012");
    hex::encode(key.verifying_key().as_bytes())
}

fn mux() -> Mux {
    Mux::new(&public_key(), Snowflake::new(42)).unwrap()
}

async fn json_body(response: Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn button(custom_id: &str) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "id": "1",
        "application_id": "42",
        "type": 3,
        "token": "t",
        "version": 1,
        "data": {"custom_id": custom_id, "component_type": 2}
    }))
    .unwrap()
}

async fn click_one(
    writer: ResponseWriter,
    _request: InteractionRequest<ButtonData>,
) -> Result<(), HandlerError> {
    writer.respond("clicked")?;
    Ok(())
}

async fn echo_route(
    writer: ResponseWriter,
    request: InteractionRequest<SlashCommandData>,
) -> Result<(), HandlerError> {
    writer.respond(request.route().to_string())?;
    Ok(())
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_new_rejects_invalid_public_key() {
    assert!(matches!(
        Mux::new("abc", Snowflake::new(1)),
        Err(VerifyError::InvalidPublicKey { .. })
    ));
}

#[test]
fn test_from_config_uses_application_settings() {
    let mut config = ServiceConfig::default();
    config.application.public_key = public_key();
    config.application.application_id = Snowflake::new(77);

    let mux = Mux::from_config(&config).unwrap();

    assert_eq!(mux.application_id(), Snowflake::new(77));
    assert_eq!(mux.verifier().max_body_size(), config.server.max_body_size);
}

#[test]
fn test_from_config_without_key_fails() {
    let result = Mux::from_config(&ServiceConfig::default());

    assert!(matches!(result, Err(ConfigError::Invalid { .. })));
}

// ============================================================================
// Registration
// ============================================================================

#[test]
fn test_nested_route_registers_exact_path() {
    let mut mux = mux();

    mux.route("a", |r| r.route("b", |r| r.command("c", echo_route)));

    let routes = mux.routes();
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].route.as_str(), "a/b/c");
    assert_eq!(routes[0].namespace, RouteNamespace::Command);
    assert_eq!(routes[0].kinds, vec![InnerKind::SlashCommand]);
}

#[test]
fn test_mount_table_copies_routes() {
    let mut sub = RouteTable::new();
    sub.command("add", echo_route);
    let mut mux = mux();

    mux.mount_table("todo", &sub);

    assert_eq!(mux.routes()[0].route.as_str(), "todo/add");
}

#[test]
fn test_clones_share_routes() {
    let mut mux = mux();
    let clone = mux.clone();

    mux.button("click_one", click_one);

    assert_eq!(clone.routes().len(), 1);
}

// ============================================================================
// Handling
// ============================================================================

#[tokio::test]
async fn test_ping_yields_pong() {
    let response = mux().handle(br#"{"type":1}"#).await.unwrap();

    assert_eq!(json_body(response).await, json!({"type": 1}));
}

#[tokio::test]
async fn test_button_handler_response_is_encoded() {
    // Arrange
    let mut mux = mux();
    mux.button("click_one", click_one);

    // Act
    let response = mux.handle(&button("click_one")).await.unwrap();

    // Assert
    assert_eq!(
        json_body(response).await,
        json!({"type": 4, "data": {"content": "clicked"}})
    );
}

#[tokio::test]
async fn test_not_found_hook_receives_unmatched_interaction() {
    let mut mux = mux();
    mux.on_not_found(
        |writer: ResponseWriter, request: InteractionRequest<interaction_mux_core::RawData>| async move {
            assert_eq!(request.interaction_type, InteractionType::MessageComponent);
            writer.deferred_update().map_err(HandlerError::from)
        },
    );

    let response = mux.handle(&button("unknown")).await.unwrap();

    assert_eq!(json_body(response).await, json!({"type": 6}));
}

#[tokio::test]
async fn test_not_found_hook_reaches_earlier_clones() {
    // Arrange
    let mut mux = mux();
    let served = mux.clone();
    mux.on_not_found(
        |writer: ResponseWriter, _request: InteractionRequest<interaction_mux_core::RawData>| async move {
            writer.deferred_update().map_err(HandlerError::from)
        },
    );

    // Act
    let response = served.handle(&button("unknown")).await.unwrap();

    // Assert
    assert_eq!(json_body(response).await, json!({"type": 6}));
}

#[tokio::test]
async fn test_unsupported_interaction_type_is_malformed() {
    let result = mux().handle(br#"{"type":99}"#).await;

    assert!(matches!(result, Err(InteractionError::MalformedBody { .. })));
}
