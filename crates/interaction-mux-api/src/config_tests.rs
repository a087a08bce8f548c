//! Tests for [`ServiceConfig`].

use super::*;
use crate::errors::ConfigError;
use ed25519_dalek::SigningKey;

fn public_key() -> String {
    let key = SigningKey::from_bytes(b"12345678901234567890123456789012");
    hex::encode(key.verifying_key().as_bytes())
}

fn valid_config() -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.application.public_key = public_key();
    config
}

// ============================================================================
// Defaults and deserialization
// ============================================================================

#[test]
fn test_server_defaults() {
    let config = ServerConfig::default();

    assert_eq!(config.host, "0.0.0.0");
    assert_eq!(config.port, 8080);
    assert_eq!(config.base_path, "/");
    assert_eq!(config.timeout_seconds, 10);
    assert_eq!(config.shutdown_timeout_seconds, 30);
    assert_eq!(config.max_body_size, 8 * 1024 * 1024);
}

#[test]
fn test_partial_document_keeps_defaults() {
    let config: ServiceConfig = serde_json::from_value(serde_json::json!({
        "server": {"port": 9000},
        "application": {"public_key": "abcd", "application_id": "42", "bot_token": "secret"}
    }))
    .unwrap();

    assert_eq!(config.server.port, 9000);
    assert_eq!(config.server.base_path, "/");
    assert_eq!(config.application.application_id, Snowflake::new(42));
    assert_eq!(config.application.bot_token.expose(), "secret");
    assert_eq!(config.logging.level, "info");
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_valid_config_passes() {
    assert!(valid_config().validate().is_ok());
}

#[test]
fn test_missing_public_key_fails() {
    let result = ServiceConfig::default().validate();

    assert!(
        matches!(result, Err(ConfigError::Missing { ref key }) if key == "application.public_key"),
        "unexpected result: {:?}",
        result
    );
}

#[test]
fn test_invalid_public_key_fails() {
    let mut config = valid_config();
    config.application.public_key = "not-hex".to_string();

    assert!(matches!(
        config.validate(),
        Err(ConfigError::Invalid { .. })
    ));
}

#[test]
fn test_zero_port_fails() {
    let mut config = valid_config();
    config.server.port = 0;

    assert!(matches!(
        config.validate(),
        Err(ConfigError::Invalid { .. })
    ));
}

#[test]
fn test_relative_base_path_fails() {
    let mut config = valid_config();
    config.server.base_path = "interactions".to_string();

    let result = config.validate();

    match result {
        Err(ConfigError::Invalid { message }) => assert!(message.contains("base_path")),
        other => panic!("unexpected result: {:?}", other),
    }
}

// ============================================================================
// BotToken
// ============================================================================

#[test]
fn test_bot_token_debug_is_redacted() {
    let mut config = valid_config();
    config.application.bot_token = BotToken::new("very-secret-token");

    let debug = format!("{:?}", config);

    assert!(!debug.contains("very-secret-token"));
    assert!(debug.contains("<REDACTED>"));
}

#[test]
fn test_registering_commands_requires_bot_token() {
    let mut config = valid_config();
    config.application.register_commands = true;

    let result = config.validate();

    assert!(
        matches!(result, Err(ConfigError::Missing { ref key }) if key == "application.bot_token"),
        "unexpected result: {:?}",
        result
    );
}
