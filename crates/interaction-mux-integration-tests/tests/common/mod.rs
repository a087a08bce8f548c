//! Common test utilities for interaction-mux integration tests
//!
//! This module provides:
//! - A deterministic signing key and signed request builder
//! - Interaction envelope builders for every interaction type
//! - Response body helpers

#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{header::CONTENT_TYPE, Request};
use axum::response::Response;
use ed25519_dalek::{Signer, SigningKey};
use interaction_mux_api::{Mux, SIGNATURE_HEADER, TIMESTAMP_HEADER};
use interaction_mux_core::Snowflake;
use serde_json::{json, Value};

pub const APPLICATION_ID: u64 = 42;
pub const TIMESTAMP: &str = "1700000000";

// ============================================================================
// Signing
// ============================================================================

pub fn signing_key() -> SigningKey {
    SigningKey::from_bytes(&[9u8; 32])
}

pub fn public_key_hex() -> String {
    hex::encode(signing_key().verifying_key().as_bytes())
}

/// Multiplexer verifying against [`signing_key`]
pub fn test_mux() -> Mux {
    Mux::new(&public_key_hex(), Snowflake::new(APPLICATION_ID)).unwrap()
}

pub fn sign(timestamp: &str, body: &[u8]) -> String {
    let mut message = timestamp.as_bytes().to_vec();
    message.extend_from_slice(body);
    hex::encode(signing_key().sign(&message).to_bytes())
}

/// POST `body` to `uri` with a valid signature
pub fn signed_request(uri: &str, body: &Value) -> Request<Body> {
    let body = serde_json::to_vec(body).unwrap();
    let signature = sign(TIMESTAMP, &body);
    request_with(uri, body, Some(&signature), Some(TIMESTAMP))
}

/// POST raw bytes with the given signature headers
pub fn request_with(
    uri: &str,
    body: Vec<u8>,
    signature: Option<&str>,
    timestamp: Option<&str>,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(signature) = signature {
        builder = builder.header(SIGNATURE_HEADER, signature);
    }
    if let Some(timestamp) = timestamp {
        builder = builder.header(TIMESTAMP_HEADER, timestamp);
    }
    builder.body(Body::from(body)).unwrap()
}

// ============================================================================
// Envelopes
// ============================================================================

pub fn envelope(interaction_type: u8, data: Value) -> Value {
    json!({
        "id": "1000",
        "application_id": APPLICATION_ID.to_string(),
        "type": interaction_type,
        "token": "interaction-token",
        "version": 1,
        "guild_id": "500",
        "member": {"user": {"id": "7", "username": "ann"}, "roles": []},
        "data": data
    })
}

pub fn ping() -> Value {
    json!({
        "id": "1",
        "application_id": APPLICATION_ID.to_string(),
        "type": 1,
        "token": "t",
        "version": 1
    })
}

pub fn component(custom_id: &str, component_type: u8) -> Value {
    envelope(
        3,
        json!({"custom_id": custom_id, "component_type": component_type}),
    )
}

pub fn select(custom_id: &str, values: &[&str]) -> Value {
    envelope(
        3,
        json!({"custom_id": custom_id, "component_type": 3, "values": values}),
    )
}

pub fn slash(name: &str, options: Value) -> Value {
    envelope(
        2,
        json!({"id": "9", "name": name, "type": 1, "options": options}),
    )
}

pub fn context_command(name: &str, command_type: u8, target_id: &str) -> Value {
    envelope(
        2,
        json!({"id": "9", "name": name, "type": command_type, "target_id": target_id}),
    )
}

pub fn autocomplete(name: &str, options: Value) -> Value {
    envelope(
        4,
        json!({"id": "9", "name": name, "type": 1, "options": options}),
    )
}

pub fn modal_submit(custom_id: &str, inputs: &[(&str, &str)]) -> Value {
    let inputs = inputs
        .iter()
        .map(|(id, value)| json!({"type": 4, "custom_id": id, "value": value}))
        .collect::<Vec<_>>();
    envelope(
        5,
        json!({"custom_id": custom_id, "components": [{"type": 1, "components": inputs}]}),
    )
}

// ============================================================================
// Responses
// ============================================================================

pub async fn body_bytes(response: Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
