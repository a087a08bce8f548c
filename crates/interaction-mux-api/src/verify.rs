//! Ed25519 request signature verification.
//!
//! Every interaction request carries `X-Signature-Ed25519` (hex) and
//! `X-Signature-Timestamp`. The signature covers `timestamp ‖ raw body` and is
//! made with the application's private key; the public key comes from the
//! application configuration.

use crate::errors::{InteractionError, VerifyError};
use axum::{
    body::Body,
    extract::{Request, State},
    http::{header::CONTENT_LENGTH, HeaderMap},
    middleware::Next,
    response::Response,
};
use bytes::{Bytes, BytesMut};
use ed25519_dalek::{Signature, Verifier, VerifyingKey, PUBLIC_KEY_LENGTH};
use futures::StreamExt;
use std::sync::Arc;
use tracing::debug;

/// Header carrying the hex encoded signature
pub const SIGNATURE_HEADER: &str = "x-signature-ed25519";

/// Header carrying the signed timestamp
pub const TIMESTAMP_HEADER: &str = "x-signature-timestamp";

/// Verifies interaction signatures against the application public key.
///
/// # Examples
///
/// ```rust
/// use ed25519_dalek::{Signer, SigningKey};
/// use interaction_mux_api::SignatureVerifier;
///
/// let signing_key = SigningKey::from_bytes(&[7u8; 32]);
/// let public_key = hex::encode(signing_key.verifying_key().as_bytes());
/// let verifier = SignatureVerifier::new(&public_key, 1024).unwrap();
///
/// let body = br#"{"type":1}"#;
/// let mut message = b"1700000000".to_vec();
/// message.extend_from_slice(body);
/// let signature = hex::encode(signing_key.sign(&message).to_bytes());
///
/// assert!(verifier.verify("1700000000", body, &signature).is_ok());
/// assert!(verifier.verify("1700000001", body, &signature).is_err());
/// ```
#[derive(Clone)]
pub struct SignatureVerifier {
    key: VerifyingKey,
    max_body_size: usize,
}

impl SignatureVerifier {
    /// Create a verifier from a hex encoded public key.
    ///
    /// # Errors
    ///
    /// Returns `VerifyError::InvalidPublicKey` if the key is not 32 bytes of
    /// valid hex or is not a valid curve point.
    pub fn new(public_key_hex: &str, max_body_size: usize) -> Result<Self, VerifyError> {
        let bytes = hex::decode(public_key_hex.trim()).map_err(|e| VerifyError::InvalidPublicKey {
            message: format!("Invalid hex encoding: {}", e),
        })?;

        let bytes: [u8; PUBLIC_KEY_LENGTH] =
            bytes
                .try_into()
                .map_err(|b: Vec<u8>| VerifyError::InvalidPublicKey {
                    message: format!("Expected {} bytes, got {}", PUBLIC_KEY_LENGTH, b.len()),
                })?;

        let key = VerifyingKey::from_bytes(&bytes).map_err(|e| VerifyError::InvalidPublicKey {
            message: e.to_string(),
        })?;

        Ok(Self { key, max_body_size })
    }

    /// Same key, different body cap
    pub fn with_max_body_size(mut self, max_body_size: usize) -> Self {
        self.max_body_size = max_body_size;
        self
    }

    /// Largest body the verifier will buffer
    pub fn max_body_size(&self) -> usize {
        self.max_body_size
    }

    /// Verify `signature_hex` over `timestamp ‖ body`.
    pub fn verify(
        &self,
        timestamp: &str,
        body: &[u8],
        signature_hex: &str,
    ) -> Result<(), VerifyError> {
        let signature_bytes =
            hex::decode(signature_hex).map_err(|e| VerifyError::InvalidSignatureFormat {
                message: format!("Invalid hex encoding: {}", e),
            })?;

        let signature = Signature::from_slice(&signature_bytes).map_err(|e| {
            VerifyError::InvalidSignatureFormat {
                message: e.to_string(),
            }
        })?;

        let mut message = Vec::with_capacity(timestamp.len() + body.len());
        message.extend_from_slice(timestamp.as_bytes());
        message.extend_from_slice(body);

        self.key
            .verify(&message, &signature)
            .map_err(|_| VerifyError::SignatureMismatch)
    }

    /// Verify using the signature headers of a request
    pub fn verify_headers(&self, headers: &HeaderMap, body: &[u8]) -> Result<(), VerifyError> {
        let signature = header_str(headers, SIGNATURE_HEADER)?;
        let timestamp = header_str(headers, TIMESTAMP_HEADER)?;
        self.verify(timestamp, body, signature)
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &'static str) -> Result<&'a str, VerifyError> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .ok_or(VerifyError::MissingHeader { header: name })
}

impl std::fmt::Debug for SignatureVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureVerifier")
            .field("key", &hex::encode(self.key.as_bytes()))
            .field("max_body_size", &self.max_body_size)
            .finish()
    }
}

/// Middleware that rejects unsigned or badly signed requests.
///
/// The whole body is buffered, verified and handed downstream as a fresh body
/// so later extractors can read it again. Nothing downstream runs when
/// verification fails.
pub async fn verify_signature(
    State(verifier): State<Arc<SignatureVerifier>>,
    request: Request,
    next: Next,
) -> Result<Response, InteractionError> {
    let max_size = verifier.max_body_size();

    let declared = request
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());
    if declared.is_some_and(|len| len > max_size) {
        return Err(InteractionError::PayloadTooLarge { max_size });
    }

    let (parts, body) = request.into_parts();
    let bytes = read_body(body, max_size).await?;

    if let Err(e) = verifier.verify_headers(&parts.headers, &bytes) {
        debug!(error = %e, body_size = bytes.len(), "Signature verification failed");
        return Err(InteractionError::Unauthorized(e));
    }

    let request = Request::from_parts(parts, Body::from(bytes));
    Ok(next.run(request).await)
}

/// Buffer `body`, rejecting it as soon as it grows past `max_size`
async fn read_body(body: Body, max_size: usize) -> Result<Bytes, InteractionError> {
    let mut stream = body.into_data_stream();
    let mut buffer = BytesMut::new();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| InteractionError::MalformedBody {
            message: format!("Failed to read request body: {}", e),
        })?;
        if buffer.len() + chunk.len() > max_size {
            return Err(InteractionError::PayloadTooLarge { max_size });
        }
        buffer.extend_from_slice(&chunk);
    }

    Ok(buffer.freeze())
}

#[cfg(test)]
#[path = "verify_tests.rs"]
mod tests;
