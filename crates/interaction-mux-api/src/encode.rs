//! HTTP encoding of interaction responses.
//!
//! Responses without attachments are sent as `application/json`. Responses
//! with attachments are sent as `multipart/form-data` with a fixed field
//! order: `payload_json` first, then `files[0]`, `files[1]` and so on. File
//! bodies are streamed from their source through a bounded buffer.

use crate::errors::EncodeError;
use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, HeaderValue},
    response::Response,
};
use bytes::Bytes;
use futures::{
    future,
    stream::{self, BoxStream, StreamExt, TryStreamExt},
};
use interaction_mux_core::{Attachment, InteractionResponse};
use tokio_util::io::ReaderStream;
use tracing::{debug, error};

/// Read buffer used for each attachment stream
pub const DEFAULT_BUFFER_SIZE: usize = 8 * 1024;

const CRLF: &[u8] = b"\r\n";

type PartStream = BoxStream<'static, Result<Bytes, EncodeError>>;

/// Turns an [`InteractionResponse`] into an HTTP response.
#[derive(Debug, Clone, Copy)]
pub struct ResponseEncoder {
    buffer_size: usize,
}

impl Default for ResponseEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_SIZE)
    }
}

impl ResponseEncoder {
    pub fn new(buffer_size: usize) -> Self {
        Self {
            buffer_size: buffer_size.max(1),
        }
    }

    pub fn buffer_size(&self) -> usize {
        self.buffer_size
    }

    /// Encode `response`.
    ///
    /// Attachments without an id are given their position as id before the
    /// JSON payload is serialized.
    ///
    /// # Errors
    ///
    /// Returns `EncodeError::Json` if the payload cannot be serialized. Nothing
    /// has been written at that point. Failures while streaming an attachment
    /// surface later as an error in the body stream, which aborts the
    /// response.
    pub fn encode(&self, mut response: InteractionResponse) -> Result<Response, EncodeError> {
        let attachments = match response.message_mut() {
            Some(message) if !message.attachments.is_empty() => {
                message.assign_attachment_ids();
                true
            }
            _ => false,
        };

        let payload = serde_json::to_vec(&response)?;

        if !attachments {
            let mut http = Response::new(Body::from(payload));
            http.headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            return Ok(http);
        }

        let attachments = response
            .message_mut()
            .map(|message| std::mem::take(&mut message.attachments))
            .unwrap_or_default();

        let boundary = uuid::Uuid::new_v4().simple().to_string();
        let content_type =
            HeaderValue::from_str(&format!("multipart/form-data; boundary={}", boundary))?;

        debug!(
            attachments = attachments.len(),
            boundary = %boundary,
            "Encoding multipart response"
        );

        let body = multipart_body(&boundary, payload, attachments, self.buffer_size);
        let mut http = Response::new(Body::from_stream(body));
        http.headers_mut().insert(CONTENT_TYPE, content_type);
        Ok(http)
    }
}

/// Build the multipart body as a sequence of part streams
fn multipart_body(
    boundary: &str,
    payload: Vec<u8>,
    attachments: Vec<Attachment>,
    buffer_size: usize,
) -> PartStream {
    let mut parts: Vec<PartStream> = Vec::with_capacity(2 + attachments.len() * 3);

    let payload_header = format!(
        "--{}\r\nContent-Disposition: form-data; name=\"payload_json\"\r\n\r\n",
        boundary
    );
    parts.push(chunks(vec![
        Bytes::from(payload_header),
        Bytes::from(payload),
        Bytes::from_static(CRLF),
    ]));

    for (index, attachment) in attachments.into_iter().enumerate() {
        let header = format!(
            "--{}\r\nContent-Disposition: form-data; name=\"files[{}]\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
            boundary,
            index,
            escape_filename(&attachment.filename)
        );
        parts.push(chunks(vec![Bytes::from(header)]));

        let file = ReaderStream::with_capacity(attachment.body, buffer_size).map_err(
            move |source| {
                error!(index = index, error = %source, "Failed to stream attachment");
                EncodeError::Io { index, source }
            },
        );
        parts.push(file.boxed());
        parts.push(chunks(vec![Bytes::from_static(CRLF)]));
    }

    parts.push(chunks(vec![Bytes::from(format!("--{}--\r\n", boundary))]));

    // Stop at the first error so nothing follows a failed part
    stream::iter(parts)
        .flatten()
        .scan(false, |failed, item| {
            if *failed {
                return future::ready(None);
            }
            *failed = item.is_err();
            future::ready(Some(item))
        })
        .boxed()
}

fn chunks(items: Vec<Bytes>) -> PartStream {
    stream::iter(items.into_iter().map(Ok)).boxed()
}

/// Quote-safe filename for a part header; line breaks are dropped
fn escape_filename(name: &str) -> String {
    let mut escaped = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            '\r' | '\n' => {}
            '"' | '\\' => {
                escaped.push('\\');
                escaped.push(c);
            }
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
#[path = "encode_tests.rs"]
mod tests;
