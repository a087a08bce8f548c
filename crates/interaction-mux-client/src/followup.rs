//! Follow-up messages and the original interaction response.
//!
//! These calls are addressed by the interaction token, which stays valid for
//! 15 minutes after the interaction was received. Messages with attachments
//! are sent as `multipart/form-data`: `payload_json` first, then one
//! `files[i]` part per attachment streamed from its byte source.

use crate::client::{json, InteractionClient};
use crate::error::ClientError;
use interaction_mux_core::{Message, Snowflake};
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Method};
use serde::Deserialize;
use tokio_util::io::ReaderStream;

/// A message as returned by the platform
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SentMessage {
    pub id: Snowflake,

    #[serde(default)]
    pub channel_id: Option<Snowflake>,

    #[serde(default)]
    pub content: String,
}

impl InteractionClient {
    /// Send a new message after the interaction was answered.
    pub async fn create_followup(
        &self,
        interaction_token: &str,
        message: Message,
    ) -> Result<SentMessage, ClientError> {
        let path = self.webhook_path(interaction_token, None)?;
        self.send_message(Method::POST, &path, message).await
    }

    /// Fetch a follow-up message.
    pub async fn get_followup(
        &self,
        interaction_token: &str,
        message_id: Snowflake,
    ) -> Result<SentMessage, ClientError> {
        let path = self.webhook_path(interaction_token, Some(&message_id.to_string()))?;
        json(self.send(Method::GET, &path).await?).await
    }

    /// Replace the content of a follow-up message.
    pub async fn edit_followup(
        &self,
        interaction_token: &str,
        message_id: Snowflake,
        message: Message,
    ) -> Result<SentMessage, ClientError> {
        let path = self.webhook_path(interaction_token, Some(&message_id.to_string()))?;
        self.send_message(Method::PATCH, &path, message).await
    }

    /// Delete a follow-up message.
    pub async fn delete_followup(
        &self,
        interaction_token: &str,
        message_id: Snowflake,
    ) -> Result<(), ClientError> {
        let path = self.webhook_path(interaction_token, Some(&message_id.to_string()))?;
        self.send(Method::DELETE, &path).await?;
        Ok(())
    }

    /// Fetch the original response.
    pub async fn get_original_response(
        &self,
        interaction_token: &str,
    ) -> Result<SentMessage, ClientError> {
        let path = self.webhook_path(interaction_token, Some("@original"))?;
        json(self.send(Method::GET, &path).await?).await
    }

    /// Replace the content of the original response, typically after a
    /// deferred response.
    pub async fn edit_original_response(
        &self,
        interaction_token: &str,
        message: Message,
    ) -> Result<SentMessage, ClientError> {
        let path = self.webhook_path(interaction_token, Some("@original"))?;
        self.send_message(Method::PATCH, &path, message).await
    }

    /// Delete the original response.
    pub async fn delete_original_response(
        &self,
        interaction_token: &str,
    ) -> Result<(), ClientError> {
        let path = self.webhook_path(interaction_token, Some("@original"))?;
        self.send(Method::DELETE, &path).await?;
        Ok(())
    }

    async fn send_message(
        &self,
        method: Method,
        path: &str,
        message: Message,
    ) -> Result<SentMessage, ClientError> {
        // Attachment sources are not Sync, so no borrow of the message may
        // be held across an await
        let response = if message.attachments.is_empty() {
            let payload = serde_json::to_value(&message)?;
            self.send_json(method, path, &payload).await?
        } else {
            self.send_multipart(method, path, message_form(message)?)
                .await?
        };
        json(response).await
    }

    fn webhook_path(
        &self,
        interaction_token: &str,
        message: Option<&str>,
    ) -> Result<String, ClientError> {
        if interaction_token.is_empty() || interaction_token.contains(['/', '?', '#']) {
            return Err(ClientError::InvalidRequest {
                message: "interaction token is empty or contains path characters".to_string(),
            });
        }

        let base = format!("webhooks/{}/{}", self.application_id(), interaction_token);
        Ok(match message {
            Some(message) => format!("{}/messages/{}", base, message),
            None => base,
        })
    }
}

/// Build the multipart body of a message with attachments
fn message_form(mut message: Message) -> Result<Form, ClientError> {
    message.assign_attachment_ids();
    let payload = serde_json::to_string(&message)?;

    let mut form = Form::new().part(
        "payload_json",
        Part::text(payload).mime_str("application/json")?,
    );

    let attachments = std::mem::take(&mut message.attachments);
    for (index, attachment) in attachments.into_iter().enumerate() {
        let body = Body::wrap_stream(ReaderStream::new(attachment.body));
        let file = Part::stream(body)
            .file_name(attachment.filename)
            .mime_str("application/octet-stream")?;
        form = form.part(format!("files[{}]", index), file);
    }

    Ok(form)
}

#[cfg(test)]
#[path = "followup_tests.rs"]
mod tests;
