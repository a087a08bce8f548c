//! Authenticated HTTP client for the platform REST API.

use crate::error::ClientError;
use interaction_mux_core::{BotToken, Snowflake};
use reqwest::{multipart::Form, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Base URL of the versioned REST API
pub const DEFAULT_API_URL: &str = "https://discord.com/api/v10";

/// Configuration for REST client behavior.
///
/// # Examples
///
/// ```
/// use interaction_mux_client::ClientConfig;
/// use std::time::Duration;
///
/// let config = ClientConfig::default()
///     .with_timeout(Duration::from_secs(5))
///     .with_user_agent("my-bot/1.0");
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// User agent string for API requests
    pub user_agent: String,
    /// Request timeout duration
    pub timeout: Duration,
    /// REST API base URL
    pub api_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: format!(
                "DiscordBot (https://github.com/pvandervelde/interaction_mux, {})",
                env!("CARGO_PKG_VERSION")
            ),
            timeout: Duration::from_secs(10),
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

impl ClientConfig {
    /// Set the user agent string.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the REST API base URL.
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }
}

/// REST client acting on behalf of one application.
///
/// Cloning is cheap; clones share the connection pool.
///
/// # Examples
///
/// ```no_run
/// # use interaction_mux_client::{ClientConfig, CommandScope, InteractionClient};
/// # use interaction_mux_core::{BotToken, CreateCommand, Snowflake};
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = InteractionClient::new(
///     Snowflake::new(42),
///     BotToken::new("token"),
///     ClientConfig::default(),
/// )?;
///
/// let commands = [CreateCommand::slash("todo", "Manage your list")];
/// client.bulk_overwrite_commands(CommandScope::Global, &commands).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct InteractionClient {
    http_client: reqwest::Client,
    base_url: Url,
    application_id: Snowflake,
    token: BotToken,
    config: ClientConfig,
}

impl InteractionClient {
    /// Create a client for `application_id`.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Configuration` if the API URL is not a valid
    /// base URL or the HTTP client cannot be built.
    pub fn new(
        application_id: Snowflake,
        token: BotToken,
        config: ClientConfig,
    ) -> Result<Self, ClientError> {
        let base_url = parse_base_url(&config.api_url)?;

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| ClientError::Configuration {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            http_client,
            base_url,
            application_id,
            token,
            config,
        })
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn application_id(&self) -> Snowflake {
        self.application_id
    }

    // ========================================================================
    // Request helpers
    // ========================================================================

    pub(crate) fn url(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ClientError::InvalidRequest {
                message: format!("Invalid request path '{}': {}", path, e),
            })
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.http_client
            .request(method, url)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Bot {}", self.token.expose()),
            )
    }

    /// Send a request without a body and check its status
    pub(crate) async fn send(&self, method: Method, path: &str) -> Result<Response, ClientError> {
        let url = self.url(path)?;
        debug!(method = %method, path = %path, "Sending API request");
        let response = self.request(method, url).send().await?;
        check_status(response).await
    }

    /// Send a JSON body and check the response status
    pub(crate) async fn send_json<B>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<Response, ClientError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url(path)?;
        debug!(method = %method, path = %path, "Sending API request");
        let response = self.request(method, url).json(body).send().await?;
        check_status(response).await
    }

    /// Send a multipart form and check the response status
    pub(crate) async fn send_multipart(
        &self,
        method: Method,
        path: &str,
        form: Form,
    ) -> Result<Response, ClientError> {
        let url = self.url(path)?;
        debug!(method = %method, path = %path, "Sending multipart API request");
        let response = self.request(method, url).multipart(form).send().await?;
        check_status(response).await
    }
}

impl std::fmt::Debug for InteractionClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionClient")
            .field("base_url", &self.base_url.as_str())
            .field("application_id", &self.application_id)
            .field("token", &self.token)
            .field("config", &self.config)
            .finish()
    }
}

fn parse_base_url(api_url: &str) -> Result<Url, ClientError> {
    // A trailing slash keeps the version segment when joining relative paths.
    let normalized = format!("{}/", api_url.trim_end_matches('/'));
    let url = Url::parse(&normalized).map_err(|e| ClientError::Configuration {
        message: format!("Invalid API URL '{}': {}", api_url, e),
    })?;

    if url.cannot_be_a_base() {
        return Err(ClientError::Configuration {
            message: format!("API URL '{}' cannot be used as a base", api_url),
        });
    }

    Ok(url)
}

/// Turn a non-success response into a [`ClientError`] carrying its body
pub(crate) async fn check_status(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let retry_after_seconds = response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<f64>().ok());

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unable to read error body".to_string());

    warn!(status = status.as_u16(), body = %body, "API request failed");

    if status.as_u16() == 429 {
        return Err(ClientError::RateLimited {
            retry_after_seconds,
            body,
        });
    }

    Err(ClientError::HttpError {
        status: status.as_u16(),
        body,
    })
}

/// Decode a JSON response body
pub(crate) async fn json<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
