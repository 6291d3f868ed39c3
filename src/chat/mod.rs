//! Outbound chat-completion client
//!
//! [`QwenClient`] turns bound [`QwenSettings`] into calls against an
//! OpenAI-compatible chat endpoint. The API key is resolved through a
//! [`SecretProvider`] and the HTTP exchange goes through a [`ChatTransport`],
//! so both can be replaced in tests.

mod http;
mod settings;

pub use http::HttpTransport;
pub use settings::{AiSupporterSettings, QwenSettings, DEFAULT_MODEL, DEFAULT_TIMEOUT};

use std::sync::Arc;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::credentials::{require_secret, SecretProvider};
use crate::error::{Error, Result};

/// Compose an absolute endpoint from a base URI and a relative path.
///
/// Follows RFC 3986 reference resolution: `https://api.example.com/` joined
/// with `v1/chat` gives `https://api.example.com/v1/chat`. A base without a
/// trailing slash loses its last segment, as the standard requires.
///
/// # Errors
///
/// Returns [`Error::InvalidUri`] if `base` is not an absolute URI or the
/// join fails.
pub fn compose_endpoint(base: &str, relative: &str) -> Result<Url> {
    let base_url = Url::parse(base.trim()).map_err(|e| Error::InvalidUri {
        uri: base.to_string(),
        reason: e.to_string(),
    })?;
    base_url.join(relative.trim()).map_err(|e| Error::InvalidUri {
        uri: relative.to_string(),
        reason: e.to_string(),
    })
}

// =============================================================================
// Wire types
// =============================================================================

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Request body of a chat completion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
}

/// Response body of a chat completion
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

impl ChatResponse {
    /// Content of the first choice, if any
    pub fn first_content(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }
}

// =============================================================================
// Client
// =============================================================================

/// Sends a chat request to an endpoint
pub trait ChatTransport: Send + Sync {
    /// # Errors
    ///
    /// Returns [`Error::Transport`] on connection, status or decoding failures.
    fn send(&self, endpoint: &Url, api_key: &str, request: &ChatRequest) -> Result<ChatResponse>;
}

/// Chat API client
#[derive(Clone)]
pub struct QwenClient {
    settings: Arc<QwenSettings>,
    secrets: Arc<dyn SecretProvider>,
    transport: Arc<dyn ChatTransport>,
}

impl QwenClient {
    /// Name of the secret holding the API key
    pub const API_KEY_NAME: &'static str = "DASHSCOPE_QWEN_API_KEY";

    pub fn new(
        settings: Arc<QwenSettings>,
        secrets: Arc<dyn SecretProvider>,
        transport: Arc<dyn ChatTransport>,
    ) -> Self {
        Self {
            settings,
            secrets,
            transport,
        }
    }

    /// Client using the process environment and the blocking HTTP transport
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the HTTP client cannot be built.
    pub fn from_env(settings: Arc<QwenSettings>) -> Result<Self> {
        let transport = HttpTransport::new(settings.timeout)?;
        Ok(Self::new(
            settings,
            Arc::new(crate::credentials::EnvSecretProvider::new()),
            Arc::new(transport),
        ))
    }

    pub fn settings(&self) -> &QwenSettings {
        &self.settings
    }

    /// The API key; fails if unset or blank
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCredential`] if the key is unset or blank.
    pub fn api_key(&self) -> Result<String> {
        require_secret(self.secrets.as_ref(), Self::API_KEY_NAME)
    }

    /// Absolute chat endpoint
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUri`] if the configured URIs do not compose.
    pub fn endpoint(&self) -> Result<Url> {
        compose_endpoint(&self.settings.base_uri, &self.settings.chat_url)
    }

    /// Send a conversation and return the completion.
    ///
    /// The API key is checked before anything goes over the wire.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingCredential`], [`Error::InvalidUri`] or
    /// [`Error::Transport`].
    pub fn chat(&self, messages: Vec<ChatMessage>) -> Result<ChatResponse> {
        let api_key = self.api_key()?;
        let endpoint = self.endpoint()?;

        let request = ChatRequest {
            model: self.settings.model.clone(),
            messages,
        };
        log::debug!(
            "Sending {} message(s) to {endpoint} with model {}",
            request.messages.len(),
            request.model
        );
        self.transport.send(&endpoint, &api_key, &request)
    }
}

impl std::fmt::Debug for QwenClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QwenClient")
            .field("settings", &self.settings)
            .field("secrets", &self.secrets.provider_name())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Tests
// =============================================================================
