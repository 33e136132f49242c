//! Chatbase chat API client.
//!
//! Sends a prompt to a hosted Chatbase chatbot and returns the answer text.
//!
//! # Example
//!
//! ```rust,ignore
//! use chatbase_client::ChatbaseClient;
//!
//! let client = ChatbaseClient::from_env()?;
//! let answer = client.ask("How smart is Caldes?").await?;
//! ```

pub mod error;
pub mod types;

pub use error::{ChatbaseError, Result};
pub use types::{error_message, ChatRequest, ChatResponse, Message};

use analyzer_core::{CompletionError, CompletionService};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Chatbase API base URL.
pub const DEFAULT_BASE_URL: &str = "https://www.chatbase.co/api/v1";

/// Client-side request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Chatbase API client bound to one chatbot.
///
/// The API key is held as a [`SecretString`] and redacted from `Debug`.
#[derive(Debug, Clone)]
pub struct ChatbaseClient {
    http_client: reqwest::Client,
    api_key: Arc<SecretString>,
    chatbot_id: String,
    base_url: String,
}

impl ChatbaseClient {
    /// Create a client for `chatbot_id` authenticated with `api_key`.
    pub fn new(api_key: impl Into<String>, chatbot_id: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        let chatbot_id = chatbot_id.into();

        if api_key.trim().is_empty() {
            return Err(ChatbaseError::Config("API key is empty".into()));
        }
        if chatbot_id.trim().is_empty() {
            return Err(ChatbaseError::Config("chatbot id is empty".into()));
        }

        let http_client = reqwest::Client::builder().timeout(DEFAULT_TIMEOUT).build()?;

        Ok(Self {
            http_client,
            api_key: Arc::new(SecretString::from(api_key)),
            chatbot_id,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Create from `CHATBASE_API_KEY` and `CHATBASE_CHATBOT_ID`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("CHATBASE_API_KEY")
            .map_err(|_| ChatbaseError::Config("CHATBASE_API_KEY not set".into()))?;
        let chatbot_id = std::env::var("CHATBASE_CHATBOT_ID")
            .map_err(|_| ChatbaseError::Config("CHATBASE_CHATBOT_ID not set".into()))?;
        Self::new(api_key, chatbot_id)
    }

    /// Set a custom base URL (proxies, self-hosted gateways).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn chatbot_id(&self) -> &str {
        &self.chatbot_id
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a chat request and return the answer text.
    pub async fn chat(&self, request: &ChatRequest) -> Result<String> {
        let start = Instant::now();

        let response = self
            .http_client
            .post(format!("{}/chat", self.base_url))
            .bearer_auth(self.api_key.expose_secret())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Chatbase request failed");
                ChatbaseError::Network(e)
            })?;

        let status = response.status();
        let body = response.text().await?;

        if status != reqwest::StatusCode::OK {
            let message = error_message(&body);
            warn!(status = %status, error = %message, "Chatbase API error");
            return Err(ChatbaseError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let chat_response: ChatResponse =
            serde_json::from_str(&body).map_err(|e| ChatbaseError::Parse(e.to_string()))?;

        debug!(
            chatbot_id = %self.chatbot_id,
            duration_ms = start.elapsed().as_millis(),
            "Chatbase chat completion"
        );

        Ok(chat_response.into_text())
    }

    /// Ask a single user question.
    pub async fn ask(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest::new(&self.chatbot_id).message(Message::user(prompt));
        self.chat(&request).await
    }
}

#[async_trait]
impl CompletionService for ChatbaseClient {
    async fn complete(&self, prompt: &str) -> std::result::Result<String, CompletionError> {
        Ok(self.ask(prompt).await?)
    }
}
