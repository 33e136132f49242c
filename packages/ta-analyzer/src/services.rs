//! External service clients built from configuration.

use anyhow::{anyhow, Context, Result};
use chatbase_client::ChatbaseClient;
use overpass_client::OverpassClient;
use std::time::Duration;

use crate::config::Config;

pub struct Services {
    pub geo: OverpassClient,
    /// `None` until both the API key and chatbot id are configured.
    chat: Option<ChatbaseClient>,
}

impl Services {
    pub fn from_config(config: &Config) -> Result<Self> {
        let geo = OverpassClient::with_timeout(Duration::from_secs(config.overpass.timeout_secs))
            .context("Failed to build Overpass client")?
            .with_endpoint(&config.overpass.endpoint);

        let chat = match (&config.chatbase_api_key, &config.chatbase.chatbot_id) {
            (Some(key), Some(id)) => Some(
                ChatbaseClient::new(key.as_str(), id.as_str())
                    .context("Failed to build Chatbase client")?
                    .with_base_url(&config.chatbase.base_url),
            ),
            _ => {
                tracing::debug!("Chatbase credentials not configured; analysis disabled");
                None
            }
        };

        Ok(Self { geo, chat })
    }

    /// The completion client, or an error naming the missing settings.
    pub fn chat(&self) -> Result<&ChatbaseClient> {
        self.chat.as_ref().ok_or_else(|| {
            anyhow!("Chatbase is not configured: set CHATBASE_API_KEY and CHATBASE_CHATBOT_ID")
        })
    }
}
