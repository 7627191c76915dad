//! AnthropicProvider implementation.

use provider_core::{
    async_trait, GenerateLimits, ProviderError, StatelessProvider, Turn,
};
use reqwest::Client;
use tracing::{debug, info};

use crate::api_types::{ApiError, ApiMessage, MessagesRequest, MessagesResponse};
use crate::config::{AnthropicConfig, API_VERSION};

/// Fallback token limit when the caller leaves max_tokens unset; the
/// messages API rejects requests without one.
const DEFAULT_MAX_TOKENS: u32 = 1024;

/// A stateless adapter backed by Anthropic's messages API.
pub struct AnthropicProvider {
    client: Client,
    config: AnthropicConfig,
}

impl AnthropicProvider {
    /// Create a new AnthropicProvider with the given configuration.
    pub fn new(config: AnthropicConfig) -> Result<Self, ProviderError> {
        if config.api_key.is_empty() {
            return Err(ProviderError::Configuration(
                "Anthropic API key is empty".to_string(),
            ));
        }

        let client = Client::builder().build().map_err(|e| {
            ProviderError::Configuration(format!("Failed to create HTTP client: {}", e))
        })?;

        info!("AnthropicProvider initialized with model: {}", config.model);

        Ok(Self { client, config })
    }

    /// Create an AnthropicProvider from environment variables.
    ///
    /// See [`AnthropicConfig::from_env`] for the variables consumed.
    pub fn from_env() -> Result<Self, ProviderError> {
        Self::new(AnthropicConfig::from_env()?)
    }

    /// Get the configuration.
    pub fn config(&self) -> &AnthropicConfig {
        &self.config
    }

    /// Build the messages array from history plus the new user message.
    fn build_messages(&self, history: &[Turn], message: &str) -> Vec<ApiMessage> {
        let mut messages = Vec::with_capacity(history.len() + 1);

        for turn in history {
            messages.push(ApiMessage {
                role: turn.role.as_str().to_string(),
                content: turn.content.clone(),
            });
        }

        messages.push(ApiMessage {
            role: "user".to_string(),
            content: message.to_string(),
        });

        messages
    }
}

#[async_trait]
impl StatelessProvider for AnthropicProvider {
    async fn generate(
        &self,
        system_prompt: &str,
        history: &[Turn],
        message: &str,
        limits: &GenerateLimits,
    ) -> Result<String, ProviderError> {
        let url = format!("{}/v1/messages", self.config.api_url);

        let request = MessagesRequest {
            model: self.config.model.clone(),
            system: (!system_prompt.is_empty()).then(|| system_prompt.to_string()),
            messages: self.build_messages(history, message),
            max_tokens: limits.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            temperature: limits.temperature,
        };

        debug!("Sending request to Anthropic API: {:?}", request);

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", API_VERSION)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Network(format!("Failed to send request: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            if let Ok(api_error) = serde_json::from_str::<ApiError>(&error_text) {
                return Err(ProviderError::Api {
                    status: status.as_u16(),
                    message: api_error.error.message,
                });
            }

            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let reply: MessagesResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        reply
            .content
            .into_iter()
            .find(|block| block.block_type == "text")
            .and_then(|block| block.text)
            .filter(|text| !text.is_empty())
            .ok_or_else(|| ProviderError::InvalidResponse("no text block in reply".to_string()))
    }

    fn name(&self) -> &str {
        "anthropic"
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}
