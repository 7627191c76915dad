//! OpenAiProvider implementation.

use provider_core::{
    async_trait, GenerateLimits, ProviderError, StatelessProvider, Turn,
};
use reqwest::Client;
use tracing::{debug, info};

use crate::api_types::{ApiError, ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use crate::config::OpenAiConfig;

/// A stateless adapter backed by OpenAI's chat-completions API.
///
/// Each call rebuilds the full messages array from the system prompt,
/// prior history, and the new user message.
pub struct OpenAiProvider {
    client: Client,
    config: OpenAiConfig,
}

impl OpenAiProvider {
    /// Create a new OpenAiProvider with the given configuration.
    pub fn new(config: OpenAiConfig) -> Result<Self, ProviderError> {
        if config.api_key.is_empty() {
            return Err(ProviderError::Configuration(
                "OpenAI API key is empty".to_string(),
            ));
        }

        let client = Client::builder().build().map_err(|e| {
            ProviderError::Configuration(format!("Failed to create HTTP client: {}", e))
        })?;

        info!("OpenAiProvider initialized with model: {}", config.model);

        Ok(Self { client, config })
    }

    /// Create an OpenAiProvider from environment variables.
    ///
    /// See [`OpenAiConfig::from_env`] for the variables consumed.
    pub fn from_env() -> Result<Self, ProviderError> {
        Self::new(OpenAiConfig::from_env()?)
    }

    /// Get the configuration.
    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    /// Build the messages array for a chat completion request.
    fn build_messages(&self, system_prompt: &str, history: &[Turn], message: &str) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(history.len() + 2);

        if !system_prompt.is_empty() {
            messages.push(ChatMessage::system(system_prompt));
        }

        for turn in history {
            messages.push(ChatMessage {
                role: turn.role.as_str().to_string(),
                content: turn.content.clone(),
            });
        }

        messages.push(ChatMessage::user(message));

        messages
    }

    /// Make a chat completion request.
    async fn chat_completion(
        &self,
        messages: Vec<ChatMessage>,
        limits: &GenerateLimits,
    ) -> Result<ChatCompletionResponse, ProviderError> {
        let url = format!("{}/v1/chat/completions", self.config.api_url);

        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: limits.max_tokens,
            temperature: limits.temperature,
        };

        debug!("Sending request to OpenAI API: {:?}", request);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::Network(format!("Failed to send request: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            // Try to parse as API error
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

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        Ok(completion)
    }
}

#[async_trait]
impl StatelessProvider for OpenAiProvider {
    async fn generate(
        &self,
        system_prompt: &str,
        history: &[Turn],
        message: &str,
        limits: &GenerateLimits,
    ) -> Result<String, ProviderError> {
        let messages = self.build_messages(system_prompt, history, message);

        let completion = self.chat_completion(messages, limits).await?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|text| !text.is_empty())
            .ok_or_else(|| {
                ProviderError::InvalidResponse("no content in completion".to_string())
            })
    }

    fn name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}
