//! GeminiProvider implementation.

use provider_core::{
    async_trait, Continuation, GenerateLimits, ProviderError, StatefulProvider, Turn,
};
use reqwest::Client;
use tracing::{debug, info};

use crate::api_types::{
    ApiError, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    SystemInstruction,
};
use crate::config::GeminiConfig;
use crate::session::ChatSession;

/// A stateful adapter backed by Gemini's generateContent API.
///
/// The continuation handle carries the whole chat session, so the
/// orchestrator never resends history after opening. The backend sees
/// the accumulated contents each call, like the SDK's ChatSession.
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
}

impl GeminiProvider {
    /// Create a new GeminiProvider with the given configuration.
    pub fn new(config: GeminiConfig) -> Result<Self, ProviderError> {
        if config.api_key.is_empty() {
            return Err(ProviderError::Configuration(
                "Gemini API key is empty".to_string(),
            ));
        }

        let client = Client::builder().build().map_err(|e| {
            ProviderError::Configuration(format!("Failed to create HTTP client: {}", e))
        })?;

        info!("GeminiProvider initialized with model: {}", config.model);

        Ok(Self { client, config })
    }

    /// Create a GeminiProvider from environment variables.
    ///
    /// See [`GeminiConfig::from_env`] for the variables consumed.
    pub fn from_env() -> Result<Self, ProviderError> {
        Self::new(GeminiConfig::from_env()?)
    }

    /// Get the configuration.
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    /// Call generateContent with the session's accumulated contents.
    async fn generate_content(
        &self,
        session: &ChatSession,
        limits: &GenerateLimits,
    ) -> Result<String, ProviderError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.config.api_url, self.config.model, self.config.api_key
        );

        let request = GenerateContentRequest {
            contents: session.contents.clone(),
            system_instruction: (!session.system_prompt.is_empty())
                .then(|| SystemInstruction::new(session.system_prompt.clone())),
            generation_config: Some(GenerationConfig {
                max_output_tokens: limits.max_tokens,
                temperature: limits.temperature,
            }),
        };

        debug!(
            "Sending request to Gemini API ({} contents)",
            request.contents.len()
        );

        let response = self
            .client
            .post(&url)
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

        let reply: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        reply
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| content.text())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| ProviderError::InvalidResponse("no candidate content".to_string()))
    }
}

#[async_trait]
impl StatefulProvider for GeminiProvider {
    async fn open(
        &self,
        system_prompt: &str,
        history: &[Turn],
    ) -> Result<Continuation, ProviderError> {
        let session = ChatSession::seed(system_prompt, history);

        info!(
            "Opened Gemini chat session ({} replayed entries)",
            session.len()
        );

        session.into_continuation(self.name())
    }

    async fn send(
        &self,
        continuation: &mut Continuation,
        message: &str,
        limits: &GenerateLimits,
    ) -> Result<String, ProviderError> {
        let mut session = ChatSession::from_continuation(continuation, self.name())?;

        session.contents.push(Content::user(message));

        let reply = self.generate_content(&session, limits).await?;

        session.contents.push(Content::model(reply.clone()));
        *continuation = session.into_continuation(self.name())?;

        Ok(reply)
    }

    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}
