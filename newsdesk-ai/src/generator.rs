//! Generation API client
//!
//! The services depend on the [`TextGenerator`] trait rather than a
//! concrete client, so tests can substitute stubs and a mock server can
//! stand in for the real endpoint.

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use tracing::debug;

use crate::error::AiError;

/// Fixed system message for all generation calls
const SYSTEM_PROMPT: &str =
    "You are a concise assistant for a personal news dashboard. Follow the \
     requested output format exactly.";

/// Abstraction over the external text-generation API
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Send a prompt and return the generated text
    async fn generate(&self, prompt: &str) -> Result<String, AiError>;
}

/// Model tuning for the OpenAI backend
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Chat model name
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Completion token cap
    pub max_tokens: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.3,
            max_tokens: 500,
        }
    }
}

/// OpenAI chat-completion backend for [`TextGenerator`]
#[derive(Debug, Clone)]
pub struct OpenAiGenerator {
    client: Client<OpenAIConfig>,
    config: GeneratorConfig,
}

impl OpenAiGenerator {
    /// Build a generator from the environment
    ///
    /// A missing `OPENAI_API_KEY` is reported as [`AiError::MissingApiKey`]
    /// so callers can distinguish a configuration problem from a transient
    /// failure.
    pub fn from_env() -> Result<Self, AiError> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| AiError::MissingApiKey)?;
        let config = OpenAIConfig::new().with_api_key(api_key);
        Ok(Self {
            client: Client::with_config(config),
            config: GeneratorConfig::default(),
        })
    }

    /// Build a generator against an OpenAI-compatible base URL (used by
    /// tests with a local mock server)
    pub fn with_api_base(api_base: &str, api_key: &str) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(api_base);
        Self {
            client: Client::with_config(config),
            config: GeneratorConfig::default(),
        }
    }

    /// Replace the model tuning
    pub fn with_config(mut self, config: GeneratorConfig) -> Self {
        self.config = config;
        self
    }
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.config.model)
            .messages([
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(SYSTEM_PROMPT)
                    .build()
                    .map_err(|e| AiError::RequestFailed(e.to_string()))?
                    .into(),
                ChatCompletionRequestUserMessageArgs::default()
                    .content(prompt)
                    .build()
                    .map_err(|e| AiError::RequestFailed(e.to_string()))?
                    .into(),
            ])
            .temperature(self.config.temperature)
            .max_tokens(self.config.max_tokens)
            .build()
            .map_err(|e| AiError::RequestFailed(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| AiError::RequestFailed(format!("OpenAI API error: {}", e)))?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or(AiError::EmptyResponse)?;

        if content.trim().is_empty() {
            return Err(AiError::EmptyResponse);
        }

        debug!("Generated {} characters", content.len());
        Ok(content.clone())
    }
}
