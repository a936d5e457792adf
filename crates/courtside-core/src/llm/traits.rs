use crate::error::CourtsideError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

/// A single role-tagged message. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

/// Sampling parameters sent with every completion request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationConfig {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
}

impl GenerationConfig {
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        use crate::constants::{defaults, models};
        Self {
            model: models::DEFAULT_OPENAI_MODEL.to_string(),
            temperature: defaults::CHAT_TEMPERATURE,
            max_tokens: defaults::MAX_TOKENS,
            top_p: defaults::CHAT_TOP_P,
            frequency_penalty: defaults::CHAT_FREQUENCY_PENALTY,
            presence_penalty: defaults::CHAT_PRESENCE_PENALTY,
        }
    }
}

/// The completion collaborator.
///
/// Implementations return the reply text, or one of the typed failures:
/// `RateLimited`, `Timeout`, `Connection`, `Auth`, `Api`.
#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    async fn chat(
        &self,
        messages: &[Message],
        config: &GenerationConfig,
    ) -> Result<String, CourtsideError>;
}

