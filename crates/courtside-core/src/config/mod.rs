use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::constants::{defaults, limits, models, paths};
use crate::error::CourtsideError;
use crate::llm::{GenerationConfig, LlmClient, OpenAIClient, RetryPolicy, RetryingClient};
use crate::search::DuckDuckGoSearch;
use crate::session::{CachePolicy, SessionConfig, SystemDirective};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub llm: LlmSettings,
    pub session: SessionSettings,
    pub retry: RetrySettings,
    pub search: SearchSettings,
    pub output: OutputSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub model: String,
    pub api_key_env: String,
    pub base_url: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub top_p: f32,
    pub frequency_penalty: f32,
    pub presence_penalty: f32,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSettings {
    /// History bound in messages.
    pub max_messages: usize,
    pub cache_capacity: usize,
    pub cache_policy: CachePolicy,
    pub rollback_on_failure: bool,
    pub fallback_reply: String,
    pub persona: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrySettings {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub max_results: usize,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub dir: PathBuf,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: models::DEFAULT_OPENAI_MODEL.to_string(),
            api_key_env: defaults::API_KEY_ENV.to_string(),
            base_url: None,
            max_tokens: defaults::MAX_TOKENS,
            temperature: defaults::CHAT_TEMPERATURE,
            top_p: defaults::CHAT_TOP_P,
            frequency_penalty: defaults::CHAT_FREQUENCY_PENALTY,
            presence_penalty: defaults::CHAT_PRESENCE_PENALTY,
            timeout_secs: limits::LLM_TIMEOUT_SECS,
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            max_messages: defaults::MAX_HISTORY_MESSAGES,
            cache_capacity: defaults::CACHE_CAPACITY,
            // The interactive app opts in to caching; SessionConfig alone does not.
            cache_policy: CachePolicy::Replay,
            rollback_on_failure: true,
            fallback_reply: defaults::FALLBACK_REPLY.to_string(),
            persona: defaults::PERSONA.to_string(),
        }
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: limits::MAX_RETRIES,
            base_delay_ms: limits::RETRY_BASE_DELAY_MS,
            max_delay_ms: limits::RETRY_MAX_DELAY_MS,
        }
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            max_results: limits::SEARCH_MAX_RESULTS,
            timeout_secs: limits::SEARCH_TIMEOUT_SECS,
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(defaults::OUTPUT_DIR),
        }
    }
}

impl Settings {
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(paths::CONFIG_DIR)
            .join(paths::CONFIG_FILE)
    }

    /// Load `.env` (if any) and the user config file, falling back to defaults.
    pub fn load() -> Self {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!("Failed to load .env: {}", e),
        }

        let config_path = Self::config_path();
        if !config_path.exists() {
            return Self::default();
        }
        match Self::load_from(&config_path) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("Ignoring {}: {}", config_path.display(), e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, CourtsideError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CourtsideError::Config(e.to_string()))
    }

    pub fn save(&self) -> Result<(), CourtsideError> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), CourtsideError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| CourtsideError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the API key from the environment variable named in settings.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.llm.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }

    pub fn generation(&self) -> GenerationConfig {
        GenerationConfig {
            model: self.llm.model.clone(),
            temperature: self.llm.temperature,
            max_tokens: self.llm.max_tokens,
            top_p: self.llm.top_p,
            frequency_penalty: self.llm.frequency_penalty,
            presence_penalty: self.llm.presence_penalty,
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.retry.max_retries,
            base_delay: Duration::from_millis(self.retry.base_delay_ms),
            max_delay: Duration::from_millis(self.retry.max_delay_ms),
        }
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            max_messages: self.session.max_messages,
            cache_capacity: self.session.cache_capacity,
            cache_policy: self.session.cache_policy,
            rollback_on_failure: self.session.rollback_on_failure,
            fallback_reply: self.session.fallback_reply.clone(),
            directive: SystemDirective::new(&self.session.persona),
            generation: self.generation(),
        }
    }

    /// Reject settings that would make a session or client misbehave.
    pub fn validate(&self) -> Result<(), CourtsideError> {
        if self.session.max_messages < limits::MIN_HISTORY_MESSAGES {
            return Err(CourtsideError::Config(format!(
                "session.max_messages must be at least {} (one exchange), got {}",
                limits::MIN_HISTORY_MESSAGES,
                self.session.max_messages
            )));
        }
        if self.session.max_messages > limits::MAX_HISTORY_BOUND {
            return Err(CourtsideError::Config(format!(
                "session.max_messages must be at most {}, got {}",
                limits::MAX_HISTORY_BOUND,
                self.session.max_messages
            )));
        }
        if self.llm.model.trim().is_empty() {
            return Err(CourtsideError::Config("llm.model is empty".into()));
        }
        if self.llm.timeout_secs == 0 || self.search.timeout_secs == 0 {
            return Err(CourtsideError::Config("timeouts must be non-zero".into()));
        }
        Ok(())
    }

    /// Build the OpenAI client, wrapped with retry for transient failures.
    pub fn build_llm_client(&self) -> Result<Arc<dyn LlmClient>, CourtsideError> {
        let api_key = self.api_key().ok_or_else(|| {
            CourtsideError::Config(format!(
                "No API key found. Set the {} environment variable (a .env file works too).",
                self.llm.api_key_env
            ))
        })?;

        let mut client =
            OpenAIClient::with_timeout(api_key, Duration::from_secs(self.llm.timeout_secs))?;
        if let Some(base_url) = &self.llm.base_url {
            client = client.with_base_url(base_url);
        }

        Ok(Arc::new(RetryingClient::new(
            Box::new(client),
            self.retry_policy(),
        )))
    }

    pub fn build_search_client(&self) -> Result<DuckDuckGoSearch, CourtsideError> {
        DuckDuckGoSearch::with_options(
            self.search.max_results,
            Duration::from_secs(self.search.timeout_secs),
        )
    }
}
