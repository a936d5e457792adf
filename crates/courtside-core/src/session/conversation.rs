use std::sync::Arc;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::constants::defaults;
use crate::error::{CourtsideError, Result};
use crate::llm::{GenerationConfig, LlmClient, Message};
use crate::session::{ConversationHistory, ResponseCache, SystemDirective};

/// How repeated inputs interact with the response cache and the history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CachePolicy {
    /// Every input goes to the model.
    #[default]
    Disabled,
    /// A hit returns the cached reply and leaves history untouched.
    /// Later turns will not see the repeated question.
    ShortCircuit,
    /// A hit returns the cached reply and records the exchange in history,
    /// so later turns still see it.
    Replay,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// History bound in messages; one exchange is two messages.
    pub max_messages: usize,
    pub cache_capacity: usize,
    pub cache_policy: CachePolicy,
    /// Restore history to its pre-submit state when the model call fails.
    pub rollback_on_failure: bool,
    pub fallback_reply: String,
    pub directive: SystemDirective,
    pub generation: GenerationConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_messages: defaults::MAX_HISTORY_MESSAGES,
            cache_capacity: defaults::CACHE_CAPACITY,
            cache_policy: CachePolicy::default(),
            rollback_on_failure: true,
            fallback_reply: defaults::FALLBACK_REPLY.to_string(),
            directive: SystemDirective::default(),
            generation: GenerationConfig::default(),
        }
    }
}

type Clock = Box<dyn Fn() -> DateTime<Local> + Send + Sync>;

/// One multi-turn dialogue with a completion model.
///
/// Owns the bounded history and the reply cache together, so a history
/// append and the matching cache write always happen under the same `&mut`.
pub struct ConversationSession {
    client: Arc<dyn LlmClient>,
    history: ConversationHistory,
    cache: ResponseCache,
    config: SessionConfig,
    clock: Clock,
}

impl ConversationSession {
    pub fn new(client: Arc<dyn LlmClient>, config: SessionConfig) -> Self {
        let cache = match config.cache_policy {
            CachePolicy::Disabled => ResponseCache::disabled(),
            _ => ResponseCache::new(config.cache_capacity),
        };
        Self {
            client,
            history: ConversationHistory::with_max_messages(config.max_messages),
            cache,
            config,
            clock: Box::new(Local::now),
        }
    }

    /// Replace the time source used to render the system directive.
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Local> + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Send `input` and return the model's reply.
    ///
    /// Rate-limited calls resolve to the configured fallback reply instead of
    /// an error. Other failures are returned; with `rollback_on_failure` the
    /// history is left exactly as it was before the call.
    pub async fn submit(&mut self, input: &str) -> Result<String> {
        if input.trim().is_empty() {
            return Err(CourtsideError::EmptyInput);
        }

        if let Some(reply) = self.cache.get(input) {
            tracing::debug!("Response cache hit ({:?})", self.config.cache_policy);
            if self.config.cache_policy == CachePolicy::Replay {
                self.history.add_user_message(input);
                self.history.add_assistant_message(reply.clone());
            }
            return Ok(reply);
        }

        let snapshot = self.history.snapshot();
        self.history.add_user_message(input);

        let request = self.build_request();
        match self.client.chat(&request, &self.config.generation).await {
            Ok(reply) => {
                self.history.add_assistant_message(reply.clone());
                self.cache.insert(input, reply.clone());
                Ok(reply)
            }
            Err(e) if e.is_rate_limit() => {
                tracing::warn!("LLM rate limited, returning fallback reply: {}", e);
                if self.config.rollback_on_failure {
                    self.history.restore(snapshot);
                }
                Ok(self.config.fallback_reply.clone())
            }
            Err(e) => {
                tracing::error!("LLM request failed: {}", e);
                if self.config.rollback_on_failure {
                    self.history.restore(snapshot);
                }
                Err(e)
            }
        }
    }

    /// The directive followed by the full history, oldest first.
    pub fn build_request(&self) -> Vec<Message> {
        let mut messages = Vec::with_capacity(self.history.len() + 1);
        messages.push(Message::system(self.config.directive.render((self.clock)())));
        messages.extend(self.history.messages().cloned());
        messages
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Update the context block of the system directive. A changed context
    /// empties the reply cache.
    pub fn set_directive_context(&mut self, context: Option<String>) {
        if self.config.directive.context() == context.as_deref() {
            return;
        }
        self.config.directive.set_context(context);
        self.clear_cache();
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Forget all history and cached replies.
    pub fn reset(&mut self) {
        self.history.clear();
        self.cache.clear();
    }
}
