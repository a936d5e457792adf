use crate::constants::limits;
use crate::error::CourtsideError;
use crate::llm::traits::*;
use std::time::Duration;

/// Backoff settings for [`RetryingClient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Exponential delay before retry number `attempt` (0-based), capped at `max_delay`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: limits::MAX_RETRIES,
            base_delay: Duration::from_millis(limits::RETRY_BASE_DELAY_MS),
            max_delay: Duration::from_millis(limits::RETRY_MAX_DELAY_MS),
        }
    }
}

/// Wraps another client and retries transient failures with exponential backoff.
///
/// Rate limits and auth failures are returned immediately: the former is
/// answered with a fallback by the session, the latter will not heal by waiting.
pub struct RetryingClient {
    inner: Box<dyn LlmClient>,
    policy: RetryPolicy,
}

impl RetryingClient {
    pub fn new(inner: Box<dyn LlmClient>, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

#[async_trait::async_trait]
impl LlmClient for RetryingClient {
    async fn chat(
        &self,
        messages: &[Message],
        config: &GenerationConfig,
    ) -> Result<String, CourtsideError> {
        let mut attempt = 0;
        loop {
            match self.inner.chat(messages, config).await {
                Ok(reply) => return Ok(reply),
                Err(e) if e.is_transient() && attempt < self.policy.max_retries => {
                    let delay = self.policy.delay_for(attempt);
                    tracing::warn!(
                        "Transient LLM failure (attempt {}/{}): {}. Retrying in {:?}",
                        attempt + 1,
                        self.policy.max_retries + 1,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
