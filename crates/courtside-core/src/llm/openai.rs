use crate::constants::{endpoints, limits};
use crate::error::CourtsideError;
use crate::llm::traits::*;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub struct OpenAIClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenAIClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self, CourtsideError> {
        Self::with_timeout(api_key, Duration::from_secs(limits::LLM_TIMEOUT_SECS))
    }

    pub fn with_timeout(
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, CourtsideError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CourtsideError::Config(format!("HTTP client error: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: endpoints::OPENAI_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[derive(Debug, Serialize)]
struct OpenAIRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    frequency_penalty: f32,
    presence_penalty: f32,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAIMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

/// Classify a non-success HTTP status into the completion error taxonomy.
pub(crate) fn classify_status(status: StatusCode, body: String) -> CourtsideError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => CourtsideError::RateLimited(body),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => CourtsideError::Auth {
            status: status.as_u16(),
            message: body,
        },
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => CourtsideError::Timeout(body),
        _ => CourtsideError::Api {
            status: status.as_u16(),
            body,
        },
    }
}

#[async_trait::async_trait]
impl LlmClient for OpenAIClient {
    async fn chat(
        &self,
        messages: &[Message],
        config: &GenerationConfig,
    ) -> Result<String, CourtsideError> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        let request_body = OpenAIRequest {
            model: &config.model,
            messages,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            top_p: config.top_p,
            frequency_penalty: config.frequency_penalty,
            presence_penalty: config.presence_penalty,
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            return Err(classify_status(status, response_text));
        }

        let api_response: OpenAIResponse = serde_json::from_str(&response_text)
            .map_err(|e| CourtsideError::Llm(format!("Failed to parse response: {e}")))?;

        if let Some(usage) = &api_response.usage {
            tracing::debug!(
                "OpenAI usage: {} prompt / {} completion tokens",
                usage.prompt_tokens,
                usage.completion_tokens
            );
        }

        let choice = api_response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| CourtsideError::Llm("No response from API".into()))?;

        Ok(choice.message.content.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_429_is_rate_limit() {
        let err = classify_status(StatusCode::TOO_MANY_REQUESTS, "slow down".into());
        assert!(err.is_rate_limit());
        assert!(!err.is_transient());
    }

    #[test]
    fn auth_statuses_are_fatal() {
        for status in [StatusCode::UNAUTHORIZED, StatusCode::FORBIDDEN] {
            let err = classify_status(status, "bad key".into());
            assert!(matches!(err, CourtsideError::Auth { .. }));
            assert!(!err.is_transient());
        }
    }

    #[test]
    fn server_errors_are_transient() {
        let err = classify_status(StatusCode::BAD_GATEWAY, "upstream".into());
        assert!(err.is_transient());
        let err = classify_status(StatusCode::BAD_REQUEST, "bad".into());
        assert!(!err.is_transient());
    }

    #[test]
    fn request_serializes_lowercase_roles() {
        let messages = vec![Message::system("sys"), Message::user("hi")];
        let config = GenerationConfig::default();
        let body = OpenAIRequest {
            model: &config.model,
            messages: &messages,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            top_p: config.top_p,
            frequency_penalty: config.frequency_penalty,
            presence_penalty: config.presence_penalty,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "hi");
        assert_eq!(value["model"], "gpt-4o");
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = OpenAIClient::new("key")
            .unwrap()
            .with_base_url("http://localhost:8080/");
        assert_eq!(client.base_url(), "http://localhost:8080");
    }
}
