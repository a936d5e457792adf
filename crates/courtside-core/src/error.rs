use thiserror::Error;

use crate::extract::ExtractError;

#[derive(Error, Debug)]
pub enum CourtsideError {
    #[error("LLM rate limit exceeded: {0}")]
    RateLimited(String),

    #[error("LLM request timed out: {0}")]
    Timeout(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Authentication failed ({status}): {message}")]
    Auth { status: u16, message: String },

    #[error("LLM API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Search error: {0}")]
    Search(String),

    #[error("Input is empty")]
    EmptyInput,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{0}")]
    Other(String),
}

impl CourtsideError {
    /// Failures worth another attempt: timeouts, dropped connections and server-side errors.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout(_) | Self::Connection(_) => true,
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    pub fn is_rate_limit(&self) -> bool {
        matches!(self, Self::RateLimited(_))
    }
}

/// Maps transport-level failures onto the completion error taxonomy.
impl From<reqwest::Error> for CourtsideError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout(e.to_string())
        } else if e.is_connect() || e.is_request() {
            Self::Connection(e.to_string())
        } else if let Some(status) = e.status() {
            Self::Api {
                status: status.as_u16(),
                body: e.to_string(),
            }
        } else {
            Self::Llm(e.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, CourtsideError>;
