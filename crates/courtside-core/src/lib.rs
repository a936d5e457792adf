pub mod config;
pub mod constants;
pub mod error;
pub mod extract;
pub mod llm;
pub mod search;
pub mod session;
pub mod stats;

// Re-export key types
pub use config::Settings;
pub use error::{CourtsideError, Result};
pub use extract::{extract_json, ExtractError};
pub use llm::{GenerationConfig, LlmClient, Message, Role};
pub use search::{SearchClient, SearchResult};
pub use session::{CachePolicy, ConversationHistory, ConversationSession, SessionConfig, SystemDirective};
pub use stats::{Catalog, StatsFetcher, StatsReport, StatsStore};
