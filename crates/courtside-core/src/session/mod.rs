mod cache;
mod conversation;
mod directive;
mod history;

pub use cache::ResponseCache;
pub use conversation::{CachePolicy, ConversationSession, SessionConfig};
pub use directive::SystemDirective;
pub use history::{ConversationHistory, HistorySnapshot};
