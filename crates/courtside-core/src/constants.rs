/// Courtside: centralized constants.
/// Model names, endpoints, defaults and limits live here.

// ─── Models ───────────────────────────────────────────────────────────────────

pub mod models {
    pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";
}

// ─── API Endpoints ────────────────────────────────────────────────────────────

pub mod endpoints {
    pub const OPENAI_BASE_URL: &str = "https://api.openai.com";
    pub const DUCKDUCKGO_HTML_URL: &str = "https://html.duckduckgo.com/html/";
}

// ─── Default Settings ─────────────────────────────────────────────────────────

pub mod defaults {
    pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
    pub const MAX_TOKENS: u32 = 4096;

    /// Sampling for conversational turns.
    pub const CHAT_TEMPERATURE: f32 = 0.7;
    pub const CHAT_TOP_P: f32 = 1.0;
    pub const CHAT_FREQUENCY_PENALTY: f32 = 0.0;
    pub const CHAT_PRESENCE_PENALTY: f32 = 0.0;

    /// Extraction runs deterministic.
    pub const EXTRACTION_TEMPERATURE: f32 = 0.0;

    /// History bound, counted in messages (two per exchange).
    pub const MAX_HISTORY_MESSAGES: usize = 20;
    pub const CACHE_CAPACITY: usize = 128;

    pub const FALLBACK_REPLY: &str =
        "The service is currently overloaded, please try again later.";

    pub const PERSONA: &str = "You are Courtside, a concise assistant for NBA statistics. \
Answer using the statistics provided in the conversation when they are relevant, \
and say so plainly when you do not know something.";

    pub const OUTPUT_DIR: &str = "nba_stats";
}

// ─── Resource Limits ──────────────────────────────────────────────────────────

pub mod limits {
    pub const LLM_TIMEOUT_SECS: u64 = 60;
    pub const SEARCH_TIMEOUT_SECS: u64 = 15;
    pub const SEARCH_MAX_RESULTS: usize = 10;
    pub const MAX_RETRIES: u32 = 3;
    pub const RETRY_BASE_DELAY_MS: u64 = 500;
    pub const RETRY_MAX_DELAY_MS: u64 = 8_000;
    /// Smallest history that can still hold one full exchange.
    pub const MIN_HISTORY_MESSAGES: usize = 2;
    pub const MAX_HISTORY_BOUND: usize = 10_000;
}

// ─── Config Paths ─────────────────────────────────────────────────────────────

pub mod paths {
    pub const CONFIG_DIR: &str = "courtside";
    pub const CONFIG_FILE: &str = "config.toml";
    pub const POINTS_CSV_PREFIX: &str = "points_leaders_";
    pub const DATE_FORMAT: &str = "%Y-%m-%d";
}
