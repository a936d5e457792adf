use courtside_core::config::Settings;
use courtside_core::*;
use tempfile::TempDir;

// ========================================================================
// Settings Tests (config/mod.rs)
// ========================================================================

#[test]
fn test_settings_default_values() {
    let settings = Settings::default();

    // Check LLM defaults
    assert_eq!(settings.llm.model, "gpt-4o");
    assert_eq!(settings.llm.api_key_env, "OPENAI_API_KEY");
    assert_eq!(settings.llm.max_tokens, 4096);
    assert!(settings.llm.base_url.is_none());

    // Check session defaults
    assert_eq!(settings.session.max_messages, 20);
    assert_eq!(settings.session.cache_capacity, 128);
    assert_eq!(settings.session.cache_policy, CachePolicy::Replay);
    assert!(settings.session.rollback_on_failure);

    // Check output defaults
    assert_eq!(settings.output.dir, std::path::PathBuf::from("nba_stats"));
    assert!(settings.validate().is_ok());
}

#[test]
fn test_settings_save_and_reload_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("nested").join("config.toml");

    let mut settings = Settings::default();
    settings.llm.model = "gpt-4o-mini".to_string();
    settings.llm.base_url = Some("http://localhost:8080".to_string());
    settings.session.cache_policy = CachePolicy::ShortCircuit;
    settings.session.max_messages = 6;

    settings.save_to(&config_path).unwrap();
    let loaded = Settings::load_from(&config_path).unwrap();

    assert_eq!(loaded.llm.model, "gpt-4o-mini");
    assert_eq!(loaded.llm.base_url.as_deref(), Some("http://localhost:8080"));
    assert_eq!(loaded.session.cache_policy, CachePolicy::ShortCircuit);
    assert_eq!(loaded.session.max_messages, 6);
}

#[test]
fn test_settings_partial_file_fills_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(
        &config_path,
        "[session]\ncache_policy = \"disabled\"\n\n[output]\ndir = \"out\"\n",
    )
    .unwrap();

    let loaded = Settings::load_from(&config_path).unwrap();
    assert_eq!(loaded.session.cache_policy, CachePolicy::Disabled);
    assert_eq!(loaded.session.max_messages, 20);
    assert_eq!(loaded.output.dir, std::path::PathBuf::from("out"));
    assert_eq!(loaded.llm.model, "gpt-4o");
}

#[test]
fn test_settings_invalid_toml_is_config_error() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    std::fs::write(&config_path, "[session\nmax_messages = ").unwrap();

    let err = Settings::load_from(&config_path).unwrap_err();
    assert!(matches!(err, CourtsideError::Config(_)));
}

#[test]
fn test_settings_validate_rejects_tiny_history() {
    let mut settings = Settings::default();
    settings.session.max_messages = 1;
    assert!(matches!(settings.validate(), Err(CourtsideError::Config(_))));
}

#[test]
fn test_settings_validate_rejects_oversized_history() {
    let mut settings = Settings::default();
    settings.session.max_messages = 1 << 40;
    assert!(matches!(settings.validate(), Err(CourtsideError::Config(_))));

    settings.session.max_messages = courtside_core::constants::limits::MAX_HISTORY_BOUND;
    assert!(settings.validate().is_ok());
}

#[test]
fn test_settings_api_key_reads_from_env() {
    std::env::set_var("TEST_API_KEY_COURTSIDE", "test-key-12345");

    let mut settings = Settings::default();
    settings.llm.api_key_env = "TEST_API_KEY_COURTSIDE".to_string();
    assert_eq!(settings.api_key(), Some("test-key-12345".to_string()));

    std::env::remove_var("TEST_API_KEY_COURTSIDE");
}

#[test]
fn test_settings_missing_api_key_fails_client_build() {
    let mut settings = Settings::default();
    settings.llm.api_key_env = "NONEXISTENT_KEY_COURTSIDE_TEST".to_string();

    assert!(settings.api_key().is_none());
    let err = settings.build_llm_client().err().unwrap();
    assert!(err.to_string().contains("NONEXISTENT_KEY_COURTSIDE_TEST"));
}

#[test]
fn test_settings_session_config_carries_generation() {
    let mut settings = Settings::default();
    settings.llm.temperature = 0.2;
    settings.session.persona = "Scout persona".to_string();

    let config = settings.session_config();
    assert_eq!(config.generation.temperature, 0.2);
    assert_eq!(config.generation.model, "gpt-4o");
    assert_eq!(config.directive.persona(), "Scout persona");
    assert_eq!(config.cache_policy, CachePolicy::Replay);
}

// ========================================================================
// ConversationHistory Tests (session/history.rs)
// ========================================================================

#[test]
fn test_conversation_history_add_messages() {
    let mut history = ConversationHistory::new();

    history.add_user_message("Hello");
    history.add_assistant_message("Hi there!");
    history.add_user_message("How are you?");

    let messages = history.to_vec();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[0], Message::user("Hello"));
    assert_eq!(messages[1], Message::assistant("Hi there!"));
    assert_eq!(messages[2].role, Role::User);
}

#[test]
fn test_conversation_history_trimming_keeps_newest_in_order() {
    let mut history = ConversationHistory::with_max_messages(4);

    for i in 1..=4 {
        history.add_user_message(format!("Question {i}"));
        history.add_assistant_message(format!("Answer {i}"));
    }

    let contents: Vec<_> = history.messages().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, ["Question 3", "Answer 3", "Question 4", "Answer 4"]);
}

#[test]
fn test_conversation_history_never_exceeds_bound() {
    let mut history = ConversationHistory::with_max_messages(5);
    for i in 0..50 {
        if i % 3 == 0 {
            history.add_assistant_message(format!("r{i}"));
        } else {
            history.add_user_message(format!("u{i}"));
        }
        assert!(history.len() <= 5);
        assert!(!history.is_empty());
    }
}

#[test]
fn test_conversation_history_clear_works() {
    let mut history = ConversationHistory::new();

    history.add_user_message("Message 1");
    history.add_user_message("Message 2");
    assert_eq!(history.len(), 2);

    history.clear();
    assert_eq!(history.len(), 0);
    assert!(history.is_empty());
}

#[test]
fn test_conversation_history_estimate_tokens_basic() {
    let mut history = ConversationHistory::new();

    history.add_user_message("test"); // 4 chars
    assert_eq!(history.estimate_tokens(), 1);

    history.add_user_message("test message with more content"); // 30 chars
    assert_eq!(history.estimate_tokens(), 1 + 7);
}

#[test]
fn test_conversation_history_last_message() {
    let mut history = ConversationHistory::new();

    assert!(history.last_message().is_none());

    history.add_user_message("First");
    assert_eq!(history.last_message().unwrap().content, "First");

    history.add_assistant_message("Second");
    assert_eq!(history.last_message().unwrap().content, "Second");
}

// ========================================================================
// Message Tests (llm/traits.rs)
// ========================================================================

#[test]
fn test_message_serializes_lowercase_role() {
    let value = serde_json::to_value(Message::assistant("ok")).unwrap();
    assert_eq!(value, serde_json::json!({"role": "assistant", "content": "ok"}));

    let back: Message = serde_json::from_value(serde_json::json!({
        "role": "system",
        "content": "persona"
    }))
    .unwrap();
    assert_eq!(back, Message::system("persona"));
}
