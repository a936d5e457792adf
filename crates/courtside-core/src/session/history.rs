use crate::constants::{defaults, limits};
use crate::llm::{Message, Role};
use std::collections::VecDeque;

/// Bounded, insertion-ordered message history.
///
/// Eviction removes whole exchanges from the oldest end: when dropping a user
/// message leaves its assistant reply at the front, the reply goes too.
#[derive(Debug, Clone)]
pub struct ConversationHistory {
    messages: VecDeque<Message>,
    max_messages: usize,
}

/// Opaque copy of a history, used to undo a failed exchange.
#[derive(Debug, Clone)]
pub struct HistorySnapshot(VecDeque<Message>);

impl ConversationHistory {
    pub fn new() -> Self {
        Self::with_max_messages(defaults::MAX_HISTORY_MESSAGES)
    }

    /// Bounds below one full exchange are raised to it.
    pub fn with_max_messages(max: usize) -> Self {
        let max_messages = max.max(limits::MIN_HISTORY_MESSAGES);
        Self {
            messages: VecDeque::new(),
            max_messages,
        }
    }

    pub fn max_messages(&self) -> usize {
        self.max_messages
    }

    pub fn add_user_message(&mut self, content: impl Into<String>) {
        self.add_message(Message::user(content));
    }

    pub fn add_assistant_message(&mut self, content: impl Into<String>) {
        self.add_message(Message::assistant(content));
    }

    pub fn add_message(&mut self, message: Message) {
        self.messages.push_back(message);
        self.trim_if_needed();
    }

    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    /// Clone the messages in order, oldest first.
    pub fn to_vec(&self) -> Vec<Message> {
        self.messages.iter().cloned().collect()
    }

    pub fn snapshot(&self) -> HistorySnapshot {
        HistorySnapshot(self.messages.clone())
    }

    pub fn restore(&mut self, snapshot: HistorySnapshot) {
        self.messages = snapshot.0;
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.back()
    }

    fn trim_if_needed(&mut self) {
        // The newest message is never evicted.
        while self.messages.len() > self.max_messages && self.messages.len() > 1 {
            self.messages.pop_front();
            while self.messages.len() > 1
                && self.messages.front().map(|m| m.role) == Some(Role::Assistant)
            {
                self.messages.pop_front();
            }
        }
    }

    pub fn estimate_tokens(&self) -> usize {
        self.messages.iter().map(|m| m.content.len() / 4).sum()
    }
}

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contents(history: &ConversationHistory) -> Vec<String> {
        history.messages().map(|m| m.content.clone()).collect()
    }

    #[test]
    fn evicts_whole_exchange_on_odd_bound() {
        let mut history = ConversationHistory::with_max_messages(3);
        history.add_user_message("a");
        history.add_assistant_message("ra");
        history.add_user_message("b");
        assert_eq!(contents(&history), ["a", "ra", "b"]);

        history.add_assistant_message("rb");
        assert_eq!(contents(&history), ["b", "rb"]);
    }

    #[test]
    fn bound_is_raised_to_one_exchange() {
        let mut history = ConversationHistory::with_max_messages(0);
        assert_eq!(history.max_messages(), 2);
        history.add_user_message("a");
        history.add_assistant_message("ra");
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn huge_bound_allocates_lazily() {
        let mut history = ConversationHistory::with_max_messages(usize::MAX);
        assert_eq!(history.max_messages(), usize::MAX);
        history.add_user_message("a");
        history.add_assistant_message("ra");
        assert_eq!(contents(&history), ["a", "ra"]);
    }

    #[test]
    fn consecutive_user_messages_evict_one_at_a_time() {
        let mut history = ConversationHistory::with_max_messages(2);
        history.add_user_message("a");
        history.add_user_message("b");
        history.add_user_message("c");
        assert_eq!(contents(&history), ["b", "c"]);
    }

    #[test]
    fn snapshot_restores_evicted_messages() {
        let mut history = ConversationHistory::with_max_messages(2);
        history.add_user_message("a");
        history.add_assistant_message("ra");
        let snapshot = history.snapshot();

        history.add_user_message("b");
        assert_eq!(contents(&history), ["b"]);

        history.restore(snapshot);
        assert_eq!(contents(&history), ["a", "ra"]);
    }
}
