use chrono::{DateTime, Local};

use crate::constants::defaults;

/// The system message sent ahead of every conversation request.
///
/// Persona text is fixed for a session; the timestamp is rendered per request.
/// Optional context (for example a summary of the latest stats report) is
/// appended after the timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemDirective {
    persona: String,
    context: Option<String>,
}

impl SystemDirective {
    pub fn new(persona: impl Into<String>) -> Self {
        Self {
            persona: persona.into(),
            context: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn set_context(&mut self, context: Option<String>) {
        self.context = context;
    }

    pub fn persona(&self) -> &str {
        &self.persona
    }

    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    pub fn render(&self, now: DateTime<Local>) -> String {
        let mut text = format!(
            "{}\n\nThe current date and time is {}.",
            self.persona,
            now.format("%A, %B %-d, %Y %H:%M")
        );
        if let Some(context) = &self.context {
            text.push_str("\n\n");
            text.push_str(context);
        }
        text
    }
}

impl Default for SystemDirective {
    fn default() -> Self {
        Self::new(defaults::PERSONA)
    }
}
