/// Result of parsing one line typed at the interactive prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// Show the stored results for a category.
    View(String),
    /// Re-run the full fetch pipeline.
    Refresh,
    /// Ask a follow-up question through the conversation session.
    Ask(String),
    /// Show recent game results again.
    Games,
    /// Forget the conversation so far.
    Reset,
    /// Display a message to the user.
    Message(String),
    /// Quit the application.
    Quit,
    /// Blank line; prompt again.
    Empty,
}

pub fn handle_command(input: &str) -> CommandResult {
    let input = input.trim();
    if input.is_empty() {
        return CommandResult::Empty;
    }

    let (cmd, arg) = match input.split_once(char::is_whitespace) {
        Some((cmd, arg)) => (cmd, arg.trim()),
        None => (input, ""),
    };

    match cmd.to_lowercase().as_str() {
        "exit" | "quit" | "q" => CommandResult::Quit,
        "refresh" => CommandResult::Refresh,
        "games" => CommandResult::Games,
        "reset" => CommandResult::Reset,
        "help" | "h" | "?" => show_help(),
        "view" => {
            if arg.is_empty() {
                CommandResult::Message("Usage: view <category>\nExample: view points".into())
            } else {
                CommandResult::View(arg.to_lowercase())
            }
        }
        "ask" => {
            if arg.is_empty() {
                CommandResult::Message("Usage: ask <question>".into())
            } else {
                CommandResult::Ask(arg.to_string())
            }
        }
        other => CommandResult::Message(format!(
            "Unknown command: {other}. Type help for commands."
        )),
    }
}

fn show_help() -> CommandResult {
    let help_text = "\
Courtside commands

  view <category>   Show results for a category (games, points, rebounds, ...)
  games             Show recent game results
  refresh           Fetch updated statistics
  ask <question>    Ask a question about the latest statistics
  reset             Forget the conversation so far
  help              Show this help message
  exit              Quit";

    CommandResult::Message(help_text.into())
}
