// Library interface for courtside-cli, shared by the binary and the integration tests.

pub mod app;
pub mod commands;
pub mod render;

pub use app::App;
pub use commands::{handle_command, CommandResult};
