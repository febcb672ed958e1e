// Library interface for smartagent-cli, used by the integration tests.
// main.rs declares the same files, so they are pulled in by path.

#[path = "commands.rs"]
pub mod commands;

#[path = "notifier.rs"]
pub mod notifier;

#[path = "theme.rs"]
pub mod theme;

pub use commands::{handle_command, CommandResult};
pub use notifier::{ConsoleNotifier, TerminalNotifier, UiEvent};
pub use theme::Theme;
