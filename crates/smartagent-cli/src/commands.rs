/// Result of processing a slash command.
#[derive(Debug, Clone)]
pub enum CommandResult {
    /// Display a message to the user.
    Message(String),
    /// Quit the application.
    Quit,
    /// Show status (backend, message count, notification permission).
    ShowStatus,
    /// Check for due reminders now.
    PollNow,
    /// Not a command - send as a chat message.
    NotACommand,
}

pub fn handle_command(input: &str) -> CommandResult {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return CommandResult::NotACommand;
    }
    let cmd = trimmed.split_whitespace().next().unwrap_or(trimmed);

    match cmd {
        "/help" | "/h" => show_help(),
        "/exit" | "/quit" | "/q" => CommandResult::Quit,
        "/status" => CommandResult::ShowStatus,
        "/poll" | "/reminders" => CommandResult::PollNow,
        "/version" => CommandResult::Message(format!(
            "Smart Agent CLI v{}",
            env!("CARGO_PKG_VERSION")
        )),
        _ => CommandResult::Message(format!("Unknown command: {cmd}. Type /help for commands.")),
    }
}

fn show_help() -> CommandResult {
    let help_text = "\
╭─ Smart Agent Commands ─────────────────────────────╮

  Type anything else to send it to the agent, e.g.
    Remind me to study at 6pm

    /poll, /reminders    Check for due reminders now
    /status              Show backend and session status
    /version             Show version information
    /help, /h            Show this help message
    /exit, /quit, /q     Quit

  KEYS
    Enter                Send
    PgUp / PgDn          Scroll the conversation
    Ctrl+C, Esc          Quit

╰────────────────────────────────────────────────────╯";

    CommandResult::Message(help_text.into())
}
