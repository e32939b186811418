// SPDX-FileCopyrightText: 2026 Advisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Classification of message text into bot commands.

/// One user request, derived purely from the message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Plain text: store it as a task.
    Add(String),
    /// `/rnd`: send and remove a random task.
    Random,
    /// `/help`
    Help,
    /// `/start`: greeting plus help.
    Start,
    /// `/tasks`: list every task.
    ListAll,
    /// `/delete <n>`; the raw argument, if any.
    Delete(Option<String>),
    Unknown,
}

impl Command {
    /// Classifies `text` for a bot using `prefix` to mark commands.
    ///
    /// Text is trimmed first. Non-empty text that does not start with the
    /// prefix is a task. `start`, `help`, `rnd` and `tasks` must make up the
    /// whole text; `delete` may be followed by an argument.
    pub fn parse(text: &str, prefix: char) -> Self {
        let text = text.trim();
        if text.is_empty() {
            return Command::Unknown;
        }
        let Some(rest) = text.strip_prefix(prefix) else {
            return Command::Add(text.to_string());
        };

        match rest {
            "start" => Command::Start,
            "help" => Command::Help,
            "rnd" => Command::Random,
            "tasks" => Command::ListAll,
            "delete" => Command::Delete(None),
            _ => match rest.strip_prefix("delete") {
                Some(arg) if arg.starts_with(char::is_whitespace) => {
                    Command::Delete(arg.split_whitespace().next().map(str::to_string))
                }
                _ => Command::Unknown,
            },
        }
    }

    /// Short name for logs and metrics labels.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Add(_) => "add",
            Command::Random => "rnd",
            Command::Help => "help",
            Command::Start => "start",
            Command::ListAll => "tasks",
            Command::Delete(_) => "delete",
            Command::Unknown => "unknown",
        }
    }
}
