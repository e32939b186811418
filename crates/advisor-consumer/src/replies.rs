// SPDX-FileCopyrightText: 2026 Advisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The reply catalog: every user-visible text the dispatcher sends.

use advisor_config::model::RepliesConfig;
use advisor_core::Task;

/// Reply texts, built once from configuration.
///
/// Texts that name commands are rendered with the bot's command prefix.
#[derive(Debug, Clone)]
pub struct Replies {
    texts: RepliesConfig,
}

impl Replies {
    pub fn new(mut texts: RepliesConfig, prefix: char) -> Self {
        let prefix = prefix.to_string();
        texts.help = texts.help.replace("{prefix}", &prefix);
        texts.delete_usage = texts.delete_usage.replace("{prefix}", &prefix);
        Self { texts }
    }

    pub fn help(&self) -> &str {
        &self.texts.help
    }

    /// Greeting followed by the help text.
    pub fn start(&self) -> String {
        format!("{}\n\n{}", self.texts.greeting, self.texts.help)
    }

    pub fn unknown_command(&self) -> &str {
        &self.texts.unknown_command
    }

    pub fn no_saved_tasks(&self) -> &str {
        &self.texts.no_saved_tasks
    }

    pub fn saved(&self) -> &str {
        &self.texts.saved
    }

    pub fn already_exists(&self) -> &str {
        &self.texts.already_exists
    }

    pub fn delete_usage(&self) -> &str {
        &self.texts.delete_usage
    }

    pub fn invalid_number(&self) -> &str {
        &self.texts.invalid_number
    }

    pub fn no_tasks(&self) -> &str {
        &self.texts.no_tasks
    }

    pub fn no_such_task(&self) -> &str {
        &self.texts.no_such_task
    }

    pub fn delete_failed(&self) -> &str {
        &self.texts.delete_failed
    }

    /// Confirmation for a deleted task, with `{task}` filled in.
    pub fn deleted(&self, task_text: &str) -> String {
        self.texts.deleted.replace("{task}", task_text)
    }

    /// Header, blank line, then one numbered line per task.
    pub fn listing(&self, tasks: &[Task]) -> String {
        let mut out = format!("{}\n\n", self.texts.list_header);
        for (i, task) in tasks.iter().enumerate() {
            out.push_str(&format!("{}. {}\n", i + 1, task.url));
        }
        out
    }
}

impl Default for Replies {
    fn default() -> Self {
        Self::new(RepliesConfig::default(), '/')
    }
}
