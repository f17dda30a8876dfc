//! Terminal implementations of the prompt and report collaborators.
//!
//! Questions go through dialoguer; messages are styled with crossterm when
//! stdout is a terminal and printed plain otherwise.

use std::io::IsTerminal;

use crossterm::style::Stylize;
use dialoguer::{Confirm, Input};
use sshup_core::{Level, Prompter, Reporter, SetupError, SetupResult};

/// Prompts on the controlling terminal.
#[derive(Debug, Default)]
pub struct DialoguerPrompter;

impl Prompter for DialoguerPrompter {
    fn confirm(&mut self, question: &str, default: bool) -> SetupResult<bool> {
        Confirm::new()
            .with_prompt(question)
            .default(default)
            .interact()
            .map_err(|e| SetupError::Prompt(e.to_string()))
    }

    fn input(&mut self, question: &str, default: Option<&str>) -> SetupResult<String> {
        let mut input = Input::<String>::new().with_prompt(question).allow_empty(true);
        if let Some(value) = default {
            input = input.default(value.to_string());
        }
        input
            .interact_text()
            .map_err(|e| SetupError::Prompt(e.to_string()))
    }
}

/// Prints messages to stdout, warnings and errors to stderr.
#[derive(Debug)]
pub struct ConsoleReporter {
    color: bool,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self {
            color: std::io::stdout().is_terminal(),
        }
    }

    fn prefix(&self, level: Level) -> String {
        let (mark, plain) = match level {
            Level::Info => return String::new(),
            Level::Success => ("✓".green().bold(), "✓"),
            Level::Note => ("→".cyan(), "→"),
            Level::Warn => ("warning:".yellow().bold(), "warning:"),
            Level::Error => ("error:".red().bold(), "error:"),
        };
        if self.color {
            format!("{mark} ")
        } else {
            format!("{plain} ")
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for ConsoleReporter {
    fn report(&mut self, level: Level, message: &str) {
        let prefix = self.prefix(level);
        match level {
            Level::Warn | Level::Error => eprintln!("{prefix}{message}"),
            Level::Info | Level::Success | Level::Note => println!("{prefix}{message}"),
        }
    }

    fn section(&mut self, title: &str) {
        if self.color {
            println!("\n{}", title.bold().underlined());
        } else {
            println!("\n== {title} ==");
        }
    }

    fn block(&mut self, text: &str) {
        // Printed unstyled so it can be copied as-is.
        println!("\n{text}\n");
    }
}
