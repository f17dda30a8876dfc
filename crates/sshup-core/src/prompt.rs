//! Interactive questions.

use crate::error::SetupResult;

/// Asks the user for decisions and values.
pub trait Prompter {
    /// Yes/no question; `default` is used when the user just presses enter.
    fn confirm(&mut self, question: &str, default: bool) -> SetupResult<bool>;

    /// Free-text question with an optional pre-filled answer.
    fn input(&mut self, question: &str, default: Option<&str>) -> SetupResult<String>;
}
