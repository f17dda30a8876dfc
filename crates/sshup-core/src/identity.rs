//! Global Git identity (`user.name` / `user.email`).
//!
//! Only missing values are asked for and written; a value that is already
//! configured is never overwritten.

use tracing::{debug, info, warn};

use crate::error::SetupResult;
use crate::probe::GIT;
use crate::prompt::Prompter;
use crate::report::Reporter;
use crate::tool::ToolRunner;

pub const USER_NAME: &str = "user.name";
pub const USER_EMAIL: &str = "user.email";

/// Identity after the step ran.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityOutcome {
    pub name: Option<String>,
    pub email: Option<String>,
    /// Keys written during this run.
    pub written: Vec<&'static str>,
}

/// Read a key from the global Git config. Unset or empty values are `None`.
pub async fn read_config<R: ToolRunner>(runner: &R, key: &str) -> SetupResult<Option<String>> {
    let out = runner.run(GIT, &["config", "--global", "--get", key]).await?;
    if !out.success() {
        debug!(key, code = ?out.code, "git config key not set");
        return Ok(None);
    }
    let value = out.stdout_trimmed();
    Ok((!value.is_empty()).then(|| value.to_string()))
}

/// Set a key in the global Git config.
pub async fn write_config<R: ToolRunner>(runner: &R, key: &str, value: &str) -> SetupResult<()> {
    runner
        .run(GIT, &["config", "--global", key, value])
        .await?
        .check(&format!("git config --global {key}"))?;
    Ok(())
}

/// Login name of the current account, offered as the default Git name.
pub fn login_name() -> Option<String> {
    ["USER", "USERNAME"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

/// Prompt for whichever of `user.name` / `user.email` is missing and store
/// the answers. `suggested_name` pre-fills the name prompt.
pub async fn configure<R, P, W>(
    runner: &R,
    prompter: &mut P,
    reporter: &mut W,
    suggested_name: Option<&str>,
) -> SetupResult<IdentityOutcome>
where
    R: ToolRunner,
    P: Prompter,
    W: Reporter,
{
    let mut outcome = IdentityOutcome {
        name: read_config(runner, USER_NAME).await?,
        email: read_config(runner, USER_EMAIL).await?,
        written: Vec::new(),
    };

    if outcome.name.is_some() && outcome.email.is_some() {
        debug!("git identity already configured");
        return Ok(outcome);
    }

    reporter.info("Git does not know who you are yet.");

    if outcome.name.is_none() {
        outcome.name = ask(
            runner,
            prompter,
            reporter,
            USER_NAME,
            "Your name (for Git commits)",
            suggested_name,
        )
        .await?;
        if outcome.name.is_some() {
            outcome.written.push(USER_NAME);
        }
    }

    if outcome.email.is_none() {
        outcome.email = ask(
            runner,
            prompter,
            reporter,
            USER_EMAIL,
            "Your email (for Git commits)",
            None,
        )
        .await?;
        if outcome.email.is_some() {
            outcome.written.push(USER_EMAIL);
        }
    }

    Ok(outcome)
}

/// Ask for one value and write it. Returns the value if it was stored.
async fn ask<R, P, W>(
    runner: &R,
    prompter: &mut P,
    reporter: &mut W,
    key: &'static str,
    question: &str,
    default: Option<&str>,
) -> SetupResult<Option<String>>
where
    R: ToolRunner,
    P: Prompter,
    W: Reporter,
{
    let answer = prompter.input(question, default)?;
    let answer = answer.trim();
    if answer.is_empty() {
        reporter.warn(&format!("No value given, leaving {key} unset."));
        return Ok(None);
    }

    match write_config(runner, key, answer).await {
        Ok(()) => {
            info!(key, "git config updated");
            reporter.success(&format!("Set {key} to {answer}"));
            Ok(Some(answer.to_string()))
        }
        Err(e) => {
            warn!(key, error = %e, "git config write failed");
            reporter.warn(&format!("Could not set {key}: {e}"));
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Level;
    use crate::testing::{Answer, FakeRunner, RecordingReporter, ScriptedPrompter};

    const GET_NAME: &str = "git config --global --get user.name";
    const GET_EMAIL: &str = "git config --global --get user.email";

    #[tokio::test]
    async fn read_treats_exit_one_as_unset() {
        let mut runner = FakeRunner::with_tools(&["git"]);
        runner
            .respond(GET_NAME, 0, "Alice Example\n")
            .respond(GET_EMAIL, 1, "");
        assert_eq!(
            read_config(&runner, USER_NAME).await.unwrap().as_deref(),
            Some("Alice Example")
        );
        assert_eq!(read_config(&runner, USER_EMAIL).await.unwrap(), None);
    }

    #[tokio::test]
    async fn complete_identity_is_a_silent_no_op() {
        let mut runner = FakeRunner::with_tools(&["git"]);
        runner
            .respond(GET_NAME, 0, "Alice\n")
            .respond(GET_EMAIL, 0, "alice@example.com\n");
        let mut prompter = ScriptedPrompter::default();
        let mut reporter = RecordingReporter::default();

        let outcome = configure(&runner, &mut prompter, &mut reporter, None).await.unwrap();
        assert!(outcome.written.is_empty());
        assert!(prompter.questions.is_empty());
        assert!(reporter.messages.is_empty());
        assert_eq!(runner.calls().len(), 2);
    }

    #[tokio::test]
    async fn only_missing_email_is_prompted_and_written() {
        let mut runner = FakeRunner::with_tools(&["git"]);
        runner
            .respond(GET_NAME, 0, "Alice\n")
            .respond(GET_EMAIL, 1, "");
        let mut prompter = ScriptedPrompter::new(vec![Answer::Input("alice@example.com".into())]);
        let mut reporter = RecordingReporter::default();

        let outcome = configure(&runner, &mut prompter, &mut reporter, None).await.unwrap();

        assert_eq!(prompter.questions, ["Your email (for Git commits)"]);
        assert_eq!(outcome.written, [USER_EMAIL]);
        assert_eq!(outcome.name.as_deref(), Some("Alice"));
        assert!(runner.ran("git config --global user.email alice@example.com"));
        assert!(!runner
            .lines()
            .iter()
            .any(|l| l.starts_with("git config --global user.name")));
    }

    #[tokio::test]
    async fn both_missing_prompts_twice() {
        let mut runner = FakeRunner::with_tools(&["git"]);
        runner.respond(GET_NAME, 1, "").respond(GET_EMAIL, 1, "");
        let mut prompter = ScriptedPrompter::new(vec![
            Answer::Input("  Alice Example ".into()),
            Answer::Input("alice@example.com".into()),
        ]);
        let mut reporter = RecordingReporter::default();

        let outcome = configure(&runner, &mut prompter, &mut reporter, None).await.unwrap();
        assert_eq!(outcome.written, [USER_NAME, USER_EMAIL]);
        assert!(runner.ran("git config --global user.name Alice Example"));
        let written_name = runner
            .calls()
            .into_iter()
            .find(|c| c.args.get(2).map(String::as_str) == Some(USER_NAME))
            .and_then(|c| c.args.get(3).cloned());
        assert_eq!(written_name.as_deref(), Some("Alice Example"));
        assert!(prompter.exhausted());
    }

    #[tokio::test]
    async fn suggested_name_prefills_only_the_name_prompt() {
        let mut runner = FakeRunner::with_tools(&["git"]);
        runner.respond(GET_NAME, 1, "").respond(GET_EMAIL, 1, "");
        let mut prompter = ScriptedPrompter::new(vec![
            Answer::Input("alice".into()),
            Answer::Input("alice@example.com".into()),
        ]);
        let mut reporter = RecordingReporter::default();

        configure(&runner, &mut prompter, &mut reporter, Some("alice"))
            .await
            .unwrap();
        assert_eq!(prompter.input_defaults, [Some("alice".to_string()), None]);
        assert!(runner.ran("git config --global user.name alice"));
    }

    #[tokio::test]
    async fn empty_answer_writes_nothing() {
        let mut runner = FakeRunner::with_tools(&["git"]);
        runner
            .respond(GET_NAME, 1, "")
            .respond(GET_EMAIL, 0, "alice@example.com");
        let mut prompter = ScriptedPrompter::new(vec![Answer::Input("   ".into())]);
        let mut reporter = RecordingReporter::default();

        let outcome = configure(&runner, &mut prompter, &mut reporter, None).await.unwrap();
        assert!(outcome.written.is_empty());
        assert_eq!(runner.calls().len(), 2);
        assert!(reporter.has(Level::Warn, "leaving user.name unset"));
    }

    #[tokio::test]
    async fn failed_write_is_reported_not_fatal() {
        let mut runner = FakeRunner::with_tools(&["git"]);
        runner
            .respond(GET_NAME, 0, "Alice")
            .respond(GET_EMAIL, 1, "")
            .respond("git config --global user.email a@b.c", 255, "");
        let mut prompter = ScriptedPrompter::new(vec![Answer::Input("a@b.c".into())]);
        let mut reporter = RecordingReporter::default();

        let outcome = configure(&runner, &mut prompter, &mut reporter, None).await.unwrap();
        assert!(outcome.written.is_empty());
        assert!(reporter.has(Level::Warn, "Could not set user.email"));
    }
}
