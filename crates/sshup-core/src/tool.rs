//! External tool invocation.
//!
//! Every step talks to the outside world through [`ToolRunner`], so the
//! orchestration can be exercised against a scripted fake. The real
//! implementation spawns processes with `tokio::process::Command`.

use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::error::{SetupError, SetupResult};

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit code, `None` when the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    pub fn stdout_trimmed(&self) -> &str {
        self.stdout.trim()
    }

    /// Turn a non-zero exit into [`SetupError::ToolFailed`] labelled with
    /// `command`.
    pub fn check(self, command: &str) -> SetupResult<Self> {
        if self.success() {
            return Ok(self);
        }
        let status = match self.code {
            Some(code) => format!("exit code {code}"),
            None => "a signal".to_string(),
        };
        let stderr = match self.stderr.trim() {
            "" => "no error output".to_string(),
            s => s.to_string(),
        };
        Err(SetupError::ToolFailed {
            command: command.to_string(),
            status,
            stderr,
        })
    }
}

/// Runs external programs.
///
/// `run` and `run_with_input` only fail when the process cannot be started;
/// a non-zero exit is reported through [`ToolOutput`].
#[allow(async_fn_in_trait)]
pub trait ToolRunner {
    /// Whether `program` resolves on the search path.
    fn exists(&self, program: &str) -> bool;

    /// Run `program` with `args` and capture its output.
    async fn run(&self, program: &str, args: &[&str]) -> SetupResult<ToolOutput>;

    /// Run `program` with `input` written to its stdin.
    async fn run_with_input(
        &self,
        program: &str,
        args: &[&str],
        input: &[u8],
    ) -> SetupResult<ToolOutput>;
}

/// [`ToolRunner`] backed by real processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
    fn exists(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }

    async fn run(&self, program: &str, args: &[&str]) -> SetupResult<ToolOutput> {
        debug!(program, ?args, "running");
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| spawn_error(program, e))?;
        Ok(capture(output))
    }

    async fn run_with_input(
        &self,
        program: &str,
        args: &[&str],
        input: &[u8],
    ) -> SetupResult<ToolOutput> {
        debug!(program, ?args, bytes = input.len(), "running with stdin");
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| spawn_error(program, e))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(input)
                .await
                .map_err(|e| spawn_error(program, e))?;
            // Dropping stdin closes the pipe so the child sees EOF.
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| spawn_error(program, e))?;
        Ok(capture(output))
    }
}

fn spawn_error(program: &str, error: std::io::Error) -> SetupError {
    SetupError::Spawn {
        program: program.to_string(),
        error,
    }
}

fn capture(output: std::process::Output) -> ToolOutput {
    ToolOutput {
        code: output.status.code(),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_passes_success_through() {
        let out = ToolOutput {
            code: Some(0),
            stdout: "  hello\n".into(),
            stderr: String::new(),
        };
        let out = out.check("echo hello").unwrap();
        assert_eq!(out.stdout_trimmed(), "hello");
    }

    #[test]
    fn check_wraps_failure() {
        let out = ToolOutput {
            code: Some(128),
            stdout: String::new(),
            stderr: "fatal: not a git repository\n".into(),
        };
        let err = out.check("git remote set-url origin x").unwrap_err();
        assert_eq!(
            err.to_string(),
            "`git remote set-url origin x` exited with exit code 128: fatal: not a git repository"
        );
    }

    #[test]
    fn check_reports_signal_and_empty_stderr() {
        let out = ToolOutput {
            code: None,
            ..Default::default()
        };
        let err = out.check("ssh-keygen").unwrap_err();
        assert!(err.to_string().contains("a signal"));
        assert!(err.to_string().contains("no error output"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn system_runner_captures_stdin_round_trip() {
        let runner = SystemRunner;
        assert!(runner.exists("cat"));
        let out = runner
            .run_with_input("cat", &[], b"ssh-ed25519 AAAA test\n")
            .await
            .unwrap();
        assert!(out.success());
        assert_eq!(out.stdout, "ssh-ed25519 AAAA test\n");
    }

    #[tokio::test]
    async fn system_runner_reports_missing_program() {
        let runner = SystemRunner;
        assert!(!runner.exists("sshup-definitely-not-installed"));
        let err = runner
            .run("sshup-definitely-not-installed", &[])
            .await
            .unwrap_err();
        assert!(matches!(err, SetupError::Spawn { .. }));
    }
}
