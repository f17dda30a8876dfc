use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the setup steps.
///
/// A `SetupError` returned from a step ends the flow. Steps that can survive
/// a failure (clipboard, permission hardening, uploads) catch it, report it
/// and move on.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("{tool} is not installed.\n{hint}")]
    MissingTool { tool: &'static str, hint: String },

    #[error("OpenSSH client could not be installed: {reason}\n{instructions}")]
    OpenSshUnavailable { reason: String, instructions: &'static str },

    #[error("failed to create SSH directory {}: {error}", path.display())]
    CreateDir {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    #[error("failed to read public key {}: {error}", path.display())]
    ReadPublicKey {
        path: PathBuf,
        error: std::io::Error,
    },

    #[error("failed to run `{program}`: {error}")]
    Spawn {
        program: String,
        error: std::io::Error,
    },

    #[error("`{command}` exited with {status}: {stderr}")]
    ToolFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("prompt failed: {0}")]
    Prompt(String),

    #[error("cannot determine home directory")]
    HomeDir,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SetupResult<T> = Result<T, SetupError>;
