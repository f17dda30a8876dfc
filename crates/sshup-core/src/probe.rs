//! Environment probing: which tools are available and whether `gh` is
//! logged in. Absence is a normal answer here, never an error.

use tracing::debug;

use crate::tool::ToolRunner;

pub const GIT: &str = "git";
pub const SSH_KEYGEN: &str = "ssh-keygen";
pub const GH: &str = "gh";

/// Tool availability captured at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Environment {
    pub git: bool,
    pub ssh_keygen: bool,
    pub gh: bool,
}

impl Environment {
    pub fn probe<R: ToolRunner>(runner: &R) -> Self {
        let env = Self {
            git: detect_tool(runner, GIT),
            ssh_keygen: detect_tool(runner, SSH_KEYGEN),
            gh: detect_tool(runner, GH),
        };
        debug!(?env, "probed environment");
        env
    }
}

/// Whether `name` resolves on the search path.
pub fn detect_tool<R: ToolRunner>(runner: &R, name: &str) -> bool {
    runner.exists(name)
}

/// Whether the GitHub CLI is installed and logged in.
///
/// A failing or unrunnable `gh auth status` counts as "not available".
pub async fn detect_github_auth<R: ToolRunner>(runner: &R) -> bool {
    if !detect_tool(runner, GH) {
        return false;
    }
    match runner.run(GH, &["auth", "status"]).await {
        Ok(out) => out.success(),
        Err(e) => {
            debug!(error = %e, "gh auth status could not run");
            false
        }
    }
}
