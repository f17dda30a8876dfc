//! HTTPS to SSH remote URL rewriting.
//!
//! Only `https://<domain>/<owner>/<repo>[.git]` is converted, to
//! `git@<domain>:<owner>/<repo>.git`. Anything else is left alone.

use tracing::{debug, info, warn};

use crate::context::SetupContext;
use crate::error::SetupResult;
use crate::probe::GIT;
use crate::prompt::Prompter;
use crate::report::Reporter;
use crate::tool::ToolRunner;

const HTTPS_SCHEME: &str = "https://";

/// Host, owner and repository name of a hosted repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoCoordinates {
    pub domain: String,
    pub owner: String,
    pub repo: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteOutcome {
    NotARepository,
    NoRemote,
    AlreadySsh,
    Unrecognized(String),
    Declined,
    /// The remote now points at this URL.
    Converted(String),
    /// The user accepted but `git remote set-url` failed.
    Failed(String),
}

/// Parse `https://<domain>/<owner>/<repo>` with an optional `.git` suffix.
///
/// A port in the domain has no scp-style SSH equivalent, so it is rejected.
pub fn parse_https_url(url: &str) -> Option<RepoCoordinates> {
    let rest = url.strip_prefix(HTTPS_SCHEME)?;
    if rest.contains(|c: char| c.is_whitespace() || matches!(c, '?' | '#' | '@' | ':')) {
        return None;
    }

    let mut segments = rest.split('/');
    let domain = segments.next()?;
    let owner = segments.next()?;
    let repo = segments.next()?;
    if segments.next().is_some() {
        return None;
    }

    let repo = repo.strip_suffix(".git").unwrap_or(repo);
    if domain.is_empty() || owner.is_empty() || repo.is_empty() {
        return None;
    }

    Some(RepoCoordinates {
        domain: domain.to_string(),
        owner: owner.to_string(),
        repo: repo.to_string(),
    })
}

pub fn to_ssh_url(coords: &RepoCoordinates) -> String {
    format!("git@{}:{}/{}.git", coords.domain, coords.owner, coords.repo)
}

/// Whether `url` already uses SSH (`git@host:` or `ssh://`).
pub fn is_ssh_url(url: &str) -> bool {
    url.starts_with("git@") || url.starts_with("ssh://")
}

async fn inside_work_tree<R: ToolRunner>(runner: &R) -> bool {
    match runner.run(GIT, &["rev-parse", "--is-inside-work-tree"]).await {
        Ok(out) => out.success() && out.stdout_trimmed() == "true",
        Err(e) => {
            debug!(error = %e, "git rev-parse could not run");
            false
        }
    }
}

async fn remote_url<R: ToolRunner>(runner: &R, remote: &str) -> SetupResult<Option<String>> {
    let key = format!("remote.{remote}.url");
    let out = runner.run(GIT, &["config", "--get", key.as_str()]).await?;
    if !out.success() || out.stdout_trimmed().is_empty() {
        return Ok(None);
    }
    Ok(Some(out.stdout_trimmed().to_string()))
}

/// Offer to switch the configured remote of the current repository from
/// HTTPS to SSH.
pub async fn rewrite_remote<R, P, W>(
    ctx: &SetupContext,
    runner: &R,
    prompter: &mut P,
    reporter: &mut W,
) -> SetupResult<RemoteOutcome>
where
    R: ToolRunner,
    P: Prompter,
    W: Reporter,
{
    if !inside_work_tree(runner).await {
        reporter.note(
            "Not inside a Git repository. Run sshup from a repository to switch its remote to SSH.",
        );
        return Ok(RemoteOutcome::NotARepository);
    }

    let remote = ctx.options.remote.as_str();
    let Some(url) = remote_url(runner, remote).await? else {
        reporter.note(&format!("This repository has no '{remote}' remote."));
        return Ok(RemoteOutcome::NoRemote);
    };
    debug!(remote, %url, "current remote");

    if is_ssh_url(&url) {
        reporter.note(&format!("Remote '{remote}' already uses SSH: {url}"));
        return Ok(RemoteOutcome::AlreadySsh);
    }

    let Some(coords) = parse_https_url(&url) else {
        reporter.note(&format!(
            "Remote '{remote}' has an unrecognized URL ({url}); leaving it unchanged."
        ));
        return Ok(RemoteOutcome::Unrecognized(url));
    };

    let ssh_url = to_ssh_url(&coords);
    let question = format!("Switch remote '{remote}' from {url} to {ssh_url}?");
    if !prompter.confirm(&question, true)? {
        return Ok(RemoteOutcome::Declined);
    }

    let result = runner
        .run(GIT, &["remote", "set-url", remote, ssh_url.as_str()])
        .await
        .and_then(|out| out.check("git remote set-url"));
    match result {
        Ok(_) => {
            info!(remote, url = %ssh_url, "remote rewritten");
            reporter.success(&format!("Remote '{remote}' now uses {ssh_url}"));
            Ok(RemoteOutcome::Converted(ssh_url))
        }
        Err(e) => {
            warn!(remote, error = %e, "remote rewrite failed");
            reporter.warn(&format!("Could not update remote '{remote}': {e}"));
            Ok(RemoteOutcome::Failed(e.to_string()))
        }
    }
}
