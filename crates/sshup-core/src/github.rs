//! Registering the public key with GitHub through an authenticated `gh`.

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::context::SetupContext;
use crate::error::SetupResult;
use crate::probe::GH;
use crate::prompt::Prompter;
use crate::report::Reporter;
use crate::tool::ToolRunner;

pub const SSH_KEYS_SETTINGS_URL: &str = "https://github.com/settings/ssh/new";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// `gh` missing, not logged in, or uploads disabled.
    Skipped,
    Declined,
    Uploaded { title: String },
    Failed(String),
}

/// Title under which the key is registered, e.g. `sshup 2026-10-19`.
pub fn upload_title(prefix: &str, date: NaiveDate) -> String {
    format!("{prefix} {}", date.format("%Y-%m-%d"))
}

/// Login of the authenticated `gh` user, if it can be resolved.
pub async fn resolve_username<R: ToolRunner>(runner: &R) -> Option<String> {
    match runner.run(GH, &["api", "user", "-q", ".login"]).await {
        Ok(out) if out.success() && !out.stdout_trimmed().is_empty() => {
            Some(out.stdout_trimmed().to_string())
        }
        Ok(out) => {
            debug!(code = ?out.code, "gh api user returned nothing usable");
            None
        }
        Err(e) => {
            debug!(error = %e, "gh api user could not run");
            None
        }
    }
}

/// Offer to upload the public key. `authenticated` is the result of
/// [`crate::probe::detect_github_auth`].
///
/// Upload failures are reported and swallowed.
pub async fn offer_upload<R, P, W>(
    ctx: &SetupContext,
    runner: &R,
    prompter: &mut P,
    reporter: &mut W,
    authenticated: bool,
    today: NaiveDate,
) -> SetupResult<UploadOutcome>
where
    R: ToolRunner,
    P: Prompter,
    W: Reporter,
{
    if !ctx.options.offer_github_upload {
        debug!("github upload disabled");
        return Ok(UploadOutcome::Skipped);
    }

    if !authenticated {
        reporter.note(&format!(
            "Install the GitHub CLI and run `gh auth login` to upload keys automatically, \
             or paste the key at {SSH_KEYS_SETTINGS_URL}"
        ));
        return Ok(UploadOutcome::Skipped);
    }

    let question = match resolve_username(runner).await {
        Some(login) => format!("Upload this public key to GitHub account @{login}?"),
        None => "Upload this public key to your GitHub account?".to_string(),
    };
    if !prompter.confirm(&question, true)? {
        return Ok(UploadOutcome::Declined);
    }

    let title = upload_title(&ctx.options.key_title_prefix, today);
    let path = ctx.public_key.to_string_lossy().into_owned();
    let result = runner
        .run(GH, &["ssh-key", "add", path.as_str(), "-t", title.as_str()])
        .await
        .and_then(|out| out.check("gh ssh-key add"));

    match result {
        Ok(_) => {
            info!(%title, "uploaded public key to GitHub");
            reporter.success(&format!("Public key added to GitHub as \"{title}\"."));
            Ok(UploadOutcome::Uploaded { title })
        }
        Err(e) => {
            warn!(error = %e, "github upload failed");
            reporter.warn(&format!("Could not upload the key to GitHub: {e}"));
            Ok(UploadOutcome::Failed(e.to_string()))
        }
    }
}
