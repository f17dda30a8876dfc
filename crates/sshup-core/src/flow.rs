//! The setup sequence.
//!
//! Steps run strictly one after another. Only the errors returned by the
//! individual steps stop the flow; everything else is reported and skipped.

use chrono::NaiveDate;
use tracing::info;

use crate::context::SetupContext;
use crate::error::SetupResult;
use crate::github::{self, UploadOutcome};
use crate::identity::{self, IdentityOutcome};
use crate::keystore::{DirectoryStatus, KeyPair, KeyStore};
use crate::prereq::{ensure_openssh, require_git, OpenSshState};
use crate::probe::{detect_github_auth, Environment};
use crate::prompt::Prompter;
use crate::remote::{self, RemoteOutcome};
use crate::report::Reporter;
use crate::tool::ToolRunner;

/// What each step did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub environment: Environment,
    pub openssh: OpenSshState,
    pub directory: DirectoryStatus,
    pub key: KeyPair,
    pub copied_to_clipboard: bool,
    /// `None` when identity configuration is turned off.
    pub identity: Option<IdentityOutcome>,
    pub upload: UploadOutcome,
    pub remote: RemoteOutcome,
}

/// One run of the setup flow with its collaborators.
pub struct Setup<'a, R, P, W> {
    ctx: &'a SetupContext,
    runner: &'a R,
    prompter: &'a mut P,
    reporter: &'a mut W,
    /// Date used in the GitHub key title.
    today: NaiveDate,
}

impl<'a, R, P, W> Setup<'a, R, P, W>
where
    R: ToolRunner,
    P: Prompter,
    W: Reporter,
{
    pub fn new(
        ctx: &'a SetupContext,
        runner: &'a R,
        prompter: &'a mut P,
        reporter: &'a mut W,
    ) -> Self {
        Self {
            ctx,
            runner,
            prompter,
            reporter,
            today: chrono::Local::now().date_naive(),
        }
    }

    /// Use `today` instead of the local date.
    pub fn on_date(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub async fn run(&mut self) -> SetupResult<Summary> {
        let ctx = self.ctx;
        let runner = self.runner;
        let options = &ctx.options;

        self.reporter
            .section(&format!("Setting up SSH on {}", ctx.platform.label()));
        let environment = Environment::probe(runner);

        let openssh = ensure_openssh(ctx, runner, self.reporter).await?;
        info!(?openssh, "OpenSSH ready");

        self.reporter.section("SSH key");
        let store = KeyStore::new(ctx);
        let directory = store.ensure_directory(runner, self.reporter).await?;
        let key = store.ensure_key_pair(runner, self.reporter).await?;
        let copied_to_clipboard = if options.copy_to_clipboard {
            store
                .copy_public_key_to_clipboard(runner, self.reporter, &key.public_key)
                .await
        } else {
            false
        };

        require_git(ctx, runner)?;

        let identity = if options.configure_identity {
            self.reporter.section("Git identity");
            let suggested_name = identity::login_name();
            Some(
                identity::configure(
                    runner,
                    self.prompter,
                    self.reporter,
                    suggested_name.as_deref(),
                )
                .await?,
            )
        } else {
            None
        };

        self.reporter.section("GitHub");
        let authenticated = options.offer_github_upload && detect_github_auth(runner).await;
        let upload = github::offer_upload(
            ctx,
            runner,
            self.prompter,
            self.reporter,
            authenticated,
            self.today,
        )
        .await?;

        self.reporter.section("Git remote");
        let remote = remote::rewrite_remote(ctx, runner, self.prompter, self.reporter).await?;

        self.reporter.section("Done");
        self.reporter.success("SSH setup complete.");
        self.reporter
            .note("Test the connection with: ssh -T git@github.com");

        let summary = Summary {
            environment,
            openssh,
            directory,
            key,
            copied_to_clipboard,
            identity,
            upload,
            remote,
        };
        info!(?summary, "setup finished");
        Ok(summary)
    }
}
