//! The SSH directory and the key pair inside it.
//!
//! The key pair is generated once by `ssh-keygen` and never touched again:
//! an existing private key is reported and left alone.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::context::{Platform, SetupContext};
use crate::error::{SetupError, SetupResult};
use crate::probe::SSH_KEYGEN;
use crate::report::Reporter;
use crate::tool::ToolRunner;

/// Whether the SSH directory was already there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryStatus {
    Existing,
    Created,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyStatus {
    Existing,
    Generated,
}

/// Result of [`KeyStore::ensure_key_pair`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPair {
    pub status: KeyStatus,
    /// Public key line, trimmed.
    pub public_key: String,
}

/// Operations on the user's SSH directory.
pub struct KeyStore<'a> {
    ctx: &'a SetupContext,
}

impl<'a> KeyStore<'a> {
    pub fn new(ctx: &'a SetupContext) -> Self {
        Self { ctx }
    }

    /// Create the SSH directory if needed.
    ///
    /// A freshly created directory is restricted to its owner; an existing one
    /// keeps whatever permissions it has. Failing to restrict only warns.
    pub async fn ensure_directory<R, W>(
        &self,
        runner: &R,
        reporter: &mut W,
    ) -> SetupResult<DirectoryStatus>
    where
        R: ToolRunner,
        W: Reporter,
    {
        let dir = &self.ctx.ssh_dir;
        let existed = tokio::fs::metadata(dir)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);

        match tokio::fs::create_dir_all(dir).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(error) => {
                return Err(SetupError::CreateDir {
                    path: dir.clone(),
                    error,
                })
            }
        }

        if existed {
            debug!(path = %dir.display(), "SSH directory already present");
            return Ok(DirectoryStatus::Existing);
        }

        let restricted = match self.ctx.platform {
            Platform::Windows => restrict_windows_acl(runner, dir).await,
            Platform::MacOs | Platform::Linux => restrict_unix_mode(dir).await,
        };
        if let Err(e) = restricted {
            warn!(path = %dir.display(), error = %e, "could not restrict SSH directory");
            reporter.warn(&format!(
                "Could not restrict access to {} ({e}). Make sure only you can read it.",
                dir.display()
            ));
        }

        info!(path = %dir.display(), "created SSH directory");
        reporter.success(&format!("Created {}", dir.display()));
        Ok(DirectoryStatus::Created)
    }

    /// Generate the key pair unless the private key already exists, then
    /// display the public key.
    pub async fn ensure_key_pair<R, W>(&self, runner: &R, reporter: &mut W) -> SetupResult<KeyPair>
    where
        R: ToolRunner,
        W: Reporter,
    {
        let private = &self.ctx.private_key;
        let status = if tokio::fs::try_exists(private).await.unwrap_or(false) {
            reporter.info(&format!("Existing SSH key found at {}", private.display()));
            KeyStatus::Existing
        } else {
            reporter.info("Generating a new ED25519 key pair...");
            self.generate(runner).await?;
            info!(path = %private.display(), "generated key pair");
            reporter.success(&format!("Key pair generated at {}", private.display()));
            KeyStatus::Generated
        };

        let public = &self.ctx.public_key;
        let public_key = tokio::fs::read_to_string(public)
            .await
            .map_err(|error| SetupError::ReadPublicKey {
                path: public.clone(),
                error,
            })?
            .trim()
            .to_string();

        reporter.info("Your public key:");
        reporter.block(&public_key);

        Ok(KeyPair { status, public_key })
    }

    async fn generate<R: ToolRunner>(&self, runner: &R) -> SetupResult<()> {
        let path = self.ctx.private_key.to_string_lossy().into_owned();
        let mut args = vec!["-t", "ed25519", "-f", path.as_str(), "-N", ""];
        if let Some(comment) = self.ctx.options.key_comment.as_deref() {
            args.extend(["-C", comment]);
        }
        args.push("-q");

        runner
            .run(SSH_KEYGEN, &args)
            .await
            .and_then(|out| out.check("ssh-keygen -t ed25519"))
            .map_err(|e| SetupError::KeyGeneration(e.to_string()))?;
        Ok(())
    }

    /// Put the public key on the clipboard. Returns whether it worked.
    ///
    /// Headless machines routinely lack a clipboard, so every failure is a
    /// note rather than an error.
    pub async fn copy_public_key_to_clipboard<R, W>(
        &self,
        runner: &R,
        reporter: &mut W,
        public_key: &str,
    ) -> bool
    where
        R: ToolRunner,
        W: Reporter,
    {
        let (program, args) = clipboard_command(self.ctx.platform);
        let result = runner
            .run_with_input(program, args, public_key.as_bytes())
            .await
            .and_then(|out| out.check(program));

        match result {
            Ok(_) => {
                reporter.success("Public key copied to the clipboard.");
                true
            }
            Err(e) => {
                debug!(program, error = %e, "clipboard copy failed");
                reporter.note(&format!(
                    "Could not copy to the clipboard ({e}). Copy the key above manually."
                ));
                false
            }
        }
    }
}

const NO_ARGS: &[&str] = &[];
const XCLIP_ARGS: &[&str] = &["-selection", "clipboard"];

/// Program and arguments that read the clipboard contents from stdin.
pub fn clipboard_command(platform: Platform) -> (&'static str, &'static [&'static str]) {
    match platform {
        Platform::Windows => ("clip", NO_ARGS),
        Platform::MacOs => ("pbcopy", NO_ARGS),
        Platform::Linux => ("xclip", XCLIP_ARGS),
    }
}

/// `icacls` arguments granting `user` full control and nobody else access.
pub fn icacls_args(dir: &Path, user: &str) -> Vec<String> {
    vec![
        dir.display().to_string(),
        "/inheritance:r".to_string(),
        "/grant:r".to_string(),
        format!("{user}:(OI)(CI)F"),
    ]
}

async fn restrict_windows_acl<R: ToolRunner>(runner: &R, dir: &Path) -> SetupResult<()> {
    let user = std::env::var("USERNAME").map_err(|_| {
        SetupError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "USERNAME is not set",
        ))
    })?;
    let args = icacls_args(dir, &user);
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    runner.run("icacls", &args).await?.check("icacls")?;
    Ok(())
}

#[cfg(unix)]
async fn restrict_unix_mode(dir: &Path) -> SetupResult<()> {
    use std::os::unix::fs::PermissionsExt;
    tokio::fs::set_permissions(dir, std::fs::Permissions::from_mode(0o700)).await?;
    Ok(())
}

#[cfg(not(unix))]
async fn restrict_unix_mode(_dir: &Path) -> SetupResult<()> {
    Ok(())
}
