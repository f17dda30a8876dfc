//! User configuration at `~/.sshup/config.toml`.
//!
//! Every setting is optional; a missing file means defaults.

use anyhow::{Context, Result};
use serde::Deserialize;
use sshup_core::SetupOptions;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Top-level config file structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub key: KeySection,
    #[serde(default)]
    pub git: GitSection,
    #[serde(default)]
    pub github: GithubSection,
}

/// `[key]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct KeySection {
    /// Private key file name inside `~/.ssh`.
    #[serde(default = "default_file_name")]
    pub file_name: String,

    /// Comment stored in the public key (empty = ssh-keygen default).
    #[serde(default)]
    pub comment: String,

    #[serde(default = "default_true")]
    pub copy_to_clipboard: bool,
}

impl Default for KeySection {
    fn default() -> Self {
        Self {
            file_name: default_file_name(),
            comment: String::new(),
            copy_to_clipboard: true,
        }
    }
}

/// `[git]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct GitSection {
    /// Remote offered for HTTPS to SSH conversion.
    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(default = "default_true")]
    pub configure_identity: bool,
}

impl Default for GitSection {
    fn default() -> Self {
        Self {
            remote: default_remote(),
            configure_identity: true,
        }
    }
}

/// `[github]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct GithubSection {
    #[serde(default = "default_true")]
    pub offer_upload: bool,

    /// Key title prefix; the upload date is appended.
    #[serde(default = "default_title_prefix")]
    pub title_prefix: String,
}

impl Default for GithubSection {
    fn default() -> Self {
        Self {
            offer_upload: true,
            title_prefix: default_title_prefix(),
        }
    }
}

fn default_file_name() -> String {
    "id_ed25519".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_title_prefix() -> String {
    "sshup".to_string()
}

fn default_true() -> bool {
    true
}

/// `~/.sshup/config.toml`.
pub fn default_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("cannot determine home directory")?;
    Ok(home.join(".sshup").join("config.toml"))
}

impl Config {
    /// Load configuration from a TOML file, returning defaults if the file
    /// does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("failed to parse config at {}", path.display()))?;

        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Validate and convert into the options the setup flow understands.
    pub fn into_options(self) -> Result<SetupOptions> {
        let file_name = self.key.file_name.trim();
        if file_name.is_empty() || file_name.contains(['/', '\\']) || file_name.ends_with(".pub") {
            anyhow::bail!("invalid key file name '{}'", self.key.file_name);
        }
        if self.git.remote.trim().is_empty() {
            anyhow::bail!("git remote name must not be empty");
        }

        let comment = self.key.comment.trim();
        Ok(SetupOptions {
            key_file_name: file_name.to_string(),
            key_comment: (!comment.is_empty()).then(|| comment.to_string()),
            remote: self.git.remote.trim().to_string(),
            copy_to_clipboard: self.key.copy_to_clipboard,
            configure_identity: self.git.configure_identity,
            offer_github_upload: self.github.offer_upload,
            key_title_prefix: self.github.title_prefix,
        })
    }
}
