//! Immutable startup facts: platform, fixed key paths and user options.
//!
//! Built once in `main` and handed by reference to every step.

use std::path::{Path, PathBuf};

use crate::error::{SetupError, SetupResult};

/// Operating system family the flow branches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
}

impl Platform {
    /// Detect the platform of the running binary.
    pub fn detect() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    /// Map an OS identifier (as in `std::env::consts::OS`) to a family.
    ///
    /// Unix flavours without a dedicated branch are treated as Linux.
    pub fn from_os(os: &str) -> Self {
        match os {
            "windows" => Platform::Windows,
            "macos" => Platform::MacOs,
            _ => Platform::Linux,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Platform::Windows => "Windows",
            Platform::MacOs => "macOS",
            Platform::Linux => "Linux",
        }
    }
}

/// User-tunable behaviour, usually loaded from the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupOptions {
    /// File name of the private key inside the SSH directory.
    pub key_file_name: String,
    /// Comment embedded in the public key (`ssh-keygen -C`).
    pub key_comment: Option<String>,
    /// Name of the remote offered for HTTPS to SSH conversion.
    pub remote: String,
    pub copy_to_clipboard: bool,
    pub configure_identity: bool,
    pub offer_github_upload: bool,
    /// Prefix of the key title registered on GitHub.
    pub key_title_prefix: String,
}

impl Default for SetupOptions {
    fn default() -> Self {
        Self {
            key_file_name: "id_ed25519".to_string(),
            key_comment: None,
            remote: "origin".to_string(),
            copy_to_clipboard: true,
            configure_identity: true,
            offer_github_upload: true,
            key_title_prefix: "sshup".to_string(),
        }
    }
}

/// Everything the steps need to know about the environment.
#[derive(Debug, Clone)]
pub struct SetupContext {
    pub platform: Platform,
    pub ssh_dir: PathBuf,
    pub private_key: PathBuf,
    pub public_key: PathBuf,
    pub options: SetupOptions,
}

impl SetupContext {
    /// Build a context rooted at `home` (`<home>/.ssh/<key_file_name>`).
    pub fn new(platform: Platform, home: &Path, options: SetupOptions) -> Self {
        let ssh_dir = home.join(".ssh");
        let private_key = ssh_dir.join(&options.key_file_name);
        let public_key = ssh_dir.join(format!("{}.pub", options.key_file_name));
        Self {
            platform,
            ssh_dir,
            private_key,
            public_key,
            options,
        }
    }

    /// Build a context for the current user and platform.
    pub fn default_location(options: SetupOptions) -> SetupResult<Self> {
        let home = dirs::home_dir().ok_or(SetupError::HomeDir)?;
        Ok(Self::new(Platform::detect(), &home, options))
    }
}
