//! sshup: first-time SSH key setup for developers.
//!
//! Generates an ED25519 key pair if there is none, copies the public key to
//! the clipboard, fills in a missing Git identity, offers to register the
//! key with GitHub and to switch the current repository's remote to SSH.

mod config;
mod console;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use sshup_core::{Setup, SetupContext, SystemRunner};
use tracing::{debug, info};

use crate::console::{ConsoleReporter, DialoguerPrompter};

/// sshup: set up SSH keys for Git hosting
#[derive(Parser)]
#[command(name = "sshup", version, about = "First-time SSH key setup: generate a key, configure Git, switch remotes to SSH")]
struct Cli {
    /// Config file path (defaults to ~/.sshup/config.toml)
    #[arg(long = "config")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing.
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("sshup=debug,sshup_core=debug")
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("sshup=warn,sshup_core=warn")
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    if let Err(e) = run(cli).await {
        debug!("{:#}", e);
        eprintln!("sshup: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = match cli.config {
        Some(path) => path,
        None => config::default_path()?,
    };
    let options = config::Config::load(&config_path)?
        .into_options()
        .with_context(|| format!("invalid config at {}", config_path.display()))?;

    let ctx = SetupContext::default_location(options)?;
    info!(platform = ctx.platform.label(), key = %ctx.private_key.display(), "starting setup");

    let runner = SystemRunner;
    let mut prompter = DialoguerPrompter;
    let mut reporter = ConsoleReporter::new();

    Setup::new(&ctx, &runner, &mut prompter, &mut reporter)
        .run()
        .await?;
    Ok(())
}
