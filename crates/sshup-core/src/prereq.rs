//! Required tools: the OpenSSH client (auto-installed on Windows) and Git.

use tracing::{debug, info, warn};

use crate::context::{Platform, SetupContext};
use crate::error::{SetupError, SetupResult};
use crate::probe::{detect_tool, GIT, SSH_KEYGEN};
use crate::report::Reporter;
use crate::tool::ToolRunner;

const POWERSHELL: &str = "powershell";

const CAPABILITY_QUERY: &str = "Get-WindowsCapability -Online -Name OpenSSH.Client*";

// The elevated child's exit code is only visible through `-PassThru`.
const CAPABILITY_INSTALL: &str = "$p = Start-Process powershell -Verb RunAs -Wait -PassThru -ArgumentList \
     '-NoProfile','-Command','Add-WindowsCapability -Online -Name OpenSSH.Client~~~~0.0.1.0'; \
     exit $p.ExitCode";

const OPENSSH_WINDOWS_INSTRUCTIONS: &str = "\
Install it manually:
  Settings > Apps > Optional features > Add a feature > OpenSSH Client
or from an administrator PowerShell:
  Add-WindowsCapability -Online -Name OpenSSH.Client~~~~0.0.1.0
Then run sshup again.";

const OPENSSH_MACOS_HINT: &str = "\
ssh-keygen ships with macOS. If it was removed, install OpenSSH with Homebrew:
  brew install openssh";

const OPENSSH_LINUX_HINT: &str = "\
Install the OpenSSH client with your package manager:

Ubuntu/Debian:  sudo apt install openssh-client
Fedora/RHEL:    sudo dnf install openssh-clients
Arch Linux:     sudo pacman -S openssh";

const GIT_WINDOWS_HINT: &str = "\
Install Git for Windows:
  winget install --id Git.Git -e
or download it from https://git-scm.com/download/win";

const GIT_MACOS_HINT: &str = "\
Install Git with the Xcode command line tools or Homebrew:
  xcode-select --install
  brew install git";

const GIT_LINUX_HINT: &str = "\
Install Git with your package manager:

Ubuntu/Debian:  sudo apt install git
Fedora/RHEL:    sudo dnf install git
Arch Linux:     sudo pacman -S git";

/// Progress of the OpenSSH client check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenSshState {
    NotChecked,
    AlreadyInstalled,
    Installing,
    Installed,
    Failed,
}

/// Manual install guidance for `ssh-keygen` on Unix-like platforms.
pub fn ssh_keygen_hint(platform: Platform) -> &'static str {
    match platform {
        Platform::Windows => OPENSSH_WINDOWS_INSTRUCTIONS,
        Platform::MacOs => OPENSSH_MACOS_HINT,
        Platform::Linux => OPENSSH_LINUX_HINT,
    }
}

pub fn git_hint(platform: Platform) -> &'static str {
    match platform {
        Platform::Windows => GIT_WINDOWS_HINT,
        Platform::MacOs => GIT_MACOS_HINT,
        Platform::Linux => GIT_LINUX_HINT,
    }
}

/// Make sure `ssh-keygen` can be used.
///
/// On Windows the OpenSSH client capability is installed when missing. On
/// other platforms a missing `ssh-keygen` is fatal.
pub async fn ensure_openssh<R, W>(
    ctx: &SetupContext,
    runner: &R,
    reporter: &mut W,
) -> SetupResult<OpenSshState>
where
    R: ToolRunner,
    W: Reporter,
{
    let mut state = OpenSshState::NotChecked;
    debug!(?state, "checking OpenSSH client");

    if detect_tool(runner, SSH_KEYGEN) {
        state = OpenSshState::AlreadyInstalled;
        debug!(?state, "ssh-keygen found on PATH");
        return Ok(state);
    }

    if ctx.platform != Platform::Windows {
        return Err(SetupError::MissingTool {
            tool: SSH_KEYGEN,
            hint: ssh_keygen_hint(ctx.platform).to_string(),
        });
    }

    match windows_capability_installed(runner).await {
        Some(true) => {
            state = OpenSshState::AlreadyInstalled;
            debug!(?state, "OpenSSH client capability present");
            return Ok(state);
        }
        Some(false) => debug!("OpenSSH client capability not present"),
        None => debug!("OpenSSH client capability state unknown"),
    }

    state = OpenSshState::Installing;
    debug!(?state, "installing OpenSSH client");
    reporter.info("OpenSSH client not found. Installing it (administrator approval required)...");

    let install = runner
        .run(POWERSHELL, &["-NoProfile", "-Command", CAPABILITY_INSTALL])
        .await
        .and_then(|out| out.check("Add-WindowsCapability OpenSSH.Client"));

    match install {
        Ok(_) => {
            state = OpenSshState::Installed;
            info!(?state, "OpenSSH client installed");
            reporter.success("OpenSSH client installed.");
            Ok(state)
        }
        Err(e) => {
            state = OpenSshState::Failed;
            warn!(?state, error = %e, "OpenSSH client install failed");
            Err(SetupError::OpenSshUnavailable {
                reason: e.to_string(),
                instructions: OPENSSH_WINDOWS_INSTRUCTIONS,
            })
        }
    }
}

/// `None` when the query itself fails, which it does without elevation.
async fn windows_capability_installed<R: ToolRunner>(runner: &R) -> Option<bool> {
    match runner
        .run(POWERSHELL, &["-NoProfile", "-Command", CAPABILITY_QUERY])
        .await
    {
        Ok(out) if out.success() => Some(capability_installed(&out.stdout)),
        Ok(out) => {
            debug!(code = ?out.code, "capability query failed");
            None
        }
        Err(e) => {
            debug!(error = %e, "capability query could not run");
            None
        }
    }
}

/// Whether `Get-WindowsCapability` output reports `State : Installed`.
pub fn capability_installed(output: &str) -> bool {
    output.lines().any(|line| {
        line.split_once(':').is_some_and(|(key, value)| {
            key.trim().eq_ignore_ascii_case("state") && value.trim().eq_ignore_ascii_case("installed")
        })
    })
}

/// Git is needed for the identity and remote steps; its absence is fatal.
pub fn require_git<R: ToolRunner>(ctx: &SetupContext, runner: &R) -> SetupResult<()> {
    if detect_tool(runner, GIT) {
        Ok(())
    } else {
        Err(SetupError::MissingTool {
            tool: GIT,
            hint: git_hint(ctx.platform).to_string(),
        })
    }
}
