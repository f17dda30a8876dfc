//! sshup-core: first-time SSH key setup for developers.
//!
//! Detects or generates an ED25519 key pair, copies the public key to the
//! clipboard, fills in a missing Git identity, optionally registers the key
//! with GitHub through `gh`, and offers to switch an HTTPS remote to SSH.
//!
//! All external work goes through [`ToolRunner`]; user interaction goes
//! through [`Prompter`] and [`Reporter`]. The CLI supplies terminal
//! implementations of both.

pub mod context;
pub mod error;
pub mod flow;
pub mod github;
pub mod identity;
pub mod keystore;
pub mod prereq;
pub mod probe;
pub mod prompt;
pub mod remote;
pub mod report;
pub mod tool;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used items at crate root.
pub use context::{Platform, SetupContext, SetupOptions};
pub use error::{SetupError, SetupResult};
pub use flow::{Setup, Summary};
pub use prompt::Prompter;
pub use remote::{parse_https_url, to_ssh_url, RepoCoordinates};
pub use report::{Level, Reporter};
pub use tool::{SystemRunner, ToolOutput, ToolRunner};
