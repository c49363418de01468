use std::path::Path;

use crate::error::AppError;
use crate::exec::run_with_timeout;

/// Boundary around SSH agent key registration, substitutable in tests
pub trait SshAgent {
    /// Hands a private key to the running agent
    ///
    /// # Arguments
    /// * `path` - Filesystem path of the private key
    fn add_key(&self, path: &Path) -> Result<(), AppError>;
}

/// `SshAgent` backed by the `ssh-add` command-line tool
pub struct SshCli;

impl SshAgent for SshCli {
    fn add_key(&self, path: &Path) -> Result<(), AppError> {
        let output = run_with_timeout("ssh-add", &[&path.to_string_lossy()])?;
        if !output.success {
            // Agent not running or key rejected; advisory either way
            return Err(AppError::AgentUnavailable(output.stderr.trim().to_string()));
        }
        Ok(())
    }
}

/// Probes SSH authentication against github.com
///
/// GitHub closes `ssh -T` with exit code 1 even on success, so the
/// "successfully authenticated" banner on stderr also counts.
pub fn test_github_connection() -> Result<(bool, String), AppError> {
    let output = run_with_timeout("ssh", &["-T", "git@github.com"])?;
    let message = output.stderr.trim().to_string();
    let ok = output.success || message.contains("successfully authenticated");
    Ok((ok, message))
}
