use crate::error::AppError;
use crate::exec::run_with_timeout;
use crate::profile::Profile;

/// Boundary around global git configuration writes, substitutable in tests
pub trait GitConfig {
    /// Sets one global config key
    ///
    /// # Arguments
    /// * `key` - Git config key to set (e.g. user.name)
    /// * `value` - Value to set for key
    fn set_global(&self, key: &str, value: &str) -> Result<(), AppError>;
}

/// Applies a profile's identity as one logical unit: user.name, user.email,
/// then init.defaultBranch, stopping at the first failing key. Earlier keys
/// are not rolled back; global config sets are idempotent overwrites.
pub fn set_global_identity(git: &impl GitConfig, profile: &Profile) -> Result<(), AppError> {
    git.set_global("user.name", &profile.username)?;
    git.set_global("user.email", &profile.email)?;
    git.set_global("init.defaultBranch", &profile.default_branch)
}

/// `GitConfig` backed by the `git` command-line tool
pub struct GitCli;

impl GitConfig for GitCli {
    fn set_global(&self, key: &str, value: &str) -> Result<(), AppError> {
        let output = run_with_timeout("git", &["config", "--global", key, value])?;
        if !output.success {
            return Err(AppError::GitConfig {
                key: key.to_string(),
                reason: output.stderr.trim().to_string(),
            });
        }
        Ok(())
    }
}

impl GitCli {
    /// Reads one global config key, `None` when the key is unset
    pub fn get_global(&self, key: &str) -> Result<Option<String>, AppError> {
        let output = run_with_timeout("git", &["config", "--global", "--get", key])?;
        if !output.success {
            // git exits 1 for an unset key
            return Ok(None);
        }
        Ok(Some(output.stdout.trim().to_string()))
    }
}
