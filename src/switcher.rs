use crate::error::AppError;
use crate::git::{self, GitConfig};
use crate::profile::{Profile, ProfileStore};
use crate::ssh::SshAgent;
use crate::storage::Storage;

/// Result of a completed switch; the warning carries a soft SSH-agent
/// failure that did not abort the operation
#[derive(Debug)]
pub struct SwitchOutcome {
    pub profile: Profile,
    pub warning: Option<String>,
}

/// Makes exactly one profile active: applies its identity to global git
/// config and the SSH agent, then records the switch in the store
pub struct Switcher<'a, G: GitConfig, S: SshAgent> {
    storage: &'a Storage,
    git: &'a G,
    ssh: &'a S,
}

impl<'a, G: GitConfig, S: SshAgent> Switcher<'a, G, S> {
    pub fn new(storage: &'a Storage, git: &'a G, ssh: &'a S) -> Self {
        Self { storage, git, ssh }
    }

    /// Switches to the named profile.
    ///
    /// Ordering matters: the profile is resolved before any external state
    /// is touched, git identity is applied before the store records the
    /// switch, and an SSH agent failure is downgraded to a warning. A save
    /// failure after the git calls is surfaced as `InconsistentState` so the
    /// caller can retry the save alone.
    pub fn switch_to(
        &self,
        store: &mut ProfileStore,
        name: &str,
    ) -> Result<SwitchOutcome, AppError> {
        let profile = store.get(name)?.clone();

        git::set_global_identity(self.git, &profile)?;

        let mut warning = None;
        if let Some(key_path) = &profile.ssh_key_path {
            if key_path.exists() {
                if let Err(e) = self.ssh.add_key(key_path) {
                    warning = Some(e.to_string());
                }
            }
        }

        store.current_profile = Some(name.to_string());
        self.storage
            .save(store)
            .map_err(|e| AppError::InconsistentState(Box::new(e)))?;

        Ok(SwitchOutcome { profile, warning })
    }
}
