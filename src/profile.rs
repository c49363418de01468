use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// A named git identity stored in the profiles file
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    /// Unique profile name, immutable after creation
    pub name: String,
    /// Git username (user.name)
    pub username: String,
    /// Git email address (user.email), stored verbatim
    pub email: String,
    /// Default branch for new repositories (init.defaultBranch)
    #[serde(default = "default_branch")]
    pub default_branch: String,
    /// Private key to hand to the SSH agent on switch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssh_key_path: Option<PathBuf>,
    /// Reserved for caller policy, not acted on here
    #[serde(default)]
    pub auto_push: bool,
    /// Reserved for caller policy, not acted on here
    #[serde(default)]
    pub sign_commits: bool,
}

fn default_branch() -> String {
    "main".to_string()
}

/// All profiles plus the pointer to the active one.
///
/// Keyed by profile name; iteration (and therefore `list`) is lexicographic
/// by name.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileStore {
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
    /// Name of the active profile; may dangle after a remove elsewhere
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_profile: Option<String>,
}

impl ProfileStore {
    /// Adds a new profile; the store is unchanged on error
    pub fn add(&mut self, profile: Profile) -> Result<(), AppError> {
        if self.profiles.contains_key(&profile.name) {
            return Err(AppError::DuplicateProfile(profile.name));
        }
        self.profiles.insert(profile.name.clone(), profile);
        Ok(())
    }

    /// Removes a profile, clearing `current_profile` if it pointed at it
    pub fn remove(&mut self, name: &str) -> Result<(), AppError> {
        if self.profiles.remove(name).is_none() {
            return Err(AppError::ProfileNotFound(name.to_string()));
        }
        if self.current_profile.as_deref() == Some(name) {
            self.current_profile = None;
        }
        Ok(())
    }

    /// Looks up a profile by name
    pub fn get(&self, name: &str) -> Result<&Profile, AppError> {
        self.profiles
            .get(name)
            .ok_or_else(|| AppError::ProfileNotFound(name.to_string()))
    }

    /// Looks up a profile by name for editing
    pub fn get_mut(&mut self, name: &str) -> Result<&mut Profile, AppError> {
        self.profiles
            .get_mut(name)
            .ok_or_else(|| AppError::ProfileNotFound(name.to_string()))
    }

    /// All profiles, ordered by name
    pub fn list(&self) -> impl Iterator<Item = &Profile> {
        self.profiles.values()
    }

    /// The active profile, or `None` when unset or dangling
    pub fn current(&self) -> Option<&Profile> {
        self.current_profile
            .as_deref()
            .and_then(|name| self.profiles.get(name))
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Checks that every map key matches its profile's embedded name.
    ///
    /// Stores written by this tool always agree; a hand-edited or imported
    /// file may not, and a mismatch would make lookups and display disagree.
    pub fn verify_names(&self) -> Result<(), AppError> {
        for (key, profile) in &self.profiles {
            if *key != profile.name {
                return Err(AppError::Validation(format!(
                    "profile key '{key}' does not match its name '{}'",
                    profile.name
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(name: &str) -> Profile {
        Profile {
            name: name.to_string(),
            username: "alice".to_string(),
            email: "alice@co.com".to_string(),
            default_branch: "main".to_string(),
            ssh_key_path: None,
            auto_push: false,
            sign_commits: false,
        }
    }

    #[test]
    fn add_then_list_contains_name_once() {
        let mut store = ProfileStore::default();
        store.add(sample("work")).unwrap();

        let names: Vec<&str> = store.list().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["work"]);
    }

    #[test]
    fn add_duplicate_fails_and_leaves_store_unchanged() {
        let mut store = ProfileStore::default();
        store.add(sample("work")).unwrap();
        let before = store.clone();

        let mut dup = sample("work");
        dup.username = "someone-else".to_string();
        let err = store.add(dup).unwrap_err();

        assert!(matches!(err, AppError::DuplicateProfile(name) if name == "work"));
        assert_eq!(store, before);
    }

    #[test]
    fn list_is_ordered_by_name() {
        let mut store = ProfileStore::default();
        store.add(sample("zeta")).unwrap();
        store.add(sample("alpha")).unwrap();
        store.add(sample("mid")).unwrap();

        let names: Vec<&str> = store.list().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn remove_missing_profile_fails() {
        let mut store = ProfileStore::default();
        let err = store.remove("ghost").unwrap_err();
        assert!(matches!(err, AppError::ProfileNotFound(_)));
    }

    #[test]
    fn removing_active_profile_clears_current() {
        let mut store = ProfileStore::default();
        store.add(sample("work")).unwrap();
        store.current_profile = Some("work".to_string());

        store.remove("work").unwrap();

        assert_eq!(store.current_profile, None);
        assert!(store.current().is_none());
    }

    #[test]
    fn removing_inactive_profile_keeps_current() {
        let mut store = ProfileStore::default();
        store.add(sample("work")).unwrap();
        store.add(sample("personal")).unwrap();
        store.current_profile = Some("work".to_string());

        store.remove("personal").unwrap();

        assert_eq!(store.current_profile.as_deref(), Some("work"));
    }

    #[test]
    fn dangling_current_profile_reads_as_none() {
        let store = ProfileStore {
            profiles: BTreeMap::new(),
            current_profile: Some("gone".to_string()),
        };
        assert!(store.current().is_none());
    }

    #[test]
    fn verify_names_rejects_key_name_disagreement() {
        let mut store = ProfileStore::default();
        store.add(sample("work")).unwrap();
        assert!(store.verify_names().is_ok());

        store
            .profiles
            .insert("personal".to_string(), sample("work"));
        let err = store.verify_names().unwrap_err();
        assert!(matches!(err, AppError::Validation(msg) if msg.contains("personal")));
    }

    #[test]
    fn profile_defaults_fill_in_on_deserialize() {
        let json = r#"{"name":"work","username":"alice","email":"alice@co.com"}"#;
        let profile: Profile = serde_json::from_str(json).unwrap();

        assert_eq!(profile.default_branch, "main");
        assert_eq!(profile.ssh_key_path, None);
        assert!(!profile.auto_push);
        assert!(!profile.sign_commits);
    }
}
