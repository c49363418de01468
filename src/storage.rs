use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tempfile::NamedTempFile;

use crate::error::AppError;
use crate::profile::ProfileStore;

/// Profiles file inside the config directory
const PROFILES_FILE: &str = "profiles.json";
/// Lock file guarding the load-mutate-save cycle
const LOCK_FILE: &str = "profiles.lock";
/// Dot-directory under the user's home directory
const CONFIG_DIR: &str = ".gitid";
/// Environment override for the config directory, used by tests
const CONFIG_DIR_ENV: &str = "GITID_CONFIG_DIR";

/// Handle to the on-disk profile store
pub struct Storage {
    dir: PathBuf,
}

/// Exclusive advisory lock on the store, released on drop
pub struct StoreLock {
    file: File,
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}

impl Storage {
    /// Opens storage at the default location (`~/.gitid`, overridable via
    /// `GITID_CONFIG_DIR`)
    pub fn new() -> Result<Self, AppError> {
        if let Ok(dir) = std::env::var(CONFIG_DIR_ENV) {
            return Ok(Self { dir: PathBuf::from(dir) });
        }
        let home_dir = dirs::home_dir().ok_or_else(|| {
            AppError::Validation("failed to find the home directory".to_string())
        })?;
        Ok(Self { dir: home_dir.join(CONFIG_DIR) })
    }

    /// Opens storage rooted at an explicit directory
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path to the profiles file
    pub fn profiles_path(&self) -> PathBuf {
        self.dir.join(PROFILES_FILE)
    }

    /// Takes the exclusive lock; callers hold the guard across
    /// load-mutate-save so concurrent invocations cannot lose updates
    pub fn lock(&self) -> Result<StoreLock, AppError> {
        fs::create_dir_all(&self.dir)?;
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(self.dir.join(LOCK_FILE))?;
        file.lock_exclusive()?;
        Ok(StoreLock { file })
    }

    /// Loads the store from disk; a missing or empty file is an empty store
    pub fn load(&self) -> Result<ProfileStore, AppError> {
        let path = self.profiles_path();
        if !path.exists() {
            return Ok(ProfileStore::default());
        }

        let contents = fs::read_to_string(&path)?;
        if contents.trim().is_empty() {
            return Ok(ProfileStore::default());
        }

        serde_json::from_str(&contents).map_err(AppError::CorruptStore)
    }

    /// Saves the store atomically: write to a sibling temp file, then rename
    /// over the profiles file so a crash never leaves a partial write
    pub fn save(&self, store: &ProfileStore) -> Result<(), AppError> {
        let path = self.profiles_path();
        let json = serde_json::to_string_pretty(store)
            .map_err(|e| AppError::Validation(format!("failed to serialize profiles: {e}")))?;

        let persist = |path: &Path, json: &str| -> std::io::Result<()> {
            fs::create_dir_all(&self.dir)?;
            let mut tmp = NamedTempFile::new_in(&self.dir)?;
            tmp.write_all(json.as_bytes())?;
            tmp.persist(path).map_err(|e| e.error)?;
            Ok(())
        };

        persist(&path, &json).map_err(|source| AppError::Persistence { path, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Profile;
    use tempfile::TempDir;

    fn sample_store() -> ProfileStore {
        let mut store = ProfileStore::default();
        store
            .add(Profile {
                name: "work".to_string(),
                username: "alice".to_string(),
                email: "alice@co.com".to_string(),
                default_branch: "main".to_string(),
                ssh_key_path: Some(PathBuf::from("/home/alice/.ssh/id_work")),
                auto_push: false,
                sign_commits: true,
            })
            .unwrap();
        store.current_profile = Some("work".to_string());
        store
    }

    #[test]
    fn load_missing_file_yields_empty_store() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::with_dir(dir.path());

        let store = storage.load().unwrap();
        assert!(store.is_empty());
        assert_eq!(store.current_profile, None);
    }

    #[test]
    fn load_empty_file_yields_empty_store() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::with_dir(dir.path());
        fs::write(storage.profiles_path(), "  \n").unwrap();

        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::with_dir(dir.path());
        let store = sample_store();

        storage.save(&store).unwrap();
        assert_eq!(storage.load().unwrap(), store);
    }

    #[test]
    fn round_trips_empty_store() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::with_dir(dir.path());

        storage.save(&ProfileStore::default()).unwrap();
        assert_eq!(storage.load().unwrap(), ProfileStore::default());
    }

    #[test]
    fn corrupt_file_is_reported_as_such() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::with_dir(dir.path());
        fs::write(storage.profiles_path(), "{ not json").unwrap();

        let err = storage.load().unwrap_err();
        assert!(matches!(err, AppError::CorruptStore(_)));
    }

    #[test]
    fn save_overwrites_previous_contents() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::with_dir(dir.path());

        storage.save(&sample_store()).unwrap();
        let mut store = storage.load().unwrap();
        store.remove("work").unwrap();
        storage.save(&store).unwrap();

        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn lock_can_be_taken_again_after_release() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::with_dir(dir.path());

        drop(storage.lock().unwrap());
        drop(storage.lock().unwrap());
    }

    #[test]
    fn lock_excludes_a_second_handle_until_released() {
        let dir = TempDir::new().unwrap();
        let storage = Storage::with_dir(dir.path());
        let guard = storage.lock().unwrap();

        let contender = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(dir.path().join(LOCK_FILE))
            .unwrap();
        assert!(contender.try_lock_exclusive().is_err());

        drop(guard);
        assert!(contender.try_lock_exclusive().is_ok());
        FileExt::unlock(&contender).unwrap();
    }
}
