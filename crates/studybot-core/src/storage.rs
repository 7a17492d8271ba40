//! Durable key-value storage port.
//!
//! Values are JSON strings keyed by name. Reads are best-effort: a missing or
//! corrupt value is treated as absence by callers, never as a fatal error.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Key holding the serialized current user.
pub const USER_KEY: &str = "student_chatbot_user";

/// Key holding the serialized session list.
pub const SESSIONS_KEY: &str = "student_chatbot_sessions";

/// String-valued key-value store.
pub trait Storage: Send + Sync {
    /// Returns the raw value for `key`, or `None` when absent or unreadable.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    /// Returns an error if the value cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing an absent key succeeds.
    ///
    /// # Errors
    /// Returns an error if the value exists but cannot be removed.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Outcome of reading a JSON value from storage.
#[derive(Debug, PartialEq, Eq)]
pub enum Loaded<T> {
    Missing,
    Corrupt,
    Value(T),
}

/// Reads and deserializes `key`.
pub fn load_json<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Loaded<T> {
    let Some(raw) = storage.get(key) else {
        return Loaded::Missing;
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Loaded::Value(value),
        Err(err) => {
            tracing::warn!(key, error = %err, "Discarding unreadable stored value");
            Loaded::Corrupt
        }
    }
}

/// Serializes `value` and stores it under `key`.
///
/// # Errors
/// Returns an error if serialization or the write fails.
pub fn save_json<T: Serialize + ?Sized>(storage: &dyn Storage, key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value).with_context(|| format!("Failed to serialize {key}"))?;
    storage.set(key, &raw)
}

/// Storage backed by one `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    /// Undecodable bytes are replaced with U+FFFD, so a damaged file still
    /// reaches the caller and fails to parse instead of looking absent.
    fn get(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);
        match fs::read(&path) {
            Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "Failed to read storage file");
                None
            }
        }
    }

    /// Uses atomic write (temp file + rename) to prevent corruption.
    fn set(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create directory {}", self.dir.display()))?;

        let path = self.path_for(key);
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, value)
            .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => {
                Err(err).with_context(|| format!("Failed to remove {}", path.display()))
            }
        }
    }
}

/// In-memory storage, mainly for tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `entries`.
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let values = entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            values: Mutex::new(values),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map still holds usable data.
        self.values
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_file_storage_roundtrip_and_remove() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("storage"));

        assert_eq!(storage.get("k"), None);
        storage.set("k", "{\"a\":1}").unwrap();
        assert_eq!(storage.get("k").as_deref(), Some("{\"a\":1}"));
        assert!(storage.path_for("k").exists());

        storage.remove("k").unwrap();
        assert_eq!(storage.get("k"), None);
        // Removing twice is fine.
        storage.remove("k").unwrap();
    }

    #[test]
    fn test_file_storage_leaves_no_temp_file() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        storage.set("k", "1").unwrap();

        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_file_storage_non_utf8_value_is_corrupt() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        fs::write(storage.path_for(USER_KEY), [0xff, 0xfe, 0x00]).unwrap();

        assert!(storage.get(USER_KEY).is_some());
        assert_eq!(
            load_json::<serde_json::Value>(&storage, USER_KEY),
            Loaded::Corrupt
        );
    }

    #[test]
    fn test_load_json_distinguishes_missing_and_corrupt() {
        let storage = MemoryStorage::with_entries([("bad", "{not json")]);

        assert_eq!(load_json::<Vec<u32>>(&storage, "absent"), Loaded::Missing);
        assert_eq!(load_json::<Vec<u32>>(&storage, "bad"), Loaded::Corrupt);

        save_json(&storage, "good", &vec![1u32, 2]).unwrap();
        assert_eq!(
            load_json::<Vec<u32>>(&storage, "good"),
            Loaded::Value(vec![1, 2])
        );
    }
}
