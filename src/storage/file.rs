use std::fs;
use std::path::{Path, PathBuf};

use super::{KeyValueStore, StorageError, StorageResult};

/// One `<key>.json` file per key inside a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> StorageResult<Self> {
        let root = root.into();
        if !root.exists() {
            fs::create_dir_all(&root)?;
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> StorageResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::invalid_key(key));
        }
        Ok(self.root.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.path_for(key)?;

        // 先写临时文件再重命名，避免写一半的文档
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        let path = self.path_for(key)?;
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_set_get_remove() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::open(dir.path().join("data")).unwrap();

        assert_eq!(store.get("focusTasks_v1").unwrap(), None);
        store.set("focusTasks_v1", "[]").unwrap();
        assert_eq!(store.get("focusTasks_v1").unwrap().as_deref(), Some("[]"));
        assert!(dir.path().join("data").join("focusTasks_v1.json").exists());

        store.remove("focusTasks_v1").unwrap();
        assert_eq!(store.get("focusTasks_v1").unwrap(), None);
        // 删除不存在的键不报错
        store.remove("focusTasks_v1").unwrap();
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();

        assert!(matches!(
            store.set("../escape", "x"),
            Err(StorageError::InvalidKey(_))
        ));
        assert!(store.get("").is_err());
    }

    #[test]
    fn test_overwrite_replaces_document() {
        let dir = TempDir::new().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();

        store.set("streakData", r#"{"currentStreak":1}"#).unwrap();
        store.set("streakData", r#"{"currentStreak":2}"#).unwrap();
        assert_eq!(
            store.get("streakData").unwrap().as_deref(),
            Some(r#"{"currentStreak":2}"#)
        );
        assert!(!dir.path().join("streakData.json.tmp").exists());
    }
}
