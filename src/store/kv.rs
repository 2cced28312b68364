//! File-backed single-blob key-value store
//!
//! One JSON document per key under a base directory. An optional capacity
//! limit models the quota of the key-value stores this data lived in
//! originally; writes that would exceed it fail with `QuotaExceeded`
//! without touching the existing blob.

use std::fs;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KvError {
    #[error("entry not found")]
    NotFound,

    #[error("storage quota exceeded")]
    QuotaExceeded,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub struct FileKv {
    base_dir: PathBuf,
    capacity_bytes: Option<u64>,
}

impl FileKv {
    /// Open a store rooted at `base_dir`, creating the directory if needed
    pub fn open(base_dir: PathBuf, capacity_bytes: Option<u64>) -> Result<Self, KvError> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self {
            base_dir,
            capacity_bytes,
        })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{}.json", key))
    }

    /// Read the blob stored under `key`
    pub fn get(&self, key: &str) -> Result<String, KvError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Err(KvError::NotFound);
        }
        Ok(fs::read_to_string(&path)?)
    }

    /// Overwrite the blob stored under `key`.
    ///
    /// Fails with `QuotaExceeded` before writing anything if the value does
    /// not fit the configured capacity; the previous blob stays intact.
    pub fn set(&self, key: &str, value: &str) -> Result<(), KvError> {
        if let Some(cap) = self.capacity_bytes {
            if value.len() as u64 > cap {
                return Err(KvError::QuotaExceeded);
            }
        }
        fs::write(self.path_for(key), value)?;
        Ok(())
    }

    /// Whether a blob exists under `key`
    pub fn contains(&self, key: &str) -> bool {
        self.path_for(key).exists()
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let kv = FileKv::open(dir.path().to_path_buf(), None).unwrap();
        assert!(matches!(kv.get("absent"), Err(KvError::NotFound)));
        assert!(!kv.contains("absent"));
    }

    #[test]
    fn test_set_then_get_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let kv = FileKv::open(dir.path().to_path_buf(), None).unwrap();
        kv.set("courses", r#"{"a":1}"#).unwrap();
        assert_eq!(kv.get("courses").unwrap(), r#"{"a":1}"#);
        assert!(kv.contains("courses"));
    }

    #[test]
    fn test_set_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let kv = FileKv::open(dir.path().to_path_buf(), None).unwrap();
        kv.set("courses", "first").unwrap();
        kv.set("courses", "second").unwrap();
        assert_eq!(kv.get("courses").unwrap(), "second");
    }

    #[test]
    fn test_capacity_rejects_oversized_write_and_keeps_old_blob() {
        let dir = tempfile::tempdir().unwrap();
        let kv = FileKv::open(dir.path().to_path_buf(), Some(8)).unwrap();
        kv.set("courses", "ok").unwrap();

        let err = kv.set("courses", "way too large for the cap").unwrap_err();
        assert!(matches!(err, KvError::QuotaExceeded));
        // The previous blob is untouched
        assert_eq!(kv.get("courses").unwrap(), "ok");
    }
}
