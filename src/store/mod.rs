//! Course persistence
//!
//! Serializes the full course collection to one blob in the local
//! key-value store, reporting a storage mode per attempt. The adapter is
//! read-only over domain objects: serialize on save, deserialize on load,
//! never mutate.

pub mod kv;

pub use kv::{FileKv, KvError};

use serde_json::Value;
use std::path::PathBuf;

use crate::types::{Course, StorageMode};

/// Fixed key the course collection lives under
const COURSES_KEY: &str = "courses";

/// Outcome of a save attempt.
///
/// `mode` is recomputed on every attempt: a save that fits the local store
/// reports `Local` even if an earlier one overflowed to the `Cloud` label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveReceipt {
    pub success: bool,
    pub mode: StorageMode,
}

pub struct CourseStore {
    kv: FileKv,
}

impl CourseStore {
    /// Open the store under `data_dir` with an optional capacity limit
    pub fn open(data_dir: PathBuf, capacity_bytes: Option<u64>) -> Result<Self, KvError> {
        Ok(Self {
            kv: FileKv::open(data_dir, capacity_bytes)?,
        })
    }

    /// Load the persisted course collection.
    ///
    /// An absent entry or a corrupt snapshot both yield an empty
    /// collection; the parse failure is logged, never raised.
    pub fn load(&self) -> Vec<Course> {
        let raw = match self.kv.get(COURSES_KEY) {
            Ok(raw) => raw,
            Err(KvError::NotFound) => return Vec::new(),
            Err(e) => {
                tracing::warn!("failed to read saved courses: {}", e);
                return Vec::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(courses) => courses,
            Err(e) => {
                tracing::warn!("failed to parse saved courses, starting empty: {}", e);
                Vec::new()
            }
        }
    }

    /// Persist the full course collection, overwriting any prior snapshot.
    ///
    /// A quota error does not retry and does not shed data; it reports mode
    /// `Cloud` while only logging a simulated remote save. Nothing is
    /// actually persisted anywhere in that case; the call site must not
    /// assume durability when the mode is `Cloud`.
    pub fn save(&self, courses: &[Course]) -> SaveReceipt {
        let serialized = match serde_json::to_string(courses) {
            Ok(s) => s,
            Err(e) => {
                tracing::error!("failed to serialize courses: {}", e);
                return SaveReceipt {
                    success: false,
                    mode: StorageMode::Local,
                };
            }
        };

        match self.kv.set(COURSES_KEY, &serialized) {
            Ok(()) => SaveReceipt {
                success: true,
                mode: StorageMode::Local,
            },
            Err(KvError::QuotaExceeded) => {
                tracing::warn!(
                    courses = courses.len(),
                    "local store full, simulating remote save; data was NOT persisted"
                );
                SaveReceipt {
                    success: true,
                    mode: StorageMode::Cloud,
                }
            }
            Err(e) => {
                tracing::error!("failed to write courses: {}", e);
                SaveReceipt {
                    success: false,
                    mode: StorageMode::Local,
                }
            }
        }
    }

    /// Approximate byte size of the currently persisted snapshot (not any
    /// in-memory collection). Display-only; 0 when nothing is stored.
    pub fn estimate_size(&self) -> u64 {
        match self.kv.get(COURSES_KEY) {
            Ok(raw) => match serde_json::from_str::<Value>(&raw) {
                Ok(value) => rough_size(&value),
                Err(_) => 0,
            },
            Err(_) => 0,
        }
    }
}

/// Rough byte cost of a JSON document: 4 per boolean, 8 per number, 2 per
/// UTF-16 code unit of string data. Containers cost nothing themselves.
fn rough_size(value: &Value) -> u64 {
    let mut bytes = 0u64;
    let mut stack = vec![value];

    while let Some(value) = stack.pop() {
        match value {
            Value::Bool(_) => bytes += 4,
            Value::Number(_) => bytes += 8,
            Value::String(s) => bytes += 2 * s.encode_utf16().count() as u64,
            Value::Array(items) => stack.extend(items.iter()),
            Value::Object(map) => stack.extend(map.values()),
            Value::Null => {}
        }
    }

    bytes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DifficultyLevel, Topic, TopicStatus};
    use chrono::Utc;

    fn sample_course(subject: &str) -> Course {
        Course {
            id: uuid::Uuid::new_v4().to_string(),
            subject: subject.to_string(),
            created_at: Utc::now(),
            topics: vec![
                Topic::pending("t1", "Basics", "Starting out", DifficultyLevel::Basic),
                Topic {
                    id: "t2".to_string(),
                    title: "Deep dive".to_string(),
                    description: "Further".to_string(),
                    level: DifficultyLevel::Advanced,
                    status: TopicStatus::Completed,
                    content: Some("# Notes\nBody".to_string()),
                    last_updated: Some(Utc::now()),
                },
            ],
        }
    }

    #[test]
    fn test_load_when_absent_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = CourseStore::open(dir.path().to_path_buf(), None).unwrap();
        assert!(store.load().is_empty());
        assert_eq!(store.estimate_size(), 0);
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = CourseStore::open(dir.path().to_path_buf(), None).unwrap();

        let courses = vec![sample_course("Python"), sample_course("Jazz")];
        let receipt = store.save(&courses);
        assert!(receipt.success);
        assert_eq!(receipt.mode, StorageMode::Local);

        let loaded = store.load();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].subject, "Python");
        assert_eq!(loaded[0].topics.len(), 2);
        assert_eq!(loaded[0].topics[1].status, TopicStatus::Completed);
        assert_eq!(
            loaded[0].topics[1].content.as_deref(),
            Some("# Notes\nBody")
        );

        // Saving what was loaded reproduces an equal snapshot
        store.save(&loaded);
        let again = store.load();
        assert_eq!(
            serde_json::to_value(&loaded).unwrap(),
            serde_json::to_value(&again).unwrap()
        );
    }

    #[test]
    fn test_load_corrupt_snapshot_is_empty_not_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = CourseStore::open(dir.path().to_path_buf(), None).unwrap();
        std::fs::write(dir.path().join("courses.json"), "{not json").unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_quota_exceeded_reports_cloud_without_persisting() {
        let dir = tempfile::tempdir().unwrap();
        let store = CourseStore::open(dir.path().to_path_buf(), Some(16)).unwrap();

        let receipt = store.save(&[sample_course("Python")]);
        // The flagged design gap: the save claims success with a cloud
        // label, but nothing reached any remote destination.
        assert!(receipt.success);
        assert_eq!(receipt.mode, StorageMode::Cloud);
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_mode_returns_to_local_once_data_fits() {
        let dir = tempfile::tempdir().unwrap();
        let store = CourseStore::open(dir.path().to_path_buf(), Some(4096)).unwrap();

        let big: Vec<Course> = (0..50).map(|i| sample_course(&format!("S{}", i))).collect();
        assert_eq!(store.save(&big).mode, StorageMode::Cloud);

        // Freeing space brings the next attempt back to local
        assert_eq!(store.save(&[]).mode, StorageMode::Local);
    }

    #[test]
    fn test_estimate_size_counts_leaves() {
        let value: Value = serde_json::json!({
            "flag": true,          // 4
            "count": 3,            // 8
            "name": "abcd",        // 8
            "nested": { "xs": [1, 2] } // 16
        });
        assert_eq!(rough_size(&value), 36);
    }

    #[test]
    fn test_estimate_size_reads_persisted_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = CourseStore::open(dir.path().to_path_buf(), None).unwrap();
        store.save(&[sample_course("Python")]);
        assert!(store.estimate_size() > 0);
    }
}
