//! Shared domain types used across modules
//!
//! This module contains types that are used by multiple modules
//! to avoid circular dependencies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Difficulty band a topic belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum DifficultyLevel {
    Basic,
    Intermediate,
    Advanced,
}

impl DifficultyLevel {
    /// All levels in syllabus order
    pub fn all() -> &'static [DifficultyLevel] {
        &[
            DifficultyLevel::Basic,
            DifficultyLevel::Intermediate,
            DifficultyLevel::Advanced,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyLevel::Basic => "Basic",
            DifficultyLevel::Intermediate => "Intermediate",
            DifficultyLevel::Advanced => "Advanced",
        }
    }

    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "basic" => Some(DifficultyLevel::Basic),
            "intermediate" => Some(DifficultyLevel::Intermediate),
            "advanced" => Some(DifficultyLevel::Advanced),
            _ => None,
        }
    }
}

impl std::fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle of a topic's notes.
///
/// Transitions only move pending -> generating -> {completed, error};
/// an error topic may re-enter generating on retry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TopicStatus {
    Pending,
    Generating,
    Completed,
    Error,
}

impl std::fmt::Display for TopicStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TopicStatus::Pending => write!(f, "pending"),
            TopicStatus::Generating => write!(f, "generating"),
            TopicStatus::Completed => write!(f, "completed"),
            TopicStatus::Error => write!(f, "error"),
        }
    }
}

/// A single syllabus topic with its generation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    /// Unique topic ID (unique within its course)
    pub id: String,
    pub title: String,
    /// One-sentence overview of what the topic covers
    pub description: String,
    pub level: DifficultyLevel,
    pub status: TopicStatus,
    /// Markdown notes, present iff status is Completed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// When the notes were last (re)generated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl Topic {
    /// A fresh topic awaiting generation
    pub fn pending(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        level: DifficultyLevel,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            level,
            status: TopicStatus::Pending,
            content: None,
            last_updated: None,
        }
    }
}

/// A course: one subject with its full syllabus.
///
/// A course only ever exists with its complete topic list; there is no
/// partially-created state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    /// Unique course ID
    pub id: String,
    /// Free-text subject the syllabus was generated for
    pub subject: String,
    pub created_at: DateTime<Utc>,
    /// Ordered syllabus, Basic through Advanced
    pub topics: Vec<Topic>,
}

impl Course {
    pub fn topic(&self, topic_id: &str) -> Option<&Topic> {
        self.topics.iter().find(|t| t.id == topic_id)
    }

    /// Topics at a given level, preserving syllabus order
    pub fn topics_at(&self, level: DifficultyLevel) -> impl Iterator<Item = &Topic> {
        self.topics.iter().filter(move |t| t.level == level)
    }
}

/// Where the last persistence attempt reported the data went.
///
/// Cloud is advisory only: it is the label the store reports when the local
/// quota is exhausted, and no remote write actually happens.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageMode {
    Local,
    Cloud,
}

impl std::fmt::Display for StorageMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageMode::Local => write!(f, "local"),
            StorageMode::Cloud => write!(f, "cloud"),
        }
    }
}
