//! In-memory application state and the pure transformations over it
//!
//! The course collection is only ever replaced wholesale: every mutation is
//! a function from the old collection to a new one, so each update is a
//! consistent snapshot with no partial-write visibility.

use chrono::{DateTime, Utc};

use crate::types::{Course, StorageMode, Topic, TopicStatus};

/// Everything the presentation layer consumes
#[derive(Debug, Clone)]
pub struct AppState {
    /// All courses, newest first
    pub courses: Vec<Course>,
    pub current_course_id: Option<String>,
    pub selected_topic_id: Option<String>,
    /// Set for the duration of a syllabus generation call
    pub generating_syllabus: bool,
    /// Mode reported by the most recent persistence attempt
    pub storage_mode: StorageMode,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            courses: Vec::new(),
            current_course_id: None,
            selected_topic_id: None,
            generating_syllabus: false,
            storage_mode: StorageMode::Local,
        }
    }
}

impl AppState {
    pub fn current_course(&self) -> Option<&Course> {
        let id = self.current_course_id.as_deref()?;
        self.courses.iter().find(|c| c.id == id)
    }

    pub fn selected_topic(&self) -> Option<&Topic> {
        let topic_id = self.selected_topic_id.as_deref()?;
        self.current_course()?.topic(topic_id)
    }
}

/// New collection with `course` at the front
pub fn prepend_course(courses: &[Course], course: Course) -> Vec<Course> {
    let mut next = Vec::with_capacity(courses.len() + 1);
    next.push(course);
    next.extend(courses.iter().cloned());
    next
}

/// New collection without the course with `course_id`
pub fn remove_course(courses: &[Course], course_id: &str) -> Vec<Course> {
    courses
        .iter()
        .filter(|c| c.id != course_id)
        .cloned()
        .collect()
}

/// New collection with one topic's status changed.
///
/// Only the addressed topic is touched; its content and timestamp stay as
/// they were.
pub fn with_topic_status(
    courses: &[Course],
    course_id: &str,
    topic_id: &str,
    status: TopicStatus,
) -> Vec<Course> {
    map_topic(courses, course_id, topic_id, |topic| Topic {
        status,
        ..topic.clone()
    })
}

/// New collection with one topic completed: status, content, and the
/// update timestamp change together, keeping the content-iff-completed
/// invariant.
pub fn with_topic_completed(
    courses: &[Course],
    course_id: &str,
    topic_id: &str,
    content: String,
    updated_at: DateTime<Utc>,
) -> Vec<Course> {
    map_topic(courses, course_id, topic_id, |topic| Topic {
        status: TopicStatus::Completed,
        content: Some(content.clone()),
        last_updated: Some(updated_at),
        ..topic.clone()
    })
}

fn map_topic(
    courses: &[Course],
    course_id: &str,
    topic_id: &str,
    f: impl Fn(&Topic) -> Topic,
) -> Vec<Course> {
    courses
        .iter()
        .map(|course| {
            if course.id != course_id {
                return course.clone();
            }
            Course {
                topics: course
                    .topics
                    .iter()
                    .map(|topic| {
                        if topic.id == topic_id {
                            f(topic)
                        } else {
                            topic.clone()
                        }
                    })
                    .collect(),
                ..course.clone()
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DifficultyLevel;

    fn course(id: &str, topic_ids: &[&str]) -> Course {
        Course {
            id: id.to_string(),
            subject: format!("subject-{}", id),
            created_at: Utc::now(),
            topics: topic_ids
                .iter()
                .map(|t| Topic::pending(*t, format!("title-{}", t), "", DifficultyLevel::Basic))
                .collect(),
        }
    }

    #[test]
    fn test_prepend_puts_new_course_first() {
        let courses = vec![course("old", &["a"])];
        let next = prepend_course(&courses, course("new", &["b"]));
        assert_eq!(next.len(), 2);
        assert_eq!(next[0].id, "new");
        assert_eq!(next[1].id, "old");
        // Original untouched
        assert_eq!(courses.len(), 1);
    }

    #[test]
    fn test_remove_course_leaves_others() {
        let courses = vec![course("a", &[]), course("b", &[]), course("c", &[])];
        let next = remove_course(&courses, "b");
        let ids: Vec<&str> = next.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_with_topic_status_touches_only_target() {
        let courses = vec![course("c1", &["t1", "t2"]), course("c2", &["t1"])];
        let next = with_topic_status(&courses, "c1", "t2", TopicStatus::Generating);

        assert_eq!(next[0].topics[0].status, TopicStatus::Pending);
        assert_eq!(next[0].topics[1].status, TopicStatus::Generating);
        // Same topic id in another course is untouched
        assert_eq!(next[1].topics[0].status, TopicStatus::Pending);
    }

    #[test]
    fn test_with_topic_completed_sets_content_and_timestamp() {
        let courses = vec![course("c1", &["t1"])];
        let when = Utc::now();
        let next = with_topic_completed(&courses, "c1", "t1", "# Notes".to_string(), when);

        let topic = &next[0].topics[0];
        assert_eq!(topic.status, TopicStatus::Completed);
        assert_eq!(topic.content.as_deref(), Some("# Notes"));
        assert_eq!(topic.last_updated, Some(when));
    }

    #[test]
    fn test_unknown_ids_are_a_no_op() {
        let courses = vec![course("c1", &["t1"])];
        let next = with_topic_status(&courses, "c1", "missing", TopicStatus::Error);
        assert_eq!(next[0].topics[0].status, TopicStatus::Pending);

        let next = with_topic_status(&courses, "missing", "t1", TopicStatus::Error);
        assert_eq!(next[0].topics[0].status, TopicStatus::Pending);
    }

    #[test]
    fn test_state_lookups() {
        let mut state = AppState {
            courses: vec![course("c1", &["t1"])],
            ..Default::default()
        };
        assert!(state.current_course().is_none());

        state.current_course_id = Some("c1".to_string());
        assert_eq!(state.current_course().unwrap().id, "c1");

        state.selected_topic_id = Some("t1".to_string());
        assert_eq!(state.selected_topic().unwrap().id, "t1");

        // Selection dangling outside the current course resolves to nothing
        state.selected_topic_id = Some("t9".to_string());
        assert!(state.selected_topic().is_none());
    }
}
