//! Application state controller
//!
//! Owns the course collection and orchestrates the content generator and
//! the course store. All collection updates go through the pure transforms
//! in `state`, and every mutation is followed by a persistence attempt
//! whose reported mode lands back on the state for display.

use chrono::Utc;
use tracing::{debug, warn};

use super::state::{self, AppState};
use crate::content::{ContentGenerator, GenerationError};
use crate::store::CourseStore;
use crate::types::{Course, Topic, TopicStatus};

/// Snapshot handed out by `begin_generation`, carrying everything the
/// remote call needs so the caller never reaches back into live state.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub course_id: String,
    pub subject: String,
    pub topic: Topic,
}

pub struct AppController<G: ContentGenerator> {
    state: AppState,
    generator: G,
    store: CourseStore,
}

impl<G: ContentGenerator> AppController<G> {
    /// Build a controller, loading any persisted courses. The first course
    /// becomes current, matching what a returning user last worked on.
    pub fn new(generator: G, store: CourseStore) -> Self {
        let courses = store.load();
        let current_course_id = courses.first().map(|c| c.id.clone());
        Self {
            state: AppState {
                courses,
                current_course_id,
                ..Default::default()
            },
            generator,
            store,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Approximate byte size of the persisted snapshot, for display
    pub fn estimate_size(&self) -> u64 {
        self.store.estimate_size()
    }

    /// Create a course by generating a syllabus for `subject`.
    ///
    /// Whitespace-only subjects are a no-op (`Ok(None)`). On success the
    /// new course is prepended, made current, and its id returned. On
    /// failure the collection is untouched and the error is surfaced to
    /// the caller. The in-progress flag clears on every path.
    pub async fn create_course(
        &mut self,
        subject: &str,
    ) -> Result<Option<String>, GenerationError> {
        let subject = subject.trim();
        if subject.is_empty() {
            return Ok(None);
        }

        self.state.generating_syllabus = true;
        let result = self.generator.generate_syllabus(subject).await;
        self.state.generating_syllabus = false;

        let items = result?;

        let course = Course {
            id: uuid::Uuid::new_v4().to_string(),
            subject: subject.to_string(),
            created_at: Utc::now(),
            topics: items
                .into_iter()
                .map(|item| Topic::pending(item.id, item.title, item.description, item.level))
                .collect(),
        };
        let course_id = course.id.clone();

        self.state.courses = state::prepend_course(&self.state.courses, course);
        self.state.current_course_id = Some(course_id.clone());
        self.state.selected_topic_id = None;
        self.persist();

        Ok(Some(course_id))
    }

    /// Optimistically flip a topic of the current course to `generating`
    /// and select it, before any remote call resolves.
    ///
    /// Returns `None` when there is no current course or the topic is not
    /// in it; generation needs nothing beyond the returned snapshot.
    pub fn begin_generation(&mut self, topic_id: &str) -> Option<GenerationRequest> {
        let course = match self.state.current_course() {
            Some(course) => course,
            None => {
                debug!("begin_generation without a current course");
                return None;
            }
        };
        let topic = match course.topic(topic_id) {
            Some(topic) => topic.clone(),
            None => {
                debug!(topic_id, "begin_generation for unknown topic");
                return None;
            }
        };
        let request = GenerationRequest {
            course_id: course.id.clone(),
            subject: course.subject.clone(),
            topic,
        };

        self.state.courses = state::with_topic_status(
            &self.state.courses,
            &request.course_id,
            topic_id,
            TopicStatus::Generating,
        );
        self.state.selected_topic_id = Some(topic_id.to_string());
        self.persist();

        Some(request)
    }

    /// Apply the outcome of a generation call, keyed by course and topic
    /// id. Outcomes land in completion order: a later call's result
    /// overwrites an earlier one's (last-write-wins), and an outcome for a
    /// course or topic that no longer exists is dropped. The optimistic
    /// selection made at begin time is never reverted.
    pub fn finish_generation(
        &mut self,
        course_id: &str,
        topic_id: &str,
        outcome: Result<String, GenerationError>,
    ) -> TopicStatus {
        let exists = self
            .state
            .courses
            .iter()
            .any(|c| c.id == course_id && c.topic(topic_id).is_some());
        if !exists {
            debug!(course_id, topic_id, "dropping completion for vanished topic");
            return TopicStatus::Error;
        }

        let status = match outcome {
            Ok(content) => {
                self.state.courses = state::with_topic_completed(
                    &self.state.courses,
                    course_id,
                    topic_id,
                    content,
                    Utc::now(),
                );
                TopicStatus::Completed
            }
            Err(e) => {
                warn!(topic_id, "content generation failed: {}", e);
                self.state.courses = state::with_topic_status(
                    &self.state.courses,
                    course_id,
                    topic_id,
                    TopicStatus::Error,
                );
                TopicStatus::Error
            }
        };
        self.persist();
        status
    }

    /// Generate notes for one topic of the current course: optimistic
    /// status flip, remote call, completion, in one await.
    pub async fn generate_content(&mut self, topic_id: &str) -> Option<TopicStatus> {
        let request = self.begin_generation(topic_id)?;
        let outcome = self
            .generator
            .generate_topic_content(&request.subject, &request.topic)
            .await;
        Some(self.finish_generation(&request.course_id, topic_id, outcome))
    }

    /// Open a topic of the current course: a completed topic is only
    /// selected for viewing; any other status triggers generation (which
    /// also selects it, and which is how error topics are retried).
    pub async fn open_topic(&mut self, topic_id: &str) -> Option<TopicStatus> {
        let status = self
            .state
            .current_course()
            .and_then(|c| c.topic(topic_id))
            .map(|t| t.status)?;

        if status == TopicStatus::Completed {
            self.state.selected_topic_id = Some(topic_id.to_string());
            return Some(TopicStatus::Completed);
        }
        self.generate_content(topic_id).await
    }

    /// Remove a course. Confirmation is the caller's responsibility; by
    /// the time this runs the decision is made. Deleting the current
    /// course clears both selections; deleting any other course leaves
    /// them untouched.
    pub fn delete_course(&mut self, course_id: &str) {
        self.state.courses = state::remove_course(&self.state.courses, course_id);
        if self.state.current_course_id.as_deref() == Some(course_id) {
            self.state.current_course_id = None;
            self.state.selected_topic_id = None;
        }
        self.persist();
    }

    /// Make a course current, clearing the topic selection
    pub fn select_course(&mut self, course_id: &str) -> bool {
        if !self.state.courses.iter().any(|c| c.id == course_id) {
            return false;
        }
        self.state.current_course_id = Some(course_id.to_string());
        self.state.selected_topic_id = None;
        true
    }

    /// Persist the collection and surface the reported storage mode.
    /// Persistence failures never interrupt the user flow.
    fn persist(&mut self) {
        let receipt = self.store.save(&self.state.courses);
        self.state.storage_mode = receipt.mode;
        if !receipt.success {
            warn!("saving courses failed; continuing with in-memory state");
        }
    }
}
