//! Terminal rendering for courses, topics and notes

use crate::app::AppState;
use crate::types::{Course, DifficultyLevel, StorageMode, Topic, TopicStatus};

/// One-character indicator for a topic's generation state
pub fn status_glyph(status: TopicStatus) -> &'static str {
    match status {
        TopicStatus::Pending => "·",
        TopicStatus::Generating => "~",
        TopicStatus::Completed => "✓",
        TopicStatus::Error => "✗",
    }
}

/// Topics in display order: grouped Basic, Intermediate, Advanced,
/// preserving syllabus order within each group. Numbering shown to the
/// user follows this order.
pub fn ordered_topics(course: &Course) -> Vec<&Topic> {
    DifficultyLevel::all()
        .iter()
        .flat_map(|level| course.topics_at(*level))
        .collect()
}

/// Render the course list with the storage indicator
pub fn print_course_list(state: &AppState, stored_bytes: u64) {
    if state.courses.is_empty() {
        println!("No courses yet. Start with: new <subject>");
        return;
    }

    println!(
        "Courses (storage: {}, ~{} bytes):",
        storage_label(state.storage_mode),
        stored_bytes
    );
    for (i, course) in state.courses.iter().enumerate() {
        let marker = if state.current_course_id.as_deref() == Some(course.id.as_str()) {
            "*"
        } else {
            " "
        };
        let done = course
            .topics
            .iter()
            .filter(|t| t.status == TopicStatus::Completed)
            .count();
        println!(
            " {}{:>2}. {}  [{} topics, {} done]  {}",
            marker,
            i + 1,
            course.subject,
            course.topics.len(),
            done,
            course.created_at.format("%Y-%m-%d"),
        );
    }
}

fn storage_label(mode: StorageMode) -> &'static str {
    match mode {
        StorageMode::Local => "local",
        // Advisory label only; no remote write backs it
        StorageMode::Cloud => "cloud (simulated)",
    }
}

/// Render a course's syllabus grouped by difficulty
pub fn print_topics(course: &Course, selected_topic_id: Option<&str>) {
    println!("{} > syllabus:", course.subject);
    let mut number = 0usize;
    for level in DifficultyLevel::all() {
        let topics: Vec<&Topic> = course.topics_at(*level).collect();
        if topics.is_empty() {
            continue;
        }
        println!("\n  {}", level);
        for topic in topics {
            number += 1;
            let marker = if selected_topic_id == Some(topic.id.as_str()) {
                ">"
            } else {
                " "
            };
            println!(
                "  {}{:>2}. [{}] {} - {}",
                marker,
                number,
                status_glyph(topic.status),
                topic.title,
                topic.description,
            );
        }
    }
}

/// Render a topic's notes, or a hint about its state
pub fn print_topic(course: &Course, topic: &Topic) {
    println!("{} > {} ({})", course.subject, topic.title, topic.level);
    println!("{}\n", topic.description);

    match topic.status {
        TopicStatus::Completed => {
            if let Some(content) = &topic.content {
                println!("{}", content);
            }
            if let Some(updated) = topic.last_updated {
                println!("\n(generated {})", updated.format("%Y-%m-%d %H:%M UTC"));
            }
        }
        TopicStatus::Generating => println!("Notes are being generated..."),
        TopicStatus::Error => println!("Generation failed. Open the topic again to retry."),
        TopicStatus::Pending => println!("Notes not generated yet. Open the topic to generate them."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_ordered_topics_groups_by_level() {
        let course = Course {
            id: "c".to_string(),
            subject: "S".to_string(),
            created_at: Utc::now(),
            topics: vec![
                Topic::pending("adv", "Adv", "", DifficultyLevel::Advanced),
                Topic::pending("b1", "B1", "", DifficultyLevel::Basic),
                Topic::pending("mid", "Mid", "", DifficultyLevel::Intermediate),
                Topic::pending("b2", "B2", "", DifficultyLevel::Basic),
            ],
        };
        let ids: Vec<&str> = ordered_topics(&course).iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["b1", "b2", "mid", "adv"]);
    }

    #[test]
    fn test_status_glyphs_are_distinct() {
        let glyphs = [
            status_glyph(TopicStatus::Pending),
            status_glyph(TopicStatus::Generating),
            status_glyph(TopicStatus::Completed),
            status_glyph(TopicStatus::Error),
        ];
        let unique: std::collections::HashSet<_> = glyphs.iter().collect();
        assert_eq!(unique.len(), glyphs.len());
    }
}
