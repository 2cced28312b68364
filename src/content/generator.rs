//! The two generation operations: syllabus (schema-constrained) and topic
//! notes (freeform Markdown)

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::llm::{ChatMessage, LlmClient};
use super::video_links::link_video_searches;
use super::GenerationError;
use crate::config::Config;
use crate::types::{DifficultyLevel, Topic};

/// Fallback returned when the notes call succeeds but carries no text
const NO_CONTENT_FALLBACK: &str = "No content generated.";

/// A syllabus entry as returned to the controller: the remote service does
/// not supply ids, so a fresh one is assigned to each item here.
#[derive(Debug, Clone)]
pub struct SyllabusItem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub level: DifficultyLevel,
}

/// Seam between the controller and the remote model service.
///
/// The controller only ever talks to this trait, so tests can drive it with
/// a stub instead of the network.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Generate a full syllabus for a subject, Basic through Advanced.
    /// All-or-nothing: any transport, API or schema failure loses the whole
    /// syllabus.
    async fn generate_syllabus(&self, subject: &str)
        -> Result<Vec<SyllabusItem>, GenerationError>;

    /// Generate Markdown study notes for one topic, with video-search
    /// mentions already rewritten into links. Only transport/API failures
    /// are errors; an empty response becomes a fallback string.
    async fn generate_topic_content(
        &self,
        subject: &str,
        topic: &Topic,
    ) -> Result<String, GenerationError>;
}

/// Production generator backed by the chat-completions client
pub struct LlmContentGenerator {
    client: LlmClient,
    syllabus_model: String,
    notes_model: String,
}

impl LlmContentGenerator {
    pub fn new(client: LlmClient, config: &Config) -> Self {
        Self {
            client,
            syllabus_model: config.models.syllabus.clone(),
            notes_model: config.models.notes.clone(),
        }
    }

    /// Build from stored credentials and config
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let client = LlmClient::from_config(config)?;
        Ok(Self::new(client, config))
    }
}

/// Wire format of one syllabus entry, per the declared response schema
#[derive(Debug, Deserialize)]
struct SyllabusEntry {
    title: String,
    description: String,
    level: DifficultyLevel,
}

/// The response schema declared on the syllabus call: an array of
/// {title, description, level} objects with level restricted to the three
/// difficulty values.
fn syllabus_schema() -> serde_json::Value {
    json!({
        "type": "json_schema",
        "json_schema": {
            "name": "syllabus",
            "strict": true,
            "schema": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "title": {
                            "type": "string",
                            "description": "The name of the chapter or topic"
                        },
                        "description": {
                            "type": "string",
                            "description": "A brief one-sentence overview of what this topic covers"
                        },
                        "level": {
                            "type": "string",
                            "enum": ["Basic", "Intermediate", "Advanced"]
                        }
                    },
                    "required": ["title", "description", "level"]
                }
            }
        }
    })
}

fn syllabus_prompt(subject: &str) -> String {
    format!(
        "Create a comprehensive study syllabus for the subject: \"{}\".\n\
         Structure the syllabus logically from Basic concepts, through Intermediate, to Advanced topics.\n\
         Return the result as a strictly structured JSON array.\n\
         Ensure topics are distinct and cover the entire learning path.",
        subject
    )
}

fn notes_prompt(subject: &str, topic: &Topic) -> String {
    format!(
        "Write detailed study notes for the topic: \"{}\" within the subject: \"{}\".\n\
         \n\
         Target Audience: Students learning {} level concepts.\n\
         \n\
         Requirements:\n\
         1. Explain the core concepts clearly.\n\
         2. PROVIDE REAL-LIFE EXAMPLES/ANALOGIES to make it easy to understand.\n\
         3. Structure with Markdown headers (#, ##, ###).\n\
         4. At the end, strictly add a section titled \"### Recommended Study Videos\" \
         containing 3 search terms for YouTube that would show relevant tutorials. \
         Format them as a list.\n\
         \n\
         Tone: Educational, encouraging, and clear.",
        topic.title, subject, topic.level
    )
}

/// Strip a Markdown code fence wrapper, if present, before schema parsing.
/// Some models fence their JSON even under a response schema.
fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(inner) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the optional language tag on the opening fence line
    match inner.split_once('\n') {
        Some((first, body)) if !first.trim().is_empty() && !first.trim().starts_with('[') => body.trim(),
        _ => inner.trim(),
    }
}

#[async_trait]
impl ContentGenerator for LlmContentGenerator {
    async fn generate_syllabus(
        &self,
        subject: &str,
    ) -> Result<Vec<SyllabusItem>, GenerationError> {
        let messages = vec![
            ChatMessage::system(
                "You are an expert curriculum developer creating structured learning paths for students.",
            ),
            ChatMessage::user(syllabus_prompt(subject)),
        ];

        let text = self
            .client
            .complete(&self.syllabus_model, messages, Some(syllabus_schema()))
            .await?;

        if text.trim().is_empty() {
            return Err(GenerationError::Empty);
        }

        let entries: Vec<SyllabusEntry> = serde_json::from_str(strip_code_fences(&text))?;
        if entries.is_empty() {
            // A course never exists without its topic list known
            return Err(GenerationError::Empty);
        }

        Ok(entries
            .into_iter()
            .map(|entry| SyllabusItem {
                id: uuid::Uuid::new_v4().to_string(),
                title: entry.title,
                description: entry.description,
                level: entry.level,
            })
            .collect())
    }

    async fn generate_topic_content(
        &self,
        subject: &str,
        topic: &Topic,
    ) -> Result<String, GenerationError> {
        let messages = vec![
            ChatMessage::system("You are a helpful and knowledgeable AI tutor."),
            ChatMessage::user(notes_prompt(subject, topic)),
        ];

        let text = self
            .client
            .complete(&self.notes_model, messages, None)
            .await?;

        if text.trim().is_empty() {
            tracing::warn!(topic = %topic.title, "notes call returned no text, using fallback");
            return Ok(NO_CONTENT_FALLBACK.to_string());
        }

        Ok(link_video_searches(&text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syllabus_prompt_mentions_subject_and_levels() {
        let prompt = syllabus_prompt("History of Jazz");
        assert!(prompt.contains("\"History of Jazz\""));
        assert!(prompt.contains("Basic"));
        assert!(prompt.contains("Intermediate"));
        assert!(prompt.contains("Advanced"));
        assert!(prompt.contains("JSON array"));
    }

    #[test]
    fn test_notes_prompt_targets_topic_level() {
        let topic = Topic::pending("t", "Bebop", "Fast jazz", DifficultyLevel::Advanced);
        let prompt = notes_prompt("History of Jazz", &topic);
        assert!(prompt.contains("\"Bebop\""));
        assert!(prompt.contains("Advanced level concepts"));
        assert!(prompt.contains("### Recommended Study Videos"));
        assert!(prompt.contains("3 search terms"));
    }

    #[test]
    fn test_syllabus_schema_declares_required_fields() {
        let schema = syllabus_schema();
        let required = &schema["json_schema"]["schema"]["items"]["required"];
        assert_eq!(
            required,
            &serde_json::json!(["title", "description", "level"])
        );
        let levels = &schema["json_schema"]["schema"]["items"]["properties"]["level"]["enum"];
        assert_eq!(
            levels,
            &serde_json::json!(["Basic", "Intermediate", "Advanced"])
        );
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("[1,2]"), "[1,2]");
        assert_eq!(strip_code_fences("```json\n[1,2]\n```"), "[1,2]");
        assert_eq!(strip_code_fences("```\n[1,2]\n```"), "[1,2]");
        assert_eq!(strip_code_fences("  [1,2]  "), "[1,2]");
        // Unterminated fence is left for the parser to reject
        assert_eq!(strip_code_fences("```json\n[1,2]"), "```json\n[1,2]");
    }

    #[test]
    fn test_syllabus_entry_parses_wire_format() {
        let json = r#"[
            {"title": "Variables", "description": "Naming values", "level": "Basic"},
            {"title": "Closures", "description": "Captured state", "level": "Advanced"}
        ]"#;
        let entries: Vec<SyllabusEntry> = serde_json::from_str(json).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].level, DifficultyLevel::Basic);
        assert_eq!(entries[1].title, "Closures");
    }

    #[test]
    fn test_syllabus_entry_rejects_unknown_level() {
        let json = r#"[{"title": "X", "description": "Y", "level": "Expert"}]"#;
        assert!(serde_json::from_str::<Vec<SyllabusEntry>>(json).is_err());
    }
}
