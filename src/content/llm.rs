//! Chat-completions client for OpenAI-compatible providers (OpenRouter by default)

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use super::GenerationError;

const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Configuration for a model provider
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Base URL for the API (e.g., "https://openrouter.ai/api/v1")
    pub base_url: String,
    /// API key for authentication
    pub api_key: String,
    /// Extra headers to include in requests (e.g., X-Title, HTTP-Referer)
    pub extra_headers: Vec<(String, String)>,
}

impl ProviderConfig {
    /// Create an OpenRouter provider configuration
    pub fn openrouter(api_key: String) -> Self {
        Self {
            base_url: OPENROUTER_BASE_URL.to_string(),
            api_key,
            extra_headers: vec![
                (
                    "HTTP-Referer".to_string(),
                    "https://github.com/notesmith".to_string(),
                ),
                ("X-Title".to_string(), "Notesmith".to_string()),
            ],
        }
    }

    /// Create a provider configuration with a custom base URL
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            base_url,
            api_key,
            extra_headers: Vec::new(),
        }
    }

    /// Provider for a configured base URL, keeping the OpenRouter defaults
    /// when the URL matches
    pub fn resolve(api_key: String, base_url: &str) -> Self {
        if base_url == OPENROUTER_BASE_URL {
            Self::openrouter(api_key)
        } else {
            Self::with_base_url(api_key, base_url.to_string())
        }
    }
}

/// A single chat message in a request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    /// Structured-output constraint; present only on the syllabus call
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<Value>,
}

/// Model provider API client
#[derive(Clone)]
pub struct LlmClient {
    client: Arc<reqwest::Client>,
    provider: ProviderConfig,
}

impl LlmClient {
    /// Create a new client for the default provider
    pub fn new(api_key: String) -> Self {
        Self::with_provider(ProviderConfig::openrouter(api_key))
    }

    /// Create a client with a specific provider configuration
    pub fn with_provider(provider: ProviderConfig) -> Self {
        Self {
            client: Arc::new(reqwest::Client::new()),
            provider,
        }
    }

    /// Create a client from stored credentials and config
    pub fn from_config(config: &crate::config::Config) -> anyhow::Result<Self> {
        let api_key = crate::security::keyring::get_api_key()?;
        Ok(Self::with_provider(ProviderConfig::resolve(
            api_key,
            &config.api.base_url,
        )))
    }

    /// Get the provider configuration
    pub fn provider(&self) -> &ProviderConfig {
        &self.provider
    }

    /// Send a chat completion request and return the response text.
    ///
    /// The returned string may be empty; callers decide whether that is an
    /// error (syllabus) or a fallback (notes). Pass `response_format` to
    /// constrain the output to a JSON schema.
    pub async fn complete(
        &self,
        model: &str,
        messages: Vec<ChatMessage>,
        response_format: Option<Value>,
    ) -> Result<String, GenerationError> {
        let request = ChatRequest {
            model: model.to_string(),
            messages,
            max_tokens: None,
            response_format,
        };

        let mut req_builder = self
            .client
            .post(format!("{}/chat/completions", self.provider.base_url))
            .header("Authorization", format!("Bearer {}", self.provider.api_key));
        for (key, value) in &self.provider.extra_headers {
            req_builder = req_builder.header(key.as_str(), value.as_str());
        }
        let response = req_builder.json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api { status, body });
        }

        let body = response.text().await?;
        tracing::debug!("provider response: {} bytes", body.len());

        // Parse as raw Value first for maximum provider compatibility.
        // Strict struct deserialization breaks on models that return
        // non-standard field types.
        let raw: Value = serde_json::from_str(body.trim())?;

        Ok(extract_content(&raw))
    }
}

/// Extract the message text from a chat-completions response.
///
/// Handles both string content and array-of-content-parts formats; some
/// models return `"hello"`, others `[{"type":"text","text":"hello"}]`.
fn extract_content(raw: &Value) -> String {
    let content_value = raw
        .get("choices")
        .and_then(|c| c.as_array())
        .and_then(|arr| arr.first())
        .and_then(|choice| choice.get("message"))
        .and_then(|msg| msg.get("content"));

    match content_value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(parts)) => parts
            .iter()
            .filter_map(|part| {
                if part.get("type").and_then(|t| t.as_str()) == Some("text") {
                    part.get("text").and_then(|t| t.as_str()).map(|s| s.to_string())
                } else {
                    None
                }
            })
            .collect::<Vec<_>>()
            .join(""),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_message_creation() {
        let user_msg = ChatMessage::user("Hello");
        assert_eq!(user_msg.role, "user");
        assert_eq!(user_msg.content, "Hello");

        let sys_msg = ChatMessage::system("You are helpful");
        assert_eq!(sys_msg.role, "system");
    }

    #[test]
    fn test_extract_content_string() {
        let raw: Value = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"Hello world"}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_content(&raw), "Hello world");
    }

    #[test]
    fn test_extract_content_parts_array() {
        let raw: Value = serde_json::from_str(
            r#"{"choices":[{"message":{"content":[
                {"type":"text","text":"Hello "},
                {"type":"text","text":"world"}
            ]}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_content(&raw), "Hello world");
    }

    #[test]
    fn test_extract_content_missing_is_empty() {
        let raw: Value = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert_eq!(extract_content(&raw), "");

        let raw: Value =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert_eq!(extract_content(&raw), "");
    }

    #[test]
    fn test_request_skips_absent_response_format() {
        let request = ChatRequest {
            model: "m".to_string(),
            messages: vec![ChatMessage::user("hi")],
            max_tokens: None,
            response_format: None,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(!json.contains("response_format"));
        assert!(!json.contains("max_tokens"));
    }
}
