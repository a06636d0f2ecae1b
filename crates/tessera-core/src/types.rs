//! Conversation model produced by the (external) extraction step

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::InputError;

/// Who produced a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Speaker {
    User,
    Assistant,
    System,
    TextSnippet,
}

impl Speaker {
    pub fn as_str(&self) -> &'static str {
        match self {
            Speaker::User => "user",
            Speaker::Assistant => "assistant",
            Speaker::System => "system",
            Speaker::TextSnippet => "text-snippet",
        }
    }
}

impl std::fmt::Display for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Urgency attached to inferred actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

/// One turn of raw content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Speaker,
    pub content: String,
    #[serde(default)]
    pub index: usize,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn new(role: Speaker, content: impl Into<String>, index: usize) -> Self {
        Self {
            role,
            content: content.into(),
            index,
            timestamp: Utc::now(),
        }
    }
}

/// A full extraction of one conversation. Versioning identity is `url`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawConversation {
    pub platform: String,
    #[serde(default)]
    pub conversation_id: Option<String>,
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default = "Utc::now")]
    pub extracted_at: DateTime<Utc>,
    pub message_count: usize,
    pub messages: Vec<Message>,
}

impl RawConversation {
    /// Build a conversation, deriving `messageCount` and re-indexing messages
    pub fn new(
        platform: impl Into<String>,
        url: impl Into<String>,
        title: impl Into<String>,
        messages: Vec<Message>,
    ) -> Self {
        let messages: Vec<Message> = messages
            .into_iter()
            .enumerate()
            .map(|(index, m)| Message { index, ..m })
            .collect();
        Self {
            platform: platform.into(),
            conversation_id: None,
            url: url.into(),
            title: title.into(),
            extracted_at: Utc::now(),
            message_count: messages.len(),
            messages,
        }
    }

    /// Wrap a selected text fragment as a one-message conversation
    pub fn snippet(text: impl Into<String>, url: impl Into<String>, title: impl Into<String>) -> Self {
        let now = Utc::now();
        let mut conversation = Self::new(
            "text-selection",
            url,
            title,
            vec![Message::new(Speaker::TextSnippet, text, 0)],
        );
        conversation.conversation_id = Some(format!("snippet-{}", now.timestamp_millis()));
        conversation
    }

    pub fn with_conversation_id(mut self, id: impl Into<String>) -> Self {
        self.conversation_id = Some(id.into());
        self
    }

    /// Check the invariants callers must uphold before capture or compression
    pub fn validate(&self) -> Result<(), InputError> {
        if self.url.trim().is_empty() {
            return Err(InputError::MissingField("url"));
        }
        if self.messages.is_empty() {
            return Err(InputError::NoContent);
        }
        if self.message_count != self.messages.len() {
            return Err(InputError::CountMismatch {
                declared: self.message_count,
                actual: self.messages.len(),
            });
        }
        if self.messages.iter().all(|m| m.content.trim().is_empty()) {
            return Err(InputError::NoContent);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RawConversation {
        RawConversation::new(
            "Claude",
            "https://claude.ai/chat/abc",
            "Auth bug",
            vec![
                Message::new(Speaker::User, "Fix this bug", 7),
                Message::new(Speaker::Assistant, "Done.", 9),
            ],
        )
    }

    #[test]
    fn test_new_derives_count_and_indices() {
        let c = sample();
        assert_eq!(c.message_count, 2);
        assert_eq!(c.messages[0].index, 0);
        assert_eq!(c.messages[1].index, 1);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty() {
        let c = RawConversation::new("Claude", "https://claude.ai/chat/abc", "", vec![]);
        assert!(matches!(c.validate(), Err(InputError::NoContent)));
    }

    #[test]
    fn test_validate_rejects_blank_messages() {
        let c = RawConversation::new(
            "Claude",
            "https://claude.ai/chat/abc",
            "",
            vec![Message::new(Speaker::User, "   ", 0)],
        );
        assert!(matches!(c.validate(), Err(InputError::NoContent)));
    }

    #[test]
    fn test_validate_rejects_count_mismatch() {
        let mut c = sample();
        c.message_count = 5;
        match c.validate() {
            Err(InputError::CountMismatch { declared, actual }) => {
                assert_eq!(declared, 5);
                assert_eq!(actual, 2);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_missing_url() {
        let mut c = sample();
        c.url = String::new();
        assert!(matches!(c.validate(), Err(InputError::MissingField("url"))));
    }

    #[test]
    fn test_wire_format_is_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("messageCount").is_some());
        assert!(json.get("extractedAt").is_some());
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn test_snippet_role() {
        let c = RawConversation::snippet("some text", "https://example.com", "Example");
        assert_eq!(c.platform, "text-selection");
        assert_eq!(c.messages[0].role, Speaker::TextSnippet);
        assert!(c.conversation_id.unwrap().starts_with("snippet-"));
        let json = serde_json::to_value(&c.messages[0]).unwrap();
        assert_eq!(json["role"], "text-snippet");
    }

    #[test]
    fn test_deserialize_minimal_message() {
        let json = r#"{"platform":"ChatGPT","url":"https://chatgpt.com/c/1","messageCount":1,
            "messages":[{"role":"assistant","content":"hi"}]}"#;
        let c: RawConversation = serde_json::from_str(json).unwrap();
        assert_eq!(c.messages[0].index, 0);
        assert!(c.conversation_id.is_none());
        assert!(c.validate().is_ok());
    }
}
