//! Value records accumulated by a notification session.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

/// A generated notification candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Notification text offered to the admin.
    pub text: String,

    /// Topic version that was current when the suggestion was produced.
    pub topic_version: i32,
}

impl Suggestion {
    pub fn new(text: impl Into<String>, topic_version: i32) -> Self {
        Self {
            text: text.into(),
            topic_version,
        }
    }
}

/// Author of a conversation entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
    System,
}

/// One entry of a session's conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ConversationMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Feedback left by an admin, tagged with the topic version it applies to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub timestamp: Timestamp,
    pub feedback: String,
    pub topic_version: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_role_serializes_lowercase() {
        let json = serde_json::to_value(ConversationMessage::user("hi")).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["content"], "hi");
    }

    #[test]
    fn suggestion_serializes_as_object() {
        let json = serde_json::to_value(Suggestion::new("Flash sale today", 2)).unwrap();
        assert_eq!(json["text"], "Flash sale today");
        assert_eq!(json["topic_version"], 2);
    }
}
