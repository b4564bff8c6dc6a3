use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::MessageRole;

/// One turn of the pharmacist chat. Session-scoped; the conversation is
/// never persisted across launches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: MessageRole,
    pub text: String,
    /// Base64 JPEG attached to a user turn, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Unix milliseconds.
    pub timestamp: i64,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>, image: Option<String>) -> Self {
        Self::stamp(MessageRole::User, text.into(), image)
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::stamp(MessageRole::Model, text.into(), None)
    }

    fn stamp(role: MessageRole, text: String, image: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            text,
            image,
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}
