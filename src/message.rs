//! Conversation messages exchanged between the caller and the pipeline.

use serde::{Deserialize, Serialize};

/// Who authored a [`ChatMessage`].
///
/// Serialized lowercase (`"user"` / `"assistant"`) to match the wire shape
/// expected by generation backends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Input from the person chatting.
    User,
    /// A model-produced reply.
    Assistant,
}

/// A single turn in a conversation.
///
/// Histories are append-only sequences owned by the caller; the pipeline
/// only ever reads the most recent [`crate::prompt::HISTORY_WINDOW`]
/// entries and never mutates them.
///
/// # Examples
///
/// ```
/// use ragchat::message::{ChatMessage, Role};
///
/// let question = ChatMessage::user("What is hybrid search?");
/// let reply = ChatMessage::assistant("A fused lexical + vector ranking.");
/// assert_eq!(question.role, Role::User);
/// assert_eq!(reply.role, Role::Assistant);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Author of the turn.
    pub role: Role,
    /// Text content of the turn.
    pub content: String,
}

impl ChatMessage {
    /// Creates a user-authored message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Creates an assistant-authored message.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    /// Label used when rendering this message into a prompt.
    #[must_use]
    pub fn speaker(&self) -> &'static str {
        match self.role {
            Role::User => "User",
            Role::Assistant => "Assistant",
        }
    }
}
