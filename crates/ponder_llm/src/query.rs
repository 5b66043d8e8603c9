//! The provider-agnostic request a turn sends to an LLM backend.

use ponder_conversation::{Message, Role};

/// An ordered message list for one provider call: at most one leading system
/// instruction, followed by alternating conversation turns.
///
/// How the system instruction and role names map onto the wire is
/// adapter-local; see the individual providers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatQuery {
    pub messages: Vec<ChatMessage>,
}

impl ChatQuery {
    #[must_use]
    pub fn with_system(mut self, content: impl Into<String>) -> Self {
        self.messages.insert(0, ChatMessage {
            role: Role::System,
            content: content.into(),
        });
        self
    }

    /// Append prior conversation turns. System messages are skipped; the
    /// system instruction travels through [`with_system`] only.
    ///
    /// [`with_system`]: Self::with_system
    #[must_use]
    pub fn with_history(mut self, history: &[Message]) -> Self {
        self.messages
            .extend(history.iter().filter(|m| m.role != Role::System).map(|m| {
                ChatMessage {
                    role: m.role,
                    content: m.content.clone(),
                }
            }));
        self
    }

    #[must_use]
    pub fn with_user(mut self, content: impl Into<String>) -> Self {
        self.messages.push(ChatMessage {
            role: Role::User,
            content: content.into(),
        });
        self
    }

    /// The system instruction, if any.
    #[must_use]
    pub fn system(&self) -> Option<&str> {
        self.messages
            .iter()
            .find(|m| m.role == Role::System)
            .map(|m| m.content.as_str())
    }

    /// The conversation turns, system instruction excluded.
    pub fn conversation(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter().filter(|m| m.role != Role::System)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}
