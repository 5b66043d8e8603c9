//! Defines the Message structure.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::Error;

/// The author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One turn in a conversation.
///
/// Assistant messages created as placeholders start out with empty content
/// and `streaming = true`; the engine appends to their content until the turn
/// finalizes, at which point `streaming` flips to `false` and stays there.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub role: Role,
    pub content: String,

    /// Creation time, monotonic within a conversation.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,

    /// `true` while content is still being appended.
    #[serde(default, skip_serializing_if = "is_false")]
    pub streaming: bool,
}

#[expect(clippy::trivially_copy_pass_by_ref)]
fn is_false(streaming: &bool) -> bool {
    !streaming
}

impl Message {
    fn new(role: Role, content: impl Into<String>, streaming: bool) -> Self {
        Self {
            id: MessageId::new(),
            role,
            content: content.into(),
            timestamp: OffsetDateTime::now_utc(),
            streaming,
        }
    }

    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content, false)
    }

    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content, false)
    }

    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content, false)
    }

    /// An empty assistant message awaiting streamed content.
    #[must_use]
    pub fn assistant_placeholder() -> Self {
        Self::new(Role::Assistant, String::new(), true)
    }
}

/// ID wrapper for Message
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct MessageId(Uuid);

impl MessageId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for MessageId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Uuid>()
            .map(Self)
            .map_err(|_| Error::InvalidIdFormat(s.to_owned()))
    }
}
