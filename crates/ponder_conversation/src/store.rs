//! The mutation surface the chat engine drives a conversation through.

use std::collections::HashMap;

use tracing::debug;

use crate::{
    conversation::{Conversation, ConversationId},
    error::{Error, Result},
    message::{Message, MessageId},
};

/// Storage operations the chat engine needs while running a turn.
///
/// Implementations own persistence; the engine only ever appends messages,
/// rewrites message content by id, flips the streaming flag, truncates for
/// the edit-and-resend flow, and proposes auto-generated titles. It never
/// reorders or deletes messages by any other means.
///
/// The engine assumes at most one turn is in flight per conversation at a
/// time; serializing submissions is the caller's responsibility.
pub trait ConversationStore: Send {
    /// The ordered messages of a conversation.
    fn messages(&self, conversation: ConversationId) -> Result<Vec<Message>>;

    /// Append a message, returning its id.
    fn append_message(
        &mut self,
        conversation: ConversationId,
        message: Message,
    ) -> Result<MessageId>;

    /// Replace the content of an existing message.
    fn update_message_content(
        &mut self,
        conversation: ConversationId,
        message: MessageId,
        content: &str,
    ) -> Result<()>;

    /// Flip the streaming flag of a message.
    ///
    /// Once a message has been finalized (`streaming = false`), it must never
    /// stream again; implementations reject such transitions.
    fn set_message_streaming(
        &mut self,
        conversation: ConversationId,
        message: MessageId,
        streaming: bool,
    ) -> Result<()>;

    /// Remove every message after the given one, keeping the message itself.
    fn truncate_after(&mut self, conversation: ConversationId, message: MessageId) -> Result<()>;

    /// Set the conversation title, unless the user renamed it manually.
    fn rename_if_auto(&mut self, conversation: ConversationId, title: &str) -> Result<()>;
}

/// In-memory [`ConversationStore`], used by tests and by embedders that keep
/// conversation state in process and persist it elsewhere.
#[derive(Debug, Default)]
pub struct MemoryStore {
    conversations: HashMap<ConversationId, Conversation>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty conversation and return its id.
    pub fn create(&mut self) -> ConversationId {
        let id = ConversationId::new();
        self.conversations.insert(id, Conversation::default());
        id
    }

    /// Insert a rehydrated conversation.
    ///
    /// Any stale streaming flags are cleared: a message that was mid-stream
    /// when state was persisted can never resume.
    pub fn insert(&mut self, id: ConversationId, mut conversation: Conversation) {
        for message in &mut conversation.messages {
            if message.streaming {
                debug!(message = %message.id, "Clearing stale streaming flag.");
                message.streaming = false;
            }
        }

        self.conversations.insert(id, conversation);
    }

    #[must_use]
    pub fn conversation(&self, id: ConversationId) -> Option<&Conversation> {
        self.conversations.get(&id)
    }

    pub fn conversation_mut(&mut self, id: ConversationId) -> Option<&mut Conversation> {
        self.conversations.get_mut(&id)
    }

    fn get_mut(&mut self, id: ConversationId) -> Result<&mut Conversation> {
        self.conversations
            .get_mut(&id)
            .ok_or(Error::UnknownConversation(id))
    }
}

impl ConversationStore for MemoryStore {
    fn messages(&self, conversation: ConversationId) -> Result<Vec<Message>> {
        self.conversations
            .get(&conversation)
            .map(|c| c.messages.clone())
            .ok_or(Error::UnknownConversation(conversation))
    }

    fn append_message(
        &mut self,
        conversation: ConversationId,
        message: Message,
    ) -> Result<MessageId> {
        let conv = self.get_mut(conversation)?;

        if message.streaming && conv.streaming_message().is_some() {
            return Err(Error::TurnInFlight(conversation));
        }

        let id = message.id;
        conv.messages.push(message);
        conv.touch();
        Ok(id)
    }

    fn update_message_content(
        &mut self,
        conversation: ConversationId,
        message: MessageId,
        content: &str,
    ) -> Result<()> {
        let conv = self.get_mut(conversation)?;
        let msg = conv
            .message_mut(message)
            .ok_or(Error::UnknownMessage(message))?;

        msg.content = content.to_owned();
        conv.touch();
        Ok(())
    }

    fn set_message_streaming(
        &mut self,
        conversation: ConversationId,
        message: MessageId,
        streaming: bool,
    ) -> Result<()> {
        let conv = self.get_mut(conversation)?;
        let msg = conv
            .message_mut(message)
            .ok_or(Error::UnknownMessage(message))?;

        if streaming && !msg.streaming {
            return Err(Error::MessageFinalized(message));
        }

        msg.streaming = streaming;
        conv.touch();
        Ok(())
    }

    fn truncate_after(&mut self, conversation: ConversationId, message: MessageId) -> Result<()> {
        let conv = self.get_mut(conversation)?;
        let index = conv
            .messages
            .iter()
            .position(|m| m.id == message)
            .ok_or(Error::UnknownMessage(message))?;

        conv.messages.truncate(index + 1);
        conv.touch();
        Ok(())
    }

    fn rename_if_auto(&mut self, conversation: ConversationId, title: &str) -> Result<()> {
        let conv = self.get_mut(conversation)?;
        if conv.renamed {
            debug!(%conversation, "Skipping auto-title for manually renamed conversation.");
            return Ok(());
        }

        conv.title = Some(title.to_owned());
        conv.touch();
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
