use crate::{conversation::ConversationId, message::MessageId};

pub(crate) type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown conversation: {0}")]
    UnknownConversation(ConversationId),

    #[error("unknown message: {0}")]
    UnknownMessage(MessageId),

    #[error("conversation {0} already has a turn in flight")]
    TurnInFlight(ConversationId),

    #[error("message {0} is finalized and cannot stream again")]
    MessageFinalized(MessageId),

    #[error("invalid id format: {0}")]
    InvalidIdFormat(String),
}

#[cfg(test)]
impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        if std::mem::discriminant(self) != std::mem::discriminant(other) {
            return false;
        }

        // Good enough for testing purposes
        format!("{self:?}") == format!("{other:?}")
    }
}
