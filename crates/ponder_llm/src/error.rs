use crate::provider::ProviderId;

pub(crate) type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no API key configured for provider: {0}")]
    MissingApiKey(ProviderId),

    #[error("unsupported provider: {0}")]
    UnknownProvider(String),

    #[error("{0}")]
    Client(#[from] ponder_openai::Error),

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error (status {}): {}", .status, .message)]
    Api { status: u16, message: String },

    #[error("invalid provider response: {0}")]
    InvalidResponse(String),

    #[error("Conversation error: {0}")]
    Conversation(#[from] ponder_conversation::Error),

    #[error("turn must start from a user message")]
    MissingUserMessage,
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
