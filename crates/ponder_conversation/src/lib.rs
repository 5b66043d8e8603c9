pub mod conversation;
pub mod error;
pub mod message;
pub mod store;

pub use conversation::{Conversation, ConversationId};
pub use error::Error;
pub use message::{Message, MessageId, Role};
pub use store::{ConversationStore, MemoryStore};
