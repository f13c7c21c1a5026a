//! Conversation retrieval under owner/share visibility rules
//!
//! Identifiers come in two disjoint shapes. A 7 character share token names a
//! public snapshot readable by anyone; a 24 hex character object reference names a
//! private conversation readable only by its owner. [`ConversationResolver`] picks
//! the store by shape, enforces ownership, and reports a typed [`ResolveError`].

pub mod resolver;
pub mod sqlite;
pub mod store;
pub mod types;

pub use resolver::{ConversationResolver, ResolveError, ResolveResult, FORBIDDEN_MESSAGE};
pub use sqlite::SqliteConversationStore;
pub use store::{AssistantStore, AuthCondition, ConversationStore, SharedConversationStore};
pub use types::{
    Assistant, ChatTurn, Conversation, ConversationId, ConversationView, Message, ObjectRef,
    Owner, Role, ShareToken, SharedConversation,
};
