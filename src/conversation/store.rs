// src/conversation/store.rs
// Storage traits consumed by the resolver

use anyhow::Result;
use async_trait::async_trait;

use super::types::{Assistant, Conversation, ObjectRef, Owner, ShareToken, SharedConversation};

/// Ownership filter applied to private conversation lookups.
///
/// Authenticated callers match on user id. Anonymous callers match on their
/// session id, and only conversations with no user attached qualify.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthCondition {
    User(String),
    Session(String),
}

impl AuthCondition {
    /// Whether a conversation owned by `owner` passes this filter
    pub fn matches(&self, owner: &Owner) -> bool {
        match (self, owner) {
            (AuthCondition::User(a), Owner::User(b)) => a == b,
            (AuthCondition::Session(a), Owner::Session(b)) => a == b,
            _ => false,
        }
    }
}

#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Conversation with this id that also satisfies `auth`
    async fn find_owned(&self, id: &ObjectRef, auth: &AuthCondition)
        -> Result<Option<Conversation>>;

    /// Number of conversations with this id, ignoring ownership
    async fn count_by_id(&self, id: &ObjectRef) -> Result<u64>;
}

#[async_trait]
pub trait SharedConversationStore: Send + Sync {
    async fn find_by_token(&self, token: &ShareToken) -> Result<Option<SharedConversation>>;
}

#[async_trait]
pub trait AssistantStore: Send + Sync {
    async fn find_by_id(&self, id: &ObjectRef) -> Result<Option<Assistant>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_condition_ignores_sessions() {
        let auth = AuthCondition::User("alice".into());
        assert!(auth.matches(&Owner::User("alice".into())));
        assert!(!auth.matches(&Owner::User("bob".into())));
        assert!(!auth.matches(&Owner::Session("alice".into())));
    }

    #[test]
    fn test_session_condition_ignores_users() {
        let auth = AuthCondition::Session("s-1".into());
        assert!(auth.matches(&Owner::Session("s-1".into())));
        assert!(!auth.matches(&Owner::Session("s-2".into())));
        assert!(!auth.matches(&Owner::User("s-1".into())));
    }
}
