// src/conversation/resolver.rs
// Turns an opaque identifier plus caller identity into an authorized view

use std::sync::Arc;
use tracing::{debug, warn};

use super::store::{AssistantStore, AuthCondition, ConversationStore, SharedConversationStore};
use super::types::{
    Assistant, Conversation, ConversationId, ConversationView, ObjectRef, ShareToken,
    SharedConversation,
};

pub const FORBIDDEN_MESSAGE: &str = "You don't have access to this conversation. \
     If someone gave you this link, ask them to use the 'share' feature instead.";

/// Why a conversation could not be resolved
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("Invalid conversation ID format")]
    InvalidIdentifier,

    #[error("{}", FORBIDDEN_MESSAGE)]
    Forbidden,

    #[error("Conversation not found")]
    NotFound,

    #[error("Storage failure: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ResolveError {
    pub fn status_code(&self) -> u16 {
        match self {
            ResolveError::InvalidIdentifier => 400,
            ResolveError::Forbidden => 403,
            ResolveError::NotFound => 404,
            ResolveError::Internal(_) => 500,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ResolveError::InvalidIdentifier => "invalid_identifier",
            ResolveError::Forbidden => "forbidden",
            ResolveError::NotFound => "not_found",
            ResolveError::Internal(_) => "internal",
        }
    }
}

pub type ResolveResult<T> = Result<T, ResolveError>;

/// Fields shared by private and shared conversations before assistant lookup
struct Resolved {
    title: String,
    model: String,
    preprompt: Option<String>,
    assistant_id: Option<String>,
    messages: Vec<super::types::Message>,
    shared: bool,
}

impl From<Conversation> for Resolved {
    fn from(c: Conversation) -> Self {
        Self {
            title: c.title,
            model: c.model,
            preprompt: c.preprompt,
            assistant_id: c.assistant_id,
            messages: c.messages,
            shared: false,
        }
    }
}

impl From<SharedConversation> for Resolved {
    fn from(c: SharedConversation) -> Self {
        Self {
            title: c.title,
            model: c.model,
            preprompt: c.preprompt,
            assistant_id: c.assistant_id,
            messages: c.messages,
            shared: true,
        }
    }
}

pub struct ConversationResolver {
    conversations: Arc<dyn ConversationStore>,
    shared: Arc<dyn SharedConversationStore>,
    assistants: Arc<dyn AssistantStore>,
}

impl ConversationResolver {
    pub fn new(
        conversations: Arc<dyn ConversationStore>,
        shared: Arc<dyn SharedConversationStore>,
        assistants: Arc<dyn AssistantStore>,
    ) -> Self {
        Self {
            conversations,
            shared,
            assistants,
        }
    }

    /// Resolve `raw_id` for the caller described by `auth`
    pub async fn resolve(&self, raw_id: &str, auth: &AuthCondition) -> ResolveResult<ConversationView> {
        let resolved: Resolved = match ConversationId::classify(raw_id) {
            Some(ConversationId::Shared(token)) => self.load_shared(&token).await?.into(),
            Some(ConversationId::Owned(id)) => self.load_owned(&id, auth).await?.into(),
            None => return Err(ResolveError::InvalidIdentifier),
        };

        let assistant = match resolved.assistant_id.as_deref() {
            Some(assistant_id) => self.load_assistant(assistant_id).await,
            None => None,
        };

        Ok(ConversationView {
            messages: resolved.messages,
            title: resolved.title,
            model: resolved.model,
            preprompt: resolved.preprompt,
            assistant,
            shared: resolved.shared,
        })
    }

    async fn load_shared(&self, token: &ShareToken) -> ResolveResult<SharedConversation> {
        debug!(token = %token, "Resolving shared conversation");
        self.shared
            .find_by_token(token)
            .await?
            .ok_or(ResolveError::NotFound)
    }

    async fn load_owned(&self, id: &ObjectRef, auth: &AuthCondition) -> ResolveResult<Conversation> {
        if let Some(conversation) = self.conversations.find_owned(id, auth).await? {
            return Ok(conversation);
        }

        // Missed under the ownership filter: find out whether it exists at all
        if self.conversations.count_by_id(id).await? > 0 {
            debug!(id = %id, "Conversation exists but caller is not the owner");
            Err(ResolveError::Forbidden)
        } else {
            Err(ResolveError::NotFound)
        }
    }

    /// Never fails the view: anything short of a found record embeds `None`.
    // TODO: decide whether a dangling assistant reference deserves its own error kind
    async fn load_assistant(&self, raw_id: &str) -> Option<Assistant> {
        let Some(id) = ObjectRef::parse(raw_id) else {
            warn!(assistant_id = raw_id, "Malformed assistant reference");
            return None;
        };

        match self.assistants.find_by_id(&id).await {
            Ok(Some(assistant)) => Some(assistant),
            Ok(None) => {
                warn!(assistant_id = %id, "Linked assistant not found");
                None
            }
            Err(e) => {
                warn!(assistant_id = %id, "Assistant lookup failed: {:#}", e);
                None
            }
        }
    }
}
