// src/conversation/types.rs
// Conversation data model and identifier classification

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of a public share token
pub const SHARE_TOKEN_LEN: usize = 7;

/// Length of an object reference (12 bytes, hex encoded)
pub const OBJECT_REF_LEN: usize = 24;

/// Who authored a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A stored chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub from: Role,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Message {
    pub fn new(from: Role, content: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            from,
            content: content.into(),
            created_at: Some(now),
            updated_at: Some(now),
        }
    }
}

/// A message as sent to a generative backend: author and text only
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub from: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            from: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            from: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Owner of a private conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Owner {
    User(String),
    /// Anonymous browser session; never has a user attached
    Session(String),
}

/// A private conversation, visible only to its owner
#[derive(Debug, Clone, PartialEq)]
pub struct Conversation {
    pub id: ObjectRef,
    pub owner: Owner,
    pub title: String,
    pub model: String,
    pub preprompt: Option<String>,
    pub assistant_id: Option<String>,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Immutable public snapshot of a conversation
#[derive(Debug, Clone, PartialEq)]
pub struct SharedConversation {
    pub id: ShareToken,
    pub title: String,
    pub model: String,
    pub preprompt: Option<String>,
    pub assistant_id: Option<String>,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Assistant linked to a conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assistant {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub model_id: String,
    pub preprompt: String,
    pub avatar: Option<String>,
    pub created_by_id: Option<String>,
    #[serde(default)]
    pub exemplars: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// What a caller gets back from a successful resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationView {
    pub messages: Vec<Message>,
    pub title: String,
    pub model: String,
    pub preprompt: Option<String>,
    pub assistant: Option<Assistant>,
    /// True iff the view came from a shared snapshot
    pub shared: bool,
}

// ============================================================================
// Identifiers
// ============================================================================

/// Public share token (exactly 7 characters)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShareToken(String);

impl ShareToken {
    pub fn parse(raw: &str) -> Option<Self> {
        (raw.chars().count() == SHARE_TOKEN_LEN).then(|| Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ShareToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonical 24-hex-character identifier of an owned record.
/// Stored lowercase so lookups are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectRef(String);

impl ObjectRef {
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.len() == OBJECT_REF_LEN && raw.bytes().all(|b| b.is_ascii_hexdigit()) {
            Some(Self(raw.to_ascii_lowercase()))
        } else {
            None
        }
    }

    /// Fresh random reference, for seeding and tests
    pub fn generate() -> Self {
        let hex = uuid::Uuid::new_v4().simple().to_string();
        Self(hex[..OBJECT_REF_LEN].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An identifier after shape classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationId {
    Shared(ShareToken),
    Owned(ObjectRef),
}

impl ConversationId {
    /// Classify by shape. Anything of share-token length is a share token;
    /// everything else must be an object reference or it is rejected.
    pub fn classify(raw: &str) -> Option<Self> {
        if let Some(token) = ShareToken::parse(raw) {
            return Some(Self::Shared(token));
        }
        ObjectRef::parse(raw).map(Self::Owned)
    }
}
