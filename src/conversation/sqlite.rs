// src/conversation/sqlite.rs
// SQLite-backed conversation, shared conversation and assistant storage

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePool;
use sqlx::types::Json;
use tracing::debug;

use super::store::{AssistantStore, AuthCondition, ConversationStore, SharedConversationStore};
use super::types::{
    Assistant, Conversation, Message, ObjectRef, Owner, ShareToken, SharedConversation,
};

const CONVERSATION_COLUMNS: &str = "id, user_id, session_id, title, model, preprompt, \
     assistant_id, messages, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct ConversationRow {
    id: String,
    user_id: Option<String>,
    session_id: Option<String>,
    title: String,
    model: String,
    preprompt: Option<String>,
    assistant_id: Option<String>,
    messages: Json<Vec<Message>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ConversationRow> for Conversation {
    type Error = anyhow::Error;

    fn try_from(row: ConversationRow) -> Result<Self> {
        let id = ObjectRef::parse(&row.id)
            .ok_or_else(|| anyhow!("Stored conversation has malformed id '{}'", row.id))?;
        let owner = match (row.user_id, row.session_id) {
            (Some(user), _) => Owner::User(user),
            (None, Some(session)) => Owner::Session(session),
            (None, None) => return Err(anyhow!("Conversation {} has no owner", id)),
        };
        Ok(Conversation {
            id,
            owner,
            title: row.title,
            model: row.model,
            preprompt: row.preprompt,
            assistant_id: row.assistant_id,
            messages: row.messages.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SharedConversationRow {
    id: String,
    title: String,
    model: String,
    preprompt: Option<String>,
    assistant_id: Option<String>,
    messages: Json<Vec<Message>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<SharedConversationRow> for SharedConversation {
    type Error = anyhow::Error;

    fn try_from(row: SharedConversationRow) -> Result<Self> {
        let id = ShareToken::parse(&row.id)
            .ok_or_else(|| anyhow!("Stored share token '{}' has wrong length", row.id))?;
        Ok(SharedConversation {
            id,
            title: row.title,
            model: row.model,
            preprompt: row.preprompt,
            assistant_id: row.assistant_id,
            messages: row.messages.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct AssistantRow {
    id: String,
    name: String,
    description: Option<String>,
    model_id: String,
    preprompt: String,
    avatar: Option<String>,
    created_by_id: Option<String>,
    exemplars: Json<Vec<String>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<AssistantRow> for Assistant {
    fn from(row: AssistantRow) -> Self {
        Assistant {
            id: row.id,
            name: row.name,
            description: row.description,
            model_id: row.model_id,
            preprompt: row.preprompt,
            avatar: row.avatar,
            created_by_id: row.created_by_id,
            exemplars: row.exemplars.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// All three stores over one pool
#[derive(Clone)]
pub struct SqliteConversationStore {
    pool: SqlitePool,
}

impl SqliteConversationStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert_conversation(&self, conversation: &Conversation) -> Result<()> {
        let (user_id, session_id) = match &conversation.owner {
            Owner::User(user) => (Some(user.as_str()), None),
            Owner::Session(session) => (None, Some(session.as_str())),
        };

        sqlx::query(
            r#"INSERT INTO conversations
               (id, user_id, session_id, title, model, preprompt, assistant_id, messages, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(conversation.id.as_str())
        .bind(user_id)
        .bind(session_id)
        .bind(&conversation.title)
        .bind(&conversation.model)
        .bind(&conversation.preprompt)
        .bind(&conversation.assistant_id)
        .bind(Json(&conversation.messages))
        .bind(conversation.created_at)
        .bind(conversation.updated_at)
        .execute(&self.pool)
        .await?;

        debug!(id = %conversation.id, "Inserted conversation");
        Ok(())
    }

    pub async fn insert_shared_conversation(&self, shared: &SharedConversation) -> Result<()> {
        sqlx::query(
            r#"INSERT INTO shared_conversations
               (id, title, model, preprompt, assistant_id, messages, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(shared.id.as_str())
        .bind(&shared.title)
        .bind(&shared.model)
        .bind(&shared.preprompt)
        .bind(&shared.assistant_id)
        .bind(Json(&shared.messages))
        .bind(shared.created_at)
        .bind(shared.updated_at)
        .execute(&self.pool)
        .await?;

        debug!(id = %shared.id, "Inserted shared conversation");
        Ok(())
    }

    pub async fn insert_assistant(&self, assistant: &Assistant) -> Result<()> {
        let id = ObjectRef::parse(&assistant.id)
            .ok_or_else(|| anyhow!("Assistant id '{}' is not an object reference", assistant.id))?;

        sqlx::query(
            r#"INSERT INTO assistants
               (id, name, description, model_id, preprompt, avatar, created_by_id, exemplars, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(id.as_str())
        .bind(&assistant.name)
        .bind(&assistant.description)
        .bind(&assistant.model_id)
        .bind(&assistant.preprompt)
        .bind(&assistant.avatar)
        .bind(&assistant.created_by_id)
        .bind(Json(&assistant.exemplars))
        .bind(assistant.created_at)
        .bind(assistant.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl ConversationStore for SqliteConversationStore {
    async fn find_owned(
        &self,
        id: &ObjectRef,
        auth: &AuthCondition,
    ) -> Result<Option<Conversation>> {
        let (predicate, owner_key) = match auth {
            AuthCondition::User(user) => ("user_id = ?", user.as_str()),
            AuthCondition::Session(session) => ("session_id = ? AND user_id IS NULL", session.as_str()),
        };
        let sql = format!(
            "SELECT {CONVERSATION_COLUMNS} FROM conversations WHERE id = ? AND {predicate}"
        );

        let row: Option<ConversationRow> = sqlx::query_as(&sql)
            .bind(id.as_str())
            .bind(owner_key)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Conversation::try_from).transpose()
    }

    async fn count_by_id(&self, id: &ObjectRef) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM conversations WHERE id = ?")
            .bind(id.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }
}

#[async_trait]
impl SharedConversationStore for SqliteConversationStore {
    async fn find_by_token(&self, token: &ShareToken) -> Result<Option<SharedConversation>> {
        let row: Option<SharedConversationRow> = sqlx::query_as(
            r#"SELECT id, title, model, preprompt, assistant_id, messages, created_at, updated_at
               FROM shared_conversations
               WHERE id = ?"#,
        )
        .bind(token.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(SharedConversation::try_from).transpose()
    }
}

#[async_trait]
impl AssistantStore for SqliteConversationStore {
    async fn find_by_id(&self, id: &ObjectRef) -> Result<Option<Assistant>> {
        let row: Option<AssistantRow> = sqlx::query_as(
            r#"SELECT id, name, description, model_id, preprompt, avatar, created_by_id,
                      exemplars, created_at, updated_at
               FROM assistants
               WHERE id = ?"#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Assistant::from))
    }
}
