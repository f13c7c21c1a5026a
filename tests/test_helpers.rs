// tests/test_helpers.rs
#![allow(dead_code)]

use chrono::Utc;
use sqlx::sqlite::SqlitePoolOptions;
use std::path::Path;

use convo::{
    AppState,
    conversation::{
        Assistant, Conversation, Message, ObjectRef, Owner, Role, ShareToken,
        SharedConversation, SqliteConversationStore,
    },
    db,
};

/// In-memory SQLite with migrations applied, plus a store over the same pool
pub async fn create_test_state() -> (AppState, SqliteConversationStore) {
    // A single connection keeps every query on the same in-memory database
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("create in-memory sqlite");

    let migrations = Path::new(env!("CARGO_MANIFEST_DIR")).join("migrations");
    db::run_migrations(&pool, &migrations)
        .await
        .expect("run migrations");

    let store = SqliteConversationStore::new(pool.clone());
    (AppState::new(pool), store)
}

pub fn conversation(owner: Owner, assistant_id: Option<&str>) -> Conversation {
    let now = Utc::now();
    Conversation {
        id: ObjectRef::generate(),
        owner,
        title: "🍰 Cheesecake recipe".to_string(),
        model: "mistral-7b".to_string(),
        preprompt: Some("Be concise.".to_string()),
        assistant_id: assistant_id.map(str::to_string),
        messages: vec![
            Message::new(Role::User, "How to make a great cheesecake?"),
            Message::new(Role::Assistant, "Start with room temperature cream cheese."),
        ],
        created_at: now,
        updated_at: now,
    }
}

pub fn shared_conversation(token: &str) -> SharedConversation {
    let now = Utc::now();
    SharedConversation {
        id: ShareToken::parse(token).expect("7 character token"),
        title: "📰 Latest news".to_string(),
        model: "mistral-7b".to_string(),
        preprompt: None,
        assistant_id: None,
        messages: vec![Message::new(Role::User, "What are the latest news?")],
        created_at: now,
        updated_at: now,
    }
}

pub fn assistant(id: &ObjectRef) -> Assistant {
    let now = Utc::now();
    Assistant {
        id: id.to_string(),
        name: "Chef".to_string(),
        description: Some("Cooking helper".to_string()),
        model_id: "mistral-7b".to_string(),
        preprompt: "You are a chef.".to_string(),
        avatar: None,
        created_by_id: Some("alice".to_string()),
        exemplars: vec![],
        created_at: now,
        updated_at: now,
    }
}
