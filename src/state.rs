// src/state.rs
// Shared application state handed to every handler

use sqlx::SqlitePool;
use std::sync::Arc;

use crate::conversation::{ConversationResolver, SqliteConversationStore};

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub resolver: Arc<ConversationResolver>,
}

impl AppState {
    /// Resolver backed by SQLite for all three stores
    pub fn new(db: SqlitePool) -> Self {
        let store = Arc::new(SqliteConversationStore::new(db.clone()));
        let resolver = Arc::new(ConversationResolver::new(
            store.clone(),
            store.clone(),
            store,
        ));
        Self { db, resolver }
    }
}
