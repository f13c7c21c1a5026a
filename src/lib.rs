// src/lib.rs

pub mod api;
pub mod config;
pub mod conversation;
pub mod db;
pub mod llm;
pub mod state;
pub mod summarize;

pub use state::AppState;
