// src/api/mod.rs

pub mod auth;
pub mod error;
pub mod handlers;
pub mod router;

pub use auth::Caller;
pub use error::{ApiError, ApiResult};
pub use router::create_router;
