// src/api/auth.rs
// Caller identity, as established by the upstream auth layer

use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, header, request::Parts};
use std::convert::Infallible;
use tracing::debug;

use crate::conversation::AuthCondition;

/// Header set by the authenticating proxy for signed-in users
pub const USER_HEADER: &str = "x-user-id";

/// Cookie carrying the anonymous session id
pub const SESSION_COOKIE: &str = "session";

/// Who is making the request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    User(String),
    Anonymous { session_id: String },
}

impl Caller {
    pub fn auth_condition(&self) -> AuthCondition {
        match self {
            Caller::User(id) => AuthCondition::User(id.clone()),
            Caller::Anonymous { session_id } => AuthCondition::Session(session_id.clone()),
        }
    }

    fn from_headers(headers: &HeaderMap) -> Self {
        if let Some(user) = header_value(headers, USER_HEADER) {
            return Caller::User(user);
        }
        match session_cookie(headers) {
            Some(session_id) => Caller::Anonymous { session_id },
            None => {
                // No session yet, so nothing can be owned by it
                let session_id = uuid::Uuid::new_v4().to_string();
                debug!("Request without session cookie, using ephemeral session");
                Caller::Anonymous { session_id }
            }
        }
    }
}

fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Caller::from_headers(&parts.headers))
    }
}
