//! Session-based auth gate for the data-management endpoints.

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use sqlx::PgPool;
use tracing::debug;

use crate::errors::AppError;
use crate::models::user::User;
use crate::state::AppState;

const SESSION_COOKIE: &str = "session";

/// Resolves session tokens to users.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn user_for_token(&self, token: &str) -> Result<Option<User>, AppError>;
}

/// Sessions stored in Postgres, joined against `users`. Expired sessions never match.
#[derive(Clone)]
pub struct PgSessionStore {
    pool: PgPool,
}

impl PgSessionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PgSessionStore {
    async fn user_for_token(&self, token: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT u.id, u.external_id, u.email, u.tier, u.created_at
            FROM sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.token = $1 AND s.expires_at > NOW()
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}

/// The signed-in user. Rejects with 401 and a sign-in redirect target otherwise.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let Some(token) = session_token(parts) else {
            debug!("Request without session token");
            return Err(AppError::wipe_sign_in());
        };

        match state.sessions.user_for_token(&token).await? {
            Some(user) => Ok(CurrentUser(user)),
            None => {
                debug!("Unknown or expired session token");
                Err(AppError::wipe_sign_in())
            }
        }
    }
}

/// Bearer token first, then the session cookie.
fn session_token(parts: &Parts) -> Option<String> {
    let bearer = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty());
    if let Some(token) = bearer {
        return Some(token.to_string());
    }

    parts
        .headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}
