//! Session Store
//!
//! Persists refresh sessions with their absolute expiry. Expiry is never
//! judged here; the refresh protocol does that.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::domain::entity::session::Session;
use crate::domain::repository::SessionRepository;
use crate::domain::value_object::UserId;
use crate::error::{AuthError, AuthResult};

pub struct SessionStore<S>
where
    S: SessionRepository,
{
    repo: Arc<S>,
    ttl: Duration,
}

impl<S> SessionStore<S>
where
    S: SessionRepository,
{
    pub fn new(repo: Arc<S>, ttl: Duration) -> Self {
        Self { repo, ttl }
    }

    /// Insert a new session expiring one refresh TTL from now
    pub async fn save(&self, token_hash: String, user_id: UserId) -> AuthResult<Session> {
        let ttl = chrono::Duration::from_std(self.ttl)
            .map_err(|e| AuthError::Configuration(format!("Invalid refresh token TTL: {e}")))?;

        let session = Session::new(token_hash, user_id, ttl, Utc::now());
        self.repo.create(&session).await?;

        tracing::debug!(
            session_id = %session.session_id,
            user_id = %session.user_id,
            "Refresh session stored"
        );

        Ok(session)
    }

    pub async fn find_by_hash(&self, token_hash: &str) -> AuthResult<Option<Session>> {
        self.repo.find_by_hash(token_hash).await
    }

    /// Idempotent; returns how many sessions were removed
    pub async fn delete_by_hash(&self, token_hash: &str) -> AuthResult<u64> {
        self.repo.delete_by_hash(token_hash).await
    }

    pub async fn cleanup_expired(&self) -> AuthResult<u64> {
        self.repo.cleanup_expired(Utc::now()).await
    }
}
