//! Purge Expired Sessions Use Case

use std::sync::Arc;

use kernel::command::Command;

use crate::application::services::AuthServices;
use crate::application::session_store::SessionStore;
use crate::domain::repository::SessionRepository;
use crate::error::AuthResult;

pub struct PurgeSessionsUseCase<S>
where
    S: SessionRepository,
{
    sessions: SessionStore<S>,
}

impl<S> PurgeSessionsUseCase<S>
where
    S: SessionRepository,
{
    pub fn new(session_repo: Arc<S>, services: &AuthServices) -> Self {
        Self {
            sessions: SessionStore::new(session_repo, services.config.refresh_token_ttl),
        }
    }

    /// Delete every expired session; returns how many were removed
    pub async fn execute(&self, command: Command<()>) -> AuthResult<u64> {
        let deleted = self.sessions.cleanup_expired().await?;
        let metadata = command.metadata();

        tracing::info!(
            correlation_id = %metadata.correlation_id(),
            command_id = %command.id(),
            requested_by = ?metadata.user_id(),
            sessions_deleted = deleted,
            "Cleaned up expired refresh sessions"
        );

        Ok(deleted)
    }
}
