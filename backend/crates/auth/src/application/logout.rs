//! Logout Use Case
//!
//! Deletes the refresh session behind the presented cookie and clears both
//! auth cookies.

use std::sync::Arc;

use axum::http::HeaderMap;
use kernel::command::Command;
use platform::hashing::SecretString;

use crate::application::services::AuthServices;
use crate::application::session_store::SessionStore;
use crate::domain::repository::SessionRepository;
use crate::error::AuthResult;

/// Logout input
#[derive(Debug)]
pub struct LogoutInput {
    pub refresh_token: Option<SecretString>,
}

/// Logout use case
pub struct LogoutUseCase<S>
where
    S: SessionRepository,
{
    sessions: SessionStore<S>,
    services: AuthServices,
}

impl<S> LogoutUseCase<S>
where
    S: SessionRepository,
{
    pub fn new(session_repo: Arc<S>, services: AuthServices) -> Self {
        let sessions = SessionStore::new(session_repo, services.config.refresh_token_ttl);
        Self { sessions, services }
    }

    /// Cookies are cleared even when deleting the session fails
    pub async fn execute(
        &self,
        command: Command<LogoutInput>,
        response: &mut HeaderMap,
    ) -> AuthResult<()> {
        let (command_id, metadata, input) = command.into_parts();

        self.services.cookies.clear(response);

        if let Some(token) = input.refresh_token.filter(|t| !t.is_empty()) {
            let token_hash = self.services.refresh_token_hash(&token).await?;
            self.sessions.delete_by_hash(&token_hash).await?;
        }

        tracing::info!(
            correlation_id = %metadata.correlation_id(),
            %command_id,
            "User logged out"
        );

        Ok(())
    }
}
