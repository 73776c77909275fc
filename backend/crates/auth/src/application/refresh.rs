//! Refresh Use Case
//!
//! Exchanges the refresh cookie for a fresh access token. A session that has
//! reached its expiry is deleted on discovery.

use std::sync::Arc;

use axum::http::HeaderMap;
use chrono::Utc;
use kernel::command::Command;
use platform::crypto::random_token;
use platform::hashing::SecretString;

use crate::application::config::RefreshRotation;
use crate::application::login::REFRESH_TOKEN_BYTES;
use crate::application::services::AuthServices;
use crate::application::session_store::SessionStore;
use crate::domain::entity::principal::Principal;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::error::{AuthError, AuthResult};

/// Refresh input
#[derive(Debug)]
pub struct RefreshInput {
    /// Value of the refresh cookie, if the client sent one
    pub refresh_token: Option<SecretString>,
}

/// Refresh use case
pub struct RefreshUseCase<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    user_repo: Arc<U>,
    sessions: SessionStore<S>,
    services: AuthServices,
}

impl<U, S> RefreshUseCase<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    pub fn new(user_repo: Arc<U>, session_repo: Arc<S>, services: AuthServices) -> Self {
        let sessions = SessionStore::new(session_repo, services.config.refresh_token_ttl);
        Self {
            user_repo,
            sessions,
            services,
        }
    }

    pub async fn execute(
        &self,
        command: Command<RefreshInput>,
        response: &mut HeaderMap,
    ) -> AuthResult<Principal> {
        let (command_id, metadata, input) = command.into_parts();
        let correlation_id = metadata.correlation_id();

        let presented = input
            .refresh_token
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::RefreshTokenMissing)?;

        // Forged, rotated-away and deleted tokens all end here alike
        let token_hash = self.services.refresh_token_hash(&presented).await?;
        let Some(session) = self.sessions.find_by_hash(&token_hash).await? else {
            tracing::debug!(
                %correlation_id,
                %command_id,
                reason = "no_session",
                "Refresh rejected"
            );
            return Err(AuthError::RefreshTokenInvalid);
        };

        if session.is_expired_at(Utc::now()) {
            self.sessions.delete_by_hash(&token_hash).await?;
            tracing::info!(
                %correlation_id,
                session_id = %session.session_id,
                user_id = %session.user_id,
                "Expired refresh session removed"
            );
            return Err(AuthError::RefreshTokenExpired);
        }

        // Rehydrate from the user record so name and role are current
        let Some(user) = self.user_repo.find_by_id(&session.user_id).await? else {
            tracing::debug!(
                %correlation_id,
                %command_id,
                user_id = %session.user_id,
                reason = "user_not_found",
                "Refresh rejected"
            );
            return Err(AuthError::RefreshTokenInvalid);
        };
        let principal = Principal::from(&user);

        // Rotation claims the presented session before anything is issued;
        // a concurrent refresh with the same token deletes nothing and loses.
        let rotate = self.services.config.refresh_rotation == RefreshRotation::RotateOnUse;
        if rotate && self.sessions.delete_by_hash(&token_hash).await? == 0 {
            tracing::warn!(
                %correlation_id,
                %command_id,
                user_id = %session.user_id,
                session_id = %session.session_id,
                reason = "already_rotated",
                "Refresh rejected"
            );
            return Err(AuthError::RefreshTokenInvalid);
        }

        let access_token = self
            .services
            .tokens
            .issue(&principal.subject(), &principal.claims())?;

        if rotate {
            let next_token = SecretString::new(random_token(REFRESH_TOKEN_BYTES));
            let next_hash = self.services.refresh_token_hash(&next_token).await?;
            let next = self.sessions.save(next_hash, principal.id).await?;
            self.services
                .cookies
                .set_refresh_cookie(response, &next_token);

            tracing::info!(
                %correlation_id,
                %command_id,
                user_id = %principal.id,
                session_id = %next.session_id,
                rotated_from = %session.session_id,
                "Access token refreshed, refresh session rotated"
            );
        } else {
            tracing::info!(
                %correlation_id,
                %command_id,
                user_id = %principal.id,
                session_id = %session.session_id,
                "Access token refreshed"
            );
        }

        self.services
            .cookies
            .set_access_cookie(response, &access_token);

        Ok(principal)
    }
}
