//! Login Use Case
//!
//! Verifies email + password, then issues an access token and a refresh
//! session and writes both as cookies. Steps run strictly in order and stop
//! at the first failure.

use std::sync::Arc;

use axum::http::HeaderMap;
use kernel::command::Command;
use platform::crypto::random_token;
use platform::hashing::{SecretClass, SecretString};

use crate::application::services::AuthServices;
use crate::application::session_store::SessionStore;
use crate::domain::entity::principal::Principal;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::value_object::email::Email;
use crate::error::{AuthError, AuthResult};

/// Refresh token size in bytes (256 bits)
pub const REFRESH_TOKEN_BYTES: usize = 32;

/// Login input
#[derive(Debug)]
pub struct LoginInput {
    pub email: String,
    pub password: SecretString,
}

/// Login use case
pub struct LoginUseCase<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    user_repo: Arc<U>,
    sessions: SessionStore<S>,
    services: AuthServices,
}

impl<U, S> LoginUseCase<U, S>
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
        command: Command<LoginInput>,
        response: &mut HeaderMap,
    ) -> AuthResult<Principal> {
        let (command_id, metadata, input) = command.into_parts();
        let correlation_id = metadata.correlation_id();

        // Look up the user; a malformed email cannot match anyone
        let user = match Email::parse(&input.email) {
            Ok(email) => self.user_repo.find_by_email(&email).await?,
            Err(_) => None,
        };

        let Some(user) = user else {
            // Burn the same CPU as a real comparison so timing stays flat
            let _ = self
                .services
                .hasher
                .hash(&input.password, SecretClass::Password)
                .await;
            tracing::debug!(
                %correlation_id,
                %command_id,
                reason = "unknown_email",
                "Login rejected"
            );
            return Err(AuthError::InvalidCredentials);
        };

        // Verify password
        if !self
            .services
            .hasher
            .compare(&input.password, &user.password_hash)
            .await
        {
            tracing::debug!(
                %correlation_id,
                %command_id,
                user_id = %user.user_id,
                reason = "password_mismatch",
                "Login rejected"
            );
            return Err(AuthError::InvalidCredentials);
        }

        let principal = Principal::from(&user);

        // Access token
        let access_token = self
            .services
            .tokens
            .issue(&principal.subject(), &principal.claims())?;

        // Refresh token; only its hash is persisted
        let refresh_token = SecretString::new(random_token(REFRESH_TOKEN_BYTES));
        let refresh_hash = self.services.refresh_token_hash(&refresh_token).await?;
        let session = self.sessions.save(refresh_hash, principal.id).await?;

        let cookies = &self.services.cookies;
        cookies.set_access_cookie(response, &access_token);
        cookies.set_refresh_cookie(response, &refresh_token);

        tracing::info!(
            %correlation_id,
            %command_id,
            user_id = %principal.id,
            session_id = %session.session_id,
            "User logged in"
        );

        Ok(principal)
    }
}
