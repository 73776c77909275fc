//! Access Guard
//!
//! Single enforcement point for protected operations:
//! 1. access token cookie present
//! 2. signature, algorithm and expiry valid
//! 3. principal decoded from the claims
//! 4. principal's role allowed by the access policy for the operation

use axum::http::HeaderMap;
use platform::token::TokenError;

use crate::application::services::AuthServices;
use crate::domain::entity::principal::{AccessClaims, Principal};
use crate::error::{AuthError, AuthResult};

#[derive(Clone)]
pub struct AccessGuard {
    services: AuthServices,
}

impl AccessGuard {
    pub fn new(services: AuthServices) -> Self {
        Self { services }
    }

    /// Steps 1-3: who is calling
    pub fn authenticate(&self, request: &HeaderMap) -> AuthResult<Principal> {
        let token = self
            .services
            .cookies
            .access_token(request)
            .ok_or(AuthError::AccessTokenMissing)?;

        let verified = self
            .services
            .tokens
            .verify::<AccessClaims>(&token)
            .map_err(|e| {
                tracing::debug!(reason = %e, "Access token rejected");
                AuthError::from(e)
            })?;

        Principal::from_token(verified).ok_or_else(|| {
            tracing::debug!("Access token subject is not a user id");
            AuthError::from(TokenError::Malformed)
        })
    }

    /// Step 4: may they run `operation`
    pub fn authorize(&self, principal: &Principal, operation: &str) -> AuthResult<()> {
        if self.services.policy.permits(operation, principal.role) {
            Ok(())
        } else {
            tracing::warn!(
                user_id = %principal.id,
                role = %principal.role,
                operation,
                "Operation denied for role"
            );
            Err(AuthError::InsufficientPermissions)
        }
    }

    pub fn check(&self, request: &HeaderMap, operation: &str) -> AuthResult<Principal> {
        let principal = self.authenticate(request)?;
        self.authorize(&principal, operation)?;
        Ok(principal)
    }
}
