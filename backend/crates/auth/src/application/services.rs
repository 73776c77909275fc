//! Shared auth services
//!
//! The process-wide pieces every use case needs, built once from
//! [`AuthConfig`] at startup. Cloning is cheap.

use std::sync::Arc;
use std::time::Duration;

use platform::hashing::{CredentialHasher, HasherConfig, SecretClass, SecretString};
use platform::token::TokenIssuer;

use crate::application::config::AuthConfig;
use crate::application::cookies::CookieTransport;
use crate::domain::policy::AccessPolicy;
use crate::error::{AuthError, AuthResult};

/// Shortest accepted signing secret
pub const MIN_SECRET_LEN: usize = 32;

/// Longest accepted access or refresh lifetime (one year)
pub const MAX_TOKEN_TTL: Duration = Duration::from_secs(365 * 24 * 3600);

#[derive(Clone)]
pub struct AuthServices {
    pub config: Arc<AuthConfig>,
    pub hasher: CredentialHasher,
    pub tokens: TokenIssuer,
    pub cookies: Arc<CookieTransport>,
    pub policy: Arc<AccessPolicy>,
}

impl AuthServices {
    pub fn new(config: AuthConfig, policy: AccessPolicy) -> AuthResult<Self> {
        if config.jwt_secret.len() < MIN_SECRET_LEN {
            return Err(AuthError::Configuration(format!(
                "JWT secret must be at least {MIN_SECRET_LEN} bytes"
            )));
        }
        validate_ttl("access token", config.access_token_ttl)?;
        validate_ttl("refresh token", config.refresh_token_ttl)?;

        let hasher = CredentialHasher::new(HasherConfig {
            password_cost: config.password_cost,
            refresh_token_cost: config.refresh_token_cost,
            refresh_salt_key: config.jwt_secret.clone(),
            pepper: config.password_pepper.clone(),
        })?;
        let tokens = TokenIssuer::new(&config.jwt_secret, config.access_token_ttl);
        let cookies = CookieTransport::new(&config);

        Ok(Self {
            config: Arc::new(config),
            hasher,
            tokens,
            cookies: Arc::new(cookies),
            policy: Arc::new(policy),
        })
    }

    /// Services with this crate's standard access policy
    pub fn from_config(config: AuthConfig) -> AuthResult<Self> {
        Self::new(config, AccessPolicy::standard())
    }

    /// Lookup key for a presented refresh token
    pub async fn refresh_token_hash(&self, token: &SecretString) -> AuthResult<String> {
        Ok(self.hasher.hash(token, SecretClass::RefreshToken).await?)
    }
}

/// Lifetimes feed expiry arithmetic and `Max-Age`; reject what they cannot hold
fn validate_ttl(what: &str, ttl: Duration) -> AuthResult<()> {
    if ttl.is_zero() || ttl > MAX_TOKEN_TTL {
        return Err(AuthError::Configuration(format!(
            "{what} TTL must be between 1s and {}s, got {}s",
            MAX_TOKEN_TTL.as_secs(),
            ttl.as_secs()
        )));
    }
    chrono::Duration::from_std(ttl)
        .map(|_| ())
        .map_err(|e| AuthError::Configuration(format!("Invalid {what} TTL: {e}")))
}
