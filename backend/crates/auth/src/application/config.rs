//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub use platform::cookie::SameSite;
pub use platform::hashing::HashCost;

/// What happens to a refresh session when it is used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RefreshRotation {
    /// The same refresh token stays valid until its own expiry
    #[default]
    Reuse,
    /// Every refresh replaces the session and issues a new refresh token
    RotateOnUse,
}

impl FromStr for RefreshRotation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reuse" => Ok(RefreshRotation::Reuse),
            "rotate" | "rotate_on_use" => Ok(RefreshRotation::RotateOnUse),
            other => Err(format!("unknown refresh rotation policy: {other}")),
        }
    }
}

/// Auth application configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// Access token signing secret (HS256), loaded once at startup
    pub jwt_secret: Vec<u8>,
    /// Access token lifetime (15 minutes)
    pub access_token_ttl: Duration,
    /// Refresh session lifetime (7 days)
    pub refresh_token_ttl: Duration,
    pub access_cookie_name: String,
    pub refresh_cookie_name: String,
    /// The refresh cookie is only sent to this path
    pub refresh_cookie_path: String,
    /// Whether to require Secure cookie
    pub cookie_secure: bool,
    pub access_cookie_same_site: SameSite,
    pub refresh_cookie_same_site: SameSite,
    /// Argon2 cost for login passwords
    pub password_cost: HashCost,
    /// Argon2 cost for refresh tokens
    pub refresh_token_cost: HashCost,
    /// Password pepper (optional, application-wide secret)
    pub password_pepper: Option<Vec<u8>>,
    pub refresh_rotation: RefreshRotation,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: Vec::new(),
            access_token_ttl: Duration::from_secs(15 * 60), // 15 minutes
            refresh_token_ttl: Duration::from_secs(7 * 24 * 3600), // 1 week
            access_cookie_name: "access_token".to_string(),
            refresh_cookie_name: "refresh_token".to_string(),
            refresh_cookie_path: "/api/v1/auth/refresh".to_string(),
            cookie_secure: true,
            access_cookie_same_site: SameSite::Lax,
            refresh_cookie_same_site: SameSite::Strict,
            password_cost: HashCost::password_default(),
            refresh_token_cost: HashCost::refresh_token_default(),
            password_pepper: None,
            refresh_rotation: RefreshRotation::Reuse,
        }
    }
}

impl AuthConfig {
    /// Create config with a random signing secret (for development)
    pub fn with_random_secret() -> Self {
        Self {
            jwt_secret: platform::crypto::random_bytes(32),
            ..Default::default()
        }
    }

    /// Create config for development (insecure cookie)
    pub fn development() -> Self {
        Self {
            cookie_secure: false,
            ..Self::with_random_secret()
        }
    }

    /// Get password pepper as slice
    pub fn pepper(&self) -> Option<&[u8]> {
        self.password_pepper.as_deref()
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .field("access_cookie_name", &self.access_cookie_name)
            .field("refresh_cookie_name", &self.refresh_cookie_name)
            .field("refresh_cookie_path", &self.refresh_cookie_path)
            .field("cookie_secure", &self.cookie_secure)
            .field("password_cost", &self.password_cost)
            .field("refresh_token_cost", &self.refresh_token_cost)
            .field("password_pepper", &self.pepper().map(|_| "[REDACTED]"))
            .field("refresh_rotation", &self.refresh_rotation)
            .finish()
    }
}
