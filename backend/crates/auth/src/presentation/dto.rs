//! API DTOs (Data Transfer Objects)

use platform::hashing::SecretString;
use serde::{Deserialize, Serialize};

use crate::domain::entity::principal::Principal;

// ============================================================================
// Login
// ============================================================================

/// Login request
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: SecretString,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Principal
// ============================================================================

/// Authenticated principal (login result and current user)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrincipalResponse {
    pub id: String,
    pub name: String,
    pub role: String,
}

impl From<&Principal> for PrincipalResponse {
    fn from(principal: &Principal) -> Self {
        Self {
            id: principal.id.to_string(),
            name: principal.name.clone(),
            role: principal.role.code().to_string(),
        }
    }
}

// ============================================================================
// Refresh / Admin
// ============================================================================

/// Body of a successful refresh: `{}`
#[derive(Debug, Clone, Default, Serialize)]
pub struct RefreshResponse {}

/// Purge result
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurgeSessionsResponse {
    pub deleted: u64,
}
