//! Principal
//!
//! The authenticated identity attached to a request. Never persisted: it is
//! either projected from a user record (login, refresh) or decoded from a
//! verified access token (guard).

use platform::token::VerifiedToken;
use serde::{Deserialize, Serialize};

use crate::domain::entity::user::User;
use crate::domain::value_object::{UserId, user_role::UserRole};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: UserId,
    pub name: String,
    pub role: UserRole,
}

/// Claims carried by an access token next to `sub`, `iat` and `exp`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    pub name: String,
    pub role: UserRole,
}

impl Principal {
    /// Subject for the access token
    pub fn subject(&self) -> String {
        self.id.to_string()
    }

    pub fn claims(&self) -> AccessClaims {
        AccessClaims {
            name: self.name.clone(),
            role: self.role,
        }
    }

    /// `None` when the subject is not a user id
    pub fn from_token(token: VerifiedToken<AccessClaims>) -> Option<Self> {
        let id = token.subject.parse().ok()?;
        Some(Self {
            id,
            name: token.claims.name,
            role: token.claims.role,
        })
    }
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self {
            id: user.user_id,
            name: user.display_name.clone(),
            role: user.user_role,
        }
    }
}
