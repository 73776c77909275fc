//! User Entity
//!
//! The slice of a user record that authentication reads. The record itself
//! is owned by user management; this crate never writes it.

use chrono::{DateTime, Utc};

use crate::domain::value_object::{UserId, email::Email, user_role::UserRole};

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    /// Login identifier (unique)
    pub email: Email,
    pub display_name: String,
    pub user_role: UserRole,
    /// Argon2id PHC string of the login password
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        email: Email,
        display_name: impl Into<String>,
        user_role: UserRole,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            user_id: UserId::new(),
            email,
            display_name: display_name.into(),
            user_role,
            password_hash: password_hash.into(),
            created_at: Utc::now(),
        }
    }
}
