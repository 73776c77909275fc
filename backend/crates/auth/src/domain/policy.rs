//! Access Policy
//!
//! Table of protected operations and the roles allowed to run them. The
//! access guard consults it for every guarded route; an operation without
//! an entry only requires an authenticated principal.

use std::collections::HashMap;

use crate::domain::value_object::user_role::UserRole;

/// Names of the guarded operations exposed by this crate
pub mod operations {
    pub const CURRENT_USER: &str = "auth.current_user";
    pub const PURGE_SESSIONS: &str = "auth.sessions.purge";
}

#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    rules: HashMap<&'static str, Vec<UserRole>>,
}

impl AccessPolicy {
    /// Empty table: every operation is open to any authenticated principal
    pub fn new() -> Self {
        Self::default()
    }

    /// Policy for this crate's own routes
    pub fn standard() -> Self {
        Self::new().require(operations::PURGE_SESSIONS, &[UserRole::Admin])
    }

    /// Register (or replace) the roles allowed to run `operation`
    pub fn require(mut self, operation: &'static str, roles: &[UserRole]) -> Self {
        self.rules.insert(operation, roles.to_vec());
        self
    }

    pub fn allowed_roles(&self, operation: &str) -> Option<&[UserRole]> {
        self.rules.get(operation).map(Vec::as_slice)
    }

    pub fn permits(&self, operation: &str, role: UserRole) -> bool {
        match self.allowed_roles(operation) {
            Some(roles) => roles.contains(&role),
            None => true,
        }
    }
}
