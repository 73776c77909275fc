//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use chrono::{DateTime, Utc};

use crate::domain::entity::{session::Session, user::User};
use crate::domain::value_object::{UserId, email::Email};
use crate::error::AuthResult;

/// User lookup (read-only; users are managed elsewhere)
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Find user by login email
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    /// Find user by ID
    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;
}

/// Refresh session repository trait
///
/// A dumb persistence boundary: expiry is judged by the caller.
#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    /// Insert a session; a single atomic write
    async fn create(&self, session: &Session) -> AuthResult<()>;

    /// Find session by refresh token hash
    async fn find_by_hash(&self, token_hash: &str) -> AuthResult<Option<Session>>;

    /// Delete sessions with this hash and return how many were removed
    ///
    /// Deleting nothing is not an error. The delete is a single atomic
    /// statement, so of two concurrent calls only one sees a non-zero count.
    async fn delete_by_hash(&self, token_hash: &str) -> AuthResult<u64>;

    /// Delete every session with `expires_at <= now`
    async fn cleanup_expired(&self, now: DateTime<Utc>) -> AuthResult<u64>;
}
