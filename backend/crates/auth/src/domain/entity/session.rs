//! Session Entity
//!
//! Server-side record of an issued refresh token. Only the token's hash is
//! kept; holding a session row is the sole evidence the token was issued.

use chrono::{DateTime, Duration, Utc};

use crate::domain::value_object::{SessionId, UserId};

/// Refresh session entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub session_id: SessionId,
    /// Refresh-token-class hash of the plaintext refresh token
    pub token_hash: String,
    /// Owning user
    pub user_id: UserId,
    /// Absolute expiry
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Create a session issued at `now`
    ///
    /// TTL is provided by the application layer (config), not hard-coded here.
    /// An expiry past the representable range saturates instead of panicking.
    pub fn new(token_hash: String, user_id: UserId, ttl: Duration, now: DateTime<Utc>) -> Self {
        let expires_at = now
            .checked_add_signed(ttl)
            .unwrap_or(if ttl < Duration::zero() {
                DateTime::<Utc>::MIN_UTC
            } else {
                DateTime::<Utc>::MAX_UTC
            });

        Self {
            session_id: SessionId::new(),
            token_hash,
            user_id,
            expires_at,
            created_at: now,
        }
    }

    /// Expired once `expires_at` has been reached; the instant itself counts
    /// as expired.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_at(now: DateTime<Utc>) -> Session {
        Session::new("hash".to_string(), UserId::new(), Duration::days(7), now)
    }

    #[test]
    fn test_expiry_is_absolute() {
        let now = Utc::now();
        let session = session_at(now);
        assert_eq!(session.expires_at, now + Duration::days(7));
        assert_eq!(session.created_at, now);
        assert!(!session.is_expired());
    }

    #[test]
    fn test_expiry_boundary() {
        let now = Utc::now();
        let session = session_at(now);
        let expires_at = session.expires_at;

        assert!(!session.is_expired_at(expires_at - Duration::milliseconds(1)));
        assert!(session.is_expired_at(expires_at));
        assert!(session.is_expired_at(expires_at + Duration::milliseconds(1)));
    }

    #[test]
    fn test_sessions_are_distinct() {
        let now = Utc::now();
        let user_id = UserId::new();
        let a = Session::new("h".to_string(), user_id, Duration::days(1), now);
        let b = Session::new("h".to_string(), user_id, Duration::days(1), now);
        assert_ne!(a.session_id, b.session_id);
    }

    #[test]
    fn test_huge_ttl_saturates() {
        let now = Utc::now();
        let session = Session::new("hash".to_string(), UserId::new(), Duration::MAX, now);
        assert_eq!(session.expires_at, DateTime::<Utc>::MAX_UTC);
        assert!(!session.is_expired_at(now));
    }
}
