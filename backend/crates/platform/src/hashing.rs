//! Credential Hashing and Verification
//!
//! One-way hashing for the two secret classes the service stores:
//! - login passwords
//! - refresh tokens
//!
//! Both use Argon2id and both produce PHC strings, so verification needs no
//! class argument: the parameters and salt travel inside the hash.
//!
//! ## Cost and salting per class
//! - `Password`: random 128-bit salt per hash (self-salting, non-deterministic),
//!   high memory cost. A stolen hash must be expensive to brute force offline.
//! - `RefreshToken`: salt derived from the server secret, low memory cost.
//!   The plaintext already carries 256 bits of entropy, and the hash must be
//!   deterministic so the session row can be found by it.
//!
//! Hashing is CPU-bound and deliberately slow. The async entry points run it
//! on tokio's blocking pool so request workers are never stalled.

use std::fmt;
use std::sync::Arc;

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version,
    password_hash::{SaltString, rand_core::OsRng},
};
use serde::Deserialize;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::crypto::hmac_sha256;

/// Domain separation label for the refresh-token salt derivation
const REFRESH_SALT_LABEL: &[u8] = b"refresh-token-salt:v1";

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum HashingError {
    /// Cost parameters rejected by Argon2
    #[error("Invalid hashing cost: {0}")]
    InvalidCost(String),

    /// Hashing operation failed
    #[error("Hashing failed: {0}")]
    HashingFailed(String),

    /// The blocking worker panicked or was cancelled
    #[error("Hashing worker failed: {0}")]
    WorkerFailed(String),
}

// ============================================================================
// Secret classes and cost
// ============================================================================

/// Which kind of secret is being hashed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretClass {
    Password,
    RefreshToken,
}

/// Argon2 cost factors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    /// Memory in KiB
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl HashCost {
    /// OWASP recommended Argon2id parameters: m=19456 (19 MiB), t=2, p=1
    pub const fn password_default() -> Self {
        Self {
            memory_kib: 19_456,
            iterations: 2,
            parallelism: 1,
        }
    }

    /// Cheap enough to run on every refresh request
    pub const fn refresh_token_default() -> Self {
        Self {
            memory_kib: 4_096,
            iterations: 1,
            parallelism: 1,
        }
    }

    /// Smallest parameters Argon2 accepts (tests, local tooling)
    pub const fn minimal() -> Self {
        Self {
            memory_kib: Params::MIN_M_COST,
            iterations: 1,
            parallelism: 1,
        }
    }

    fn params(&self) -> Result<Params, HashingError> {
        Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| HashingError::InvalidCost(e.to_string()))
    }
}

// ============================================================================
// Secret String (Zeroized on drop)
// ============================================================================

/// Plaintext secret (password or refresh token) with memory zeroization
///
/// ## Security
/// - Implements `Zeroize` and `ZeroizeOnDrop`
/// - Does not implement `Clone` to prevent accidental copies
/// - Debug output is redacted
/// - Deserializes straight from a JSON string, so request bodies never hold
///   the plaintext in an unzeroized `String`
#[derive(Zeroize, ZeroizeOnDrop, Deserialize)]
#[serde(transparent)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Borrow the plaintext. Only for handing it to its single destination
    /// (hasher or outbound cookie).
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SecretString").field(&"[REDACTED]").finish()
    }
}

// ============================================================================
// Credential Hasher
// ============================================================================

/// Hasher configuration
#[derive(Clone)]
pub struct HasherConfig {
    pub password_cost: HashCost,
    pub refresh_token_cost: HashCost,
    /// Server secret the refresh-token salt is derived from
    pub refresh_salt_key: Vec<u8>,
    /// Optional application-wide secret appended to every plaintext
    pub pepper: Option<Vec<u8>>,
}

impl fmt::Debug for HasherConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HasherConfig")
            .field("password_cost", &self.password_cost)
            .field("refresh_token_cost", &self.refresh_token_cost)
            .field("refresh_salt_key", &"[REDACTED]")
            .field("pepper", &self.pepper.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Argon2id hasher for passwords and refresh tokens
///
/// Cheap to clone; clones share the same parameters.
#[derive(Clone)]
pub struct CredentialHasher {
    inner: Arc<HasherInner>,
}

struct HasherInner {
    password_params: Params,
    refresh_token_params: Params,
    refresh_salt: SaltString,
    pepper: Option<Zeroizing<Vec<u8>>>,
}

impl CredentialHasher {
    pub fn new(config: HasherConfig) -> Result<Self, HashingError> {
        let derived = hmac_sha256(&config.refresh_salt_key, REFRESH_SALT_LABEL)
            .map_err(|e| HashingError::HashingFailed(e.to_string()))?;
        let refresh_salt = SaltString::encode_b64(&derived[..16])
            .map_err(|e| HashingError::HashingFailed(e.to_string()))?;

        Ok(Self {
            inner: Arc::new(HasherInner {
                password_params: config.password_cost.params()?,
                refresh_token_params: config.refresh_token_cost.params()?,
                refresh_salt,
                pepper: config.pepper.map(Zeroizing::new),
            }),
        })
    }

    /// Hash a plaintext secret with the cost of its class
    ///
    /// ## Returns
    /// PHC-formatted Argon2id hash string
    pub async fn hash(
        &self,
        plaintext: &SecretString,
        class: SecretClass,
    ) -> Result<String, HashingError> {
        let inner = self.inner.clone();
        let material = inner.peppered(plaintext.expose());

        tokio::task::spawn_blocking(move || inner.hash(&material, class))
            .await
            .map_err(|e| HashingError::WorkerFailed(e.to_string()))?
    }

    /// Verify a plaintext against a stored hash
    ///
    /// A malformed hash, a mismatch, or a failed worker all yield `false`.
    /// Argon2 compares outputs in constant time.
    pub async fn compare(&self, plaintext: &SecretString, hash: &str) -> bool {
        let inner = self.inner.clone();
        let material = inner.peppered(plaintext.expose());
        let hash = hash.to_owned();

        match tokio::task::spawn_blocking(move || inner.verify(&material, &hash)).await {
            Ok(valid) => valid,
            Err(e) => {
                tracing::error!(error = %e, "Credential comparison worker failed");
                false
            }
        }
    }
}

impl HasherInner {
    fn peppered(&self, plaintext: &str) -> Zeroizing<Vec<u8>> {
        let mut material = Zeroizing::new(plaintext.as_bytes().to_vec());
        if let Some(pepper) = &self.pepper {
            material.extend_from_slice(pepper);
        }
        material
    }

    fn hash(&self, material: &[u8], class: SecretClass) -> Result<String, HashingError> {
        let (params, salt) = match class {
            SecretClass::Password => {
                (self.password_params.clone(), SaltString::generate(&mut OsRng))
            }
            SecretClass::RefreshToken => {
                (self.refresh_token_params.clone(), self.refresh_salt.clone())
            }
        };

        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
            .hash_password(material, &salt)
            .map(|h| h.to_string())
            .map_err(|e| HashingError::HashingFailed(e.to_string()))
    }

    fn verify(&self, material: &[u8], hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(h) => h,
            Err(_) => return false,
        };

        // Parameters come from the PHC string itself
        Argon2::default()
            .verify_password(material, &parsed_hash)
            .is_ok()
    }
}

// ============================================================================
// Tests
// ============================================================================
