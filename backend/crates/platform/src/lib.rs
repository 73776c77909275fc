//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Cryptographic utilities (random tokens, HMAC, Base64)
//! - Credential hashing (Argon2id, per-class cost)
//! - Signed access tokens (JWS, HS256)
//! - Cookie management
//! - Request correlation middleware

pub mod cookie;
pub mod correlation;
pub mod crypto;
pub mod hashing;
pub mod token;
