//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits, access policy
//! - `application/` - Use cases and application services
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! ## Features
//! - Email + password login issuing an access token and a refresh session
//! - Access token refresh from the path-scoped refresh cookie
//! - Logout (refresh session deletion + cookie clearing)
//! - Role-gated operations through a single access guard
//!
//! ## Security Model
//! - Passwords and refresh tokens hashed with Argon2id, each with its own cost
//! - Refresh tokens are stored only as hashes; the plaintext lives in the cookie
//! - Access tokens are HS256 JWS with the algorithm pinned at verification
//! - Both tokens travel in HttpOnly cookies, never in response bodies

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

// Re-exports for convenience
pub use application::{AuthConfig, AuthServices, RefreshRotation};
pub use domain::{AccessPolicy, Principal};
pub use error::{AuthError, AuthResult};
pub use infra::{InMemoryAuthRepository, PgAuthRepository};
pub use presentation::router::{auth_router, auth_router_generic};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
