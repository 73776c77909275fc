//! Domain Layer
//!
//! Contains entities, value objects, repository traits and the access policy.

pub mod entity;
pub mod policy;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::{principal::Principal, session::Session, user::User};
pub use policy::AccessPolicy;
pub use repository::{SessionRepository, UserRepository};
