//! Application Layer
//!
//! Use cases and application services.

pub mod access_guard;
pub mod config;
pub mod cookies;
pub mod login;
pub mod logout;
pub mod purge_sessions;
pub mod refresh;
pub mod services;
pub mod session_store;

// Re-exports
pub use access_guard::AccessGuard;
pub use config::{AuthConfig, RefreshRotation};
pub use cookies::CookieTransport;
pub use login::{LoginInput, LoginUseCase};
pub use logout::{LogoutInput, LogoutUseCase};
pub use purge_sessions::PurgeSessionsUseCase;
pub use refresh::{RefreshInput, RefreshUseCase};
pub use services::AuthServices;
pub use session_store::SessionStore;
