//! Auth Middleware
//!
//! Runs the access guard in front of protected routes and hands the
//! resulting principal to handlers through the request extensions.

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;

use crate::application::AccessGuard;
use crate::domain::entity::principal::Principal;
use crate::error::AuthError;

/// Middleware state: the guard and the operation the route performs
#[derive(Clone)]
pub struct GuardState {
    pub guard: AccessGuard,
    pub operation: &'static str,
}

impl GuardState {
    pub fn new(guard: AccessGuard, operation: &'static str) -> Self {
        Self { guard, operation }
    }
}

/// Use with `axum::middleware::from_fn_with_state(GuardState, require_access)`
pub async fn require_access(
    State(state): State<GuardState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let principal = state.guard.check(req.headers(), state.operation)?;
    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}

/// Principal attached by [`require_access`]
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Principal);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(CurrentUser)
            .ok_or(AuthError::AccessTokenMissing)
    }
}
