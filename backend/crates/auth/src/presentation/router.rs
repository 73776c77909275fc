//! Auth Router

use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::{AccessGuard, AuthServices};
use crate::domain::policy::operations;
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{GuardState, require_access};

/// Create the Auth router with PostgreSQL repository
pub fn auth_router(repo: PgAuthRepository, services: AuthServices) -> Router {
    auth_router_generic(repo, services)
}

/// Create a generic Auth router for any repository implementation
///
/// Mount under `/api/v1/auth`; the refresh cookie path must match the
/// resulting refresh route.
pub fn auth_router_generic<R>(repo: R, services: AuthServices) -> Router
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let guard = AccessGuard::new(services.clone());
    let guarded = |operation: &'static str| {
        middleware::from_fn_with_state(GuardState::new(guard.clone(), operation), require_access)
    };

    let state = AuthAppState {
        repo: Arc::new(repo),
        services,
    };

    Router::new()
        .route("/login", post(handlers::login::<R>))
        .route(
            "/refresh",
            post(handlers::refresh::<R>).delete(handlers::logout::<R>),
        )
        .merge(
            Router::<AuthAppState<R>>::new()
                .route("/me", get(handlers::current_user))
                .route_layer(guarded(operations::CURRENT_USER)),
        )
        .merge(
            Router::<AuthAppState<R>>::new()
                .route("/sessions/purge", post(handlers::purge_sessions::<R>))
                .route_layer(guarded(operations::PURGE_SESSIONS)),
        )
        .with_state(state)
}
