//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use kernel::command::Command;
use kernel::context::CorrelationContext;
use std::sync::Arc;

use crate::application::{
    AuthServices, LoginInput, LoginUseCase, LogoutInput, LogoutUseCase, PurgeSessionsUseCase,
    RefreshInput, RefreshUseCase,
};
use crate::domain::repository::{SessionRepository, UserRepository};
use crate::error::AuthResult;
use crate::presentation::dto::{
    LoginRequest, PrincipalResponse, PurgeSessionsResponse, RefreshResponse,
};
use crate::presentation::middleware::CurrentUser;

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub services: AuthServices,
}

// ============================================================================
// Login
// ============================================================================

/// POST /api/v1/auth/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    ctx: CorrelationContext,
    Json(req): Json<LoginRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let use_case =
        LoginUseCase::new(state.repo.clone(), state.repo.clone(), state.services.clone());

    let input = LoginInput {
        email: req.email,
        password: req.password,
    };

    let mut headers = HeaderMap::new();
    let principal = use_case
        .execute(Command::new(input, &ctx), &mut headers)
        .await?;

    Ok((headers, Json(PrincipalResponse::from(&principal))))
}

// ============================================================================
// Refresh
// ============================================================================

/// POST /api/v1/auth/refresh
pub async fn refresh<R>(
    State(state): State<AuthAppState<R>>,
    ctx: CorrelationContext,
    request_headers: HeaderMap,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let use_case =
        RefreshUseCase::new(state.repo.clone(), state.repo.clone(), state.services.clone());

    let input = RefreshInput {
        refresh_token: state.services.cookies.refresh_token(&request_headers),
    };

    let mut headers = HeaderMap::new();
    use_case
        .execute(Command::new(input, &ctx), &mut headers)
        .await?;

    Ok((headers, Json(RefreshResponse::default())))
}

// ============================================================================
// Logout
// ============================================================================

/// DELETE /api/v1/auth/refresh
///
/// Shares the refresh path so the path-scoped refresh cookie is delivered.
pub async fn logout<R>(
    State(state): State<AuthAppState<R>>,
    ctx: CorrelationContext,
    request_headers: HeaderMap,
) -> impl IntoResponse
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let use_case = LogoutUseCase::new(state.repo.clone(), state.services.clone());

    let input = LogoutInput {
        refresh_token: state.services.cookies.refresh_token(&request_headers),
    };

    let mut headers = HeaderMap::new();
    // Ignore errors - the cookies are cleared regardless
    if let Err(e) = use_case
        .execute(Command::new(input, &ctx), &mut headers)
        .await
    {
        tracing::error!(error = %e, "Failed to delete refresh session on logout");
    }

    (StatusCode::NO_CONTENT, headers)
}

// ============================================================================
// Current User
// ============================================================================

/// GET /api/v1/auth/me
pub async fn current_user(CurrentUser(principal): CurrentUser) -> Json<PrincipalResponse> {
    Json(PrincipalResponse::from(&principal))
}

// ============================================================================
// Admin
// ============================================================================

/// POST /api/v1/auth/sessions/purge (ADMIN)
pub async fn purge_sessions<R>(
    State(state): State<AuthAppState<R>>,
    ctx: CorrelationContext,
    CurrentUser(principal): CurrentUser,
) -> AuthResult<Json<PurgeSessionsResponse>>
where
    R: UserRepository + SessionRepository + Clone + Send + Sync + 'static,
{
    let use_case = PurgeSessionsUseCase::new(state.repo.clone(), &state.services);

    let command = Command::builder(()).user(principal.id).build(Some(&ctx));
    let deleted = use_case.execute(command).await?;

    Ok(Json(PurgeSessionsResponse { deleted }))
}
