//! Storefront API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use auth::application::PurgeSessionsUseCase;
use auth::{AuthConfig, AuthServices, PgAuthRepository, RefreshRotation, auth_router};
use axum::{
    Router, http,
    http::{Method, header},
    middleware,
};
use kernel::command::Command;
use platform::correlation::correlation_middleware;
use platform::crypto::from_base64;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "storefront=info,auth=info,platform=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Auth configuration
    let auth_config = load_auth_config()?;
    tracing::info!(config = ?auth_config, "Auth configuration loaded");

    let auth_services = AuthServices::from_config(auth_config)?;
    let auth_repo = PgAuthRepository::new(pool.clone());

    // Startup cleanup: remove expired refresh sessions
    // Errors here should not prevent server startup
    let purge = PurgeSessionsUseCase::new(Arc::new(auth_repo.clone()), &auth_services);
    if let Err(e) = purge.execute(Command::detached(())).await {
        tracing::warn!(
            error = %e,
            "Auth session cleanup failed, continuing anyway"
        );
    }

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:40922,http://127.0.0.1:40922".to_string());

    let allowed_origins: Vec<http::HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::ACCEPT,
            http::HeaderName::from_static("x-request-id"),
        ]))
        .allow_credentials(true);

    // Build router
    let app = Router::new()
        .nest("/api/v1/auth", auth_router(auth_repo, auth_services))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(correlation_middleware))
        .layer(cors);

    // Start server
    let addr: SocketAddr = env::var("BIND_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:31113".to_string())
        .parse()
        .context("BIND_ADDR must be a socket address")?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the auth configuration from the environment
///
/// Release builds require `JWT_SECRET`; debug builds fall back to a random
/// secret with insecure cookies.
fn load_auth_config() -> anyhow::Result<AuthConfig> {
    let base = if cfg!(debug_assertions) {
        AuthConfig::development()
    } else {
        AuthConfig::default()
    };

    let jwt_secret = match env::var("JWT_SECRET") {
        Ok(encoded) => from_base64(encoded.trim()).context("JWT_SECRET must be base64")?,
        Err(_) if cfg!(debug_assertions) => base.jwt_secret.clone(),
        Err(_) => bail!("JWT_SECRET must be set in production"),
    };

    let password_pepper = match env::var("PASSWORD_PEPPER") {
        Ok(encoded) => Some(from_base64(encoded.trim()).context("PASSWORD_PEPPER must be base64")?),
        Err(_) => None,
    };

    let refresh_rotation = match env::var("REFRESH_ROTATION") {
        Ok(value) => value.parse::<RefreshRotation>().map_err(anyhow::Error::msg)?,
        Err(_) => base.refresh_rotation,
    };

    let cookie_secure = match env::var("COOKIE_SECURE") {
        Ok(value) => value
            .trim()
            .parse::<bool>()
            .context("COOKIE_SECURE must be true or false")?,
        Err(_) => base.cookie_secure,
    };

    Ok(AuthConfig {
        jwt_secret,
        access_token_ttl: secs_from_env("ACCESS_TOKEN_TTL_SECS")?.unwrap_or(base.access_token_ttl),
        refresh_token_ttl: secs_from_env("REFRESH_TOKEN_TTL_SECS")?
            .unwrap_or(base.refresh_token_ttl),
        password_pepper,
        refresh_rotation,
        cookie_secure,
        ..base
    })
}

fn secs_from_env(key: &str) -> anyhow::Result<Option<Duration>> {
    match env::var(key) {
        Ok(value) => {
            let secs = value
                .trim()
                .parse::<u64>()
                .with_context(|| format!("{key} must be a number of seconds"))?;
            Ok(Some(Duration::from_secs(secs)))
        }
        Err(_) => Ok(None),
    }
}
