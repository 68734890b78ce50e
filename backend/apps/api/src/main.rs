//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors; request errors are rendered by the
//! auth and catalog crates.

use auth::{AuthAppState, AuthConfig, PgUserRepository};
use axum::{
    Router, http,
    http::{Method, header},
    middleware,
};
use base64::Engine;
use base64::engine::general_purpose;
use catalog::{CatalogAppState, PgCatalogRepository, catalog_router};
use platform::mail::{ConfiguredMailer, FileMailer, LogMailer};
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api=info,auth=info,catalog=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Database connection
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    let pool = PgPoolOptions::new()
        .max_connections(env_or("DATABASE_MAX_CONNECTIONS", 5)?)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    let auth_state = AuthAppState::new(
        PgUserRepository::new(pool.clone()),
        mailer_from_env(),
        auth_config_from_env()?,
    );
    let catalog_state = CatalogAppState::new(PgCatalogRepository::new(pool.clone()));

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
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]));

    // Build router
    let api = auth::router::auth_router(auth_state.clone())
        .merge(auth::router::users_router(auth_state.clone()))
        .merge(catalog_router(catalog_state))
        .layer(middleware::from_fn_with_state(
            auth_state.actor_resolver(),
            auth::middleware::resolve_actor::<PgUserRepository>,
        ));

    let app = Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr: SocketAddr = env::var("BIND_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:31113".to_string())
        .parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the auth configuration
///
/// Debug builds fall back to random secrets; release builds require them.
fn auth_config_from_env() -> anyhow::Result<AuthConfig> {
    let base = if cfg!(debug_assertions) {
        AuthConfig::development()
    } else {
        AuthConfig::default()
    };

    let confirmation_secret = match env::var("CONFIRMATION_SECRET") {
        Ok(secret_b64) => {
            let bytes = Engine::decode(&general_purpose::STANDARD, secret_b64.trim())?;
            <[u8; 32]>::try_from(bytes.as_slice())
                .map_err(|_| anyhow::anyhow!("CONFIRMATION_SECRET must decode to 32 bytes"))?
        }
        Err(_) if cfg!(debug_assertions) => base.confirmation_secret,
        Err(_) => anyhow::bail!("CONFIRMATION_SECRET must be set in production"),
    };

    let jwt_secret = match env::var("JWT_SECRET") {
        Ok(secret) if !secret.is_empty() => secret.into_bytes(),
        _ if cfg!(debug_assertions) => base.jwt_secret.clone(),
        _ => anyhow::bail!("JWT_SECRET must be set in production"),
    };

    Ok(AuthConfig {
        confirmation_secret,
        jwt_secret,
        confirmation_window: Duration::from_secs(env_or(
            "CONFIRMATION_WINDOW_SECS",
            base.confirmation_window.as_secs(),
        )?),
        confirmation_max_windows: env_or(
            "CONFIRMATION_MAX_WINDOWS",
            base.confirmation_max_windows,
        )?,
        access_token_ttl: Duration::from_secs(env_or(
            "ACCESS_TOKEN_TTL_SECS",
            base.access_token_ttl.as_secs(),
        )?),
        refresh_token_ttl: Duration::from_secs(env_or(
            "REFRESH_TOKEN_TTL_SECS",
            base.refresh_token_ttl.as_secs(),
        )?),
        mail_from: env::var("MAIL_FROM").unwrap_or_else(|_| base.mail_from.clone()),
        ..base
    })
}

/// `MAIL_BACKEND=file` writes `.eml` files to `MAIL_FILE_DIR`; anything else logs
fn mailer_from_env() -> ConfiguredMailer {
    match env::var("MAIL_BACKEND").as_deref() {
        Ok("file") => {
            let dir = env::var("MAIL_FILE_DIR").unwrap_or_else(|_| "sent_emails".to_string());
            tracing::info!(dir = %dir, "Using file mail backend");
            ConfiguredMailer::File(FileMailer::new(dir))
        }
        _ => ConfiguredMailer::Log(LogMailer),
    }
}

fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => Ok(raw.trim().parse()?),
        Err(_) => Ok(default),
    }
}
