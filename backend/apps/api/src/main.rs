//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod config;

use std::sync::Arc;

use anyhow::Context;
use auth::{AuthService, InMemoryUserRepository, PgUserRepository, UserRepository, auth_router};
use axum::{
    Router, http,
    http::{Method, header},
};
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{AppConfig, AppEnv};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().context("invalid configuration")?;
    init_tracing(&config);

    tracing::info!(env = ?config.env, addr = %config.addr(), "Starting auth service");

    let app = match config.database_url.as_deref() {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(database_url)
                .await
                .context("failed to connect to database")?;

            tracing::info!("Connected to database");

            sqlx::migrate!("../../../database/migrations")
                .run(&pool)
                .await
                .context("failed to run migrations")?;

            tracing::info!("Migrations completed");

            build_app(PgUserRepository::new(pool), &config)?
        }
        None if cfg!(debug_assertions) => {
            tracing::warn!("DATABASE_URL not set, using in-memory user store");
            build_app(InMemoryUserRepository::new(), &config)?
        }
        None => anyhow::bail!("DATABASE_URL must be set"),
    };

    // Start server
    let addr = config.addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = &config.log_level;
        EnvFilter::new(format!("api={level},auth={level},tower_http={level}"))
    });

    let registry = tracing_subscriber::registry().with(filter);
    match config.env {
        AppEnv::Local => registry.with(tracing_subscriber::fmt::layer().pretty()).init(),
        AppEnv::Dev | AppEnv::Prod => registry.with(tracing_subscriber::fmt::layer().json()).init(),
    }
}

fn build_app<R>(repo: R, config: &AppConfig) -> anyhow::Result<Router>
where
    R: UserRepository + Send + Sync + 'static,
{
    let service = AuthService::new(Arc::new(repo), config.auth.clone())
        .context("failed to build auth service")?;

    let allowed_origins: Vec<http::HeaderValue> = config
        .frontend_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([Method::POST, Method::OPTIONS]))
        .allow_headers(AllowHeaders::list([header::CONTENT_TYPE, header::ACCEPT]));

    Ok(Router::new()
        .nest("/api/auth", auth_router(service, config.request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(cors))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
