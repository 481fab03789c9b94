// src/main.rs
use authgate_core::application::{
    ports::{
        authorization_code::AuthorizationCodeStore,
        security::{PasswordHasher, TokenCodec},
        time::Clock,
    },
    services::ApplicationServices,
};
use authgate_core::config::{AppConfig, StorageBackend};
use authgate_core::domain::{
    client::ClientRepository,
    user::{TokenRepository, UserRepository},
};
use authgate_core::infrastructure::{
    database,
    repositories::{
        InMemoryClientRepository, InMemoryUserStore, PostgresClientRepository,
        PostgresUserRepository,
    },
    security::{
        authorization_code_store::InMemoryAuthorizationCodeStore, password::Argon2PasswordHasher,
        redis_authorization_code_store::RedisAuthorizationCodeStore, token::BiscuitTokenCodec,
    },
    time::SystemClock,
};
use authgate_core::presentation::http::{routes::build_router_with, state::HttpState};
use anyhow::{Context, Result};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

struct Repositories {
    users: Arc<dyn UserRepository>,
    tokens: Arc<dyn TokenRepository>,
    clients: Arc<dyn ClientRepository>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = bootstrap().await {
        tracing::error!(error = %err, "fatal error");
        eprintln!("fatal error: {err:#}");
        std::process::exit(1);
    }
}

async fn bootstrap() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env()?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let repos = init_repositories(&config).await?;
    let code_store = init_code_store(&config, Arc::clone(&clock))?;

    let password_hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2PasswordHasher);
    let token_codec: Arc<dyn TokenCodec> = Arc::new(BiscuitTokenCodec::new(
        config.biscuit_private_key(),
        config.access_token_ttl(),
        config.refresh_token_ttl(),
        Arc::clone(&clock),
    )?);

    let services = Arc::new(ApplicationServices::new(
        repos.users,
        repos.clients,
        repos.tokens,
        password_hasher,
        token_codec,
        Arc::clone(&code_store),
        clock,
        config.auth_policy(),
    ));

    if let Some(defaults) = config.seed_defaults() {
        services.seed(defaults).await?;
    }

    spawn_code_sweeper(code_store, config.auth_code_sweep_interval());

    let state = HttpState {
        services: Arc::clone(&services),
    };

    let app = build_router_with(state, &config.router_options());

    let listener = tokio::net::TcpListener::bind(config.listen_addr())
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr()))?;
    let address: SocketAddr = listener.local_addr()?;
    tracing::info!("listening on {address}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn init_repositories(config: &AppConfig) -> Result<Repositories> {
    match config.storage_backend() {
        StorageBackend::Postgres => {
            let url = config
                .database_url()
                .context("DATABASE_URL is required for the postgres backend")?;
            let pool = database::init_pool(url).await?;
            database::run_migrations(&pool).await?;
            tracing::info!("using postgres storage");

            let users = Arc::new(PostgresUserRepository::new(pool.clone()));
            Ok(Repositories {
                users: users.clone(),
                tokens: users,
                clients: Arc::new(PostgresClientRepository::new(pool)),
            })
        }
        StorageBackend::Memory => {
            tracing::warn!("using in-memory storage; data is lost on restart");
            let users = Arc::new(InMemoryUserStore::new());
            Ok(Repositories {
                users: users.clone(),
                tokens: users,
                clients: Arc::new(InMemoryClientRepository::new()),
            })
        }
    }
}

fn init_code_store(
    config: &AppConfig,
    clock: Arc<dyn Clock>,
) -> Result<Arc<dyn AuthorizationCodeStore>> {
    match config.redis_url() {
        Some(url) => {
            tracing::info!("using redis authorization code store");
            let store = RedisAuthorizationCodeStore::from_url(url, clock, config.auth_code_ttl())?;
            Ok(Arc::new(store))
        }
        None => Ok(Arc::new(InMemoryAuthorizationCodeStore::new(
            clock,
            config.auth_code_ttl(),
        ))),
    }
}

fn spawn_code_sweeper(store: Arc<dyn AuthorizationCodeStore>, every: Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            match store.purge_expired().await {
                Ok(0) => {}
                Ok(purged) => tracing::debug!(purged, "expired authorization codes purged"),
                Err(err) => tracing::error!(error = %err, "authorization code sweep failed"),
            }
        }
    });
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .ok()
        .unwrap_or_else(|| "info,tower_http=info,sqlx=warn".to_string());

    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(env_filter))
        .with(tracing_subscriber::fmt::layer());

    if subscriber.try_init().is_err() {
        tracing::warn!("tracing subscriber already initialised");
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install terminate handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    tracing::info!("shutdown signal received");
}
