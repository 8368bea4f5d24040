//! HTTP server initialization and runtime setup.
//!
//! Handles store connections, migrations, state wiring, and the Axum server
//! lifecycle for one process (either the only process or one supervised
//! worker).

use crate::application::services::{Allocator, ShortenService};
use crate::config::{Config, CounterBackend, StoreBackend};
use crate::domain::repositories::{CounterRepository, MappingRepository};
use crate::infrastructure::memory::{MemoryCounterRepository, MemoryMappingRepository};
use crate::infrastructure::persistence::{PgCounterRepository, PgMappingRepository};
use crate::infrastructure::redis_store::RedisCounterRepository;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::{TcpListener, TcpSocket};
use tower::Layer;
use tower_http::normalize_path::NormalizePathLayer;

/// The two store handles a process works against.
pub struct Backends {
    pub mappings: Arc<dyn MappingRepository>,
    pub counters: Arc<dyn CounterRepository>,
}

/// Opens the PostgreSQL pool with the configured limits.
///
/// # Errors
///
/// Returns an error if `DATABASE_URL` is missing or the database is
/// unreachable.
pub async fn connect_pool(config: &Config) -> Result<PgPool> {
    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL is not configured")?;

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout))
        .max_lifetime(Duration::from_secs(config.db_max_lifetime))
        .connect(database_url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Connected to database");
    Ok(pool)
}

/// Applies the embedded migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to run database migrations")?;

    tracing::info!("Database migrations applied");
    Ok(())
}

/// Builds the mapping and counter stores selected by the configuration.
///
/// `pool` must be provided when the mapping store is PostgreSQL.
pub async fn build_backends(config: &Config, pool: Option<Arc<PgPool>>) -> Result<Backends> {
    let mappings: Arc<dyn MappingRepository> = match config.store_backend {
        StoreBackend::Postgres => {
            let pool = pool
                .clone()
                .context("PostgreSQL store selected without a connection pool")?;
            Arc::new(PgMappingRepository::new(pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory store; mappings are lost on restart");
            Arc::new(MemoryMappingRepository::new())
        }
    };

    let counters: Arc<dyn CounterRepository> = match (config.counter_backend, config.store_backend)
    {
        (CounterBackend::Redis, _) => {
            let redis_url = config
                .redis_url
                .as_deref()
                .context("REDIS_URL is not configured")?;
            let counter = RedisCounterRepository::connect(redis_url)
                .await
                .context("Failed to connect to Redis")?;
            tracing::info!("Counter store: Redis");
            Arc::new(counter)
        }
        (CounterBackend::Store, StoreBackend::Postgres) => {
            let pool = pool.context("PostgreSQL store selected without a connection pool")?;
            Arc::new(PgCounterRepository::new(pool))
        }
        (CounterBackend::Store, StoreBackend::Memory) => Arc::new(MemoryCounterRepository::new()),
    };

    Ok(Backends { mappings, counters })
}

/// Wires the services on top of the stores.
pub fn build_state(config: &Config, backends: Backends) -> AppState {
    let allocator = Allocator::new(
        backends.counters.clone(),
        config.counter_name.clone(),
        config.store_timeout(),
    );
    let shorten_service = Arc::new(ShortenService::new(
        backends.mappings.clone(),
        allocator,
        config.base_url.clone(),
        config.store_timeout(),
    ));

    AppState::new(
        shorten_service,
        backends.mappings,
        backends.counters,
        config.worker_id,
        config.store_timeout(),
    )
}

/// Binds the listening socket.
///
/// With `reuse_port` every worker binds the same address and the kernel
/// spreads incoming connections across them.
pub fn bind_listener(addr: SocketAddr, reuse_port: bool) -> Result<TcpListener> {
    let socket = if addr.is_ipv4() {
        TcpSocket::new_v4()?
    } else {
        TcpSocket::new_v6()?
    };

    socket.set_reuseaddr(true)?;
    if reuse_port {
        #[cfg(unix)]
        socket.set_reuseport(true)?;
        #[cfg(not(unix))]
        anyhow::bail!("SO_REUSEPORT is only available on Unix");
    }

    socket
        .bind(addr)
        .with_context(|| format!("Failed to bind {addr}"))?;
    Ok(socket.listen(1024)?)
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - PostgreSQL pool and migrations (migrations are skipped in supervised
///   workers; the supervisor applies them once)
/// - Counter store (PostgreSQL, Redis, or in-memory)
/// - Axum HTTP server with graceful shutdown
///
/// # Errors
///
/// Returns an error if:
/// - A store connection fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = if config.uses_postgres() {
        let pool = connect_pool(&config).await?;
        if !config.is_worker() {
            run_migrations(&pool).await?;
        }
        Some(Arc::new(pool))
    } else {
        None
    };

    let backends = build_backends(&config, pool).await?;
    let state = build_state(&config, backends);

    let app = NormalizePathLayer::trim_trailing_slash().layer(app_router(state));

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .with_context(|| format!("Invalid listen address '{}'", config.listen_addr))?;
    let listener = bind_listener(addr, config.is_worker())?;
    tracing::info!(worker = ?config.worker_id, "Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!(worker = ?config.worker_id, "Server stopped");
    Ok(())
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::warn!("Shutdown signal received");
}
