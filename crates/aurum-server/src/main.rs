//! Aurum server entry point.
//!
//! Bootstraps the storage backend and rate store, seeds rate parameters on
//! first start, then serves the Axum router with graceful shutdown.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use aurum_core::RateParameters;
use aurum_core::rates::RateStore;
use aurum_core::term::TermSchedule;
use aurum_storage::{MemoryBackend, StorageBackend};

use aurum_server::config::{ServerConfig, StorageBackendType};
use aurum_server::routes;
use aurum_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .json()
        .init();

    info!(storage = ?config.storage_backend, "Aurum starting");

    let state = build_app_state(&config).await?;
    let app = routes::build_router(state);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_addr))?;

    info!(addr = %config.bind_addr, "Aurum server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Aurum server stopped");
    Ok(())
}

/// Open storage, seed rate parameters, and build the shared state.
async fn build_app_state(config: &ServerConfig) -> anyhow::Result<Arc<AppState>> {
    let storage: Arc<dyn StorageBackend> = match &config.storage_backend {
        StorageBackendType::Memory => {
            info!("using in-memory storage (rate changes will not persist)");
            Arc::new(MemoryBackend::new())
        }
        #[cfg(feature = "redb-backend")]
        StorageBackendType::Redb { path } => {
            info!(path = %path, "using redb storage");
            if let Some(parent) = std::path::Path::new(path).parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
            Arc::new(
                aurum_storage::RedbBackend::open(path).context("failed to open redb storage")?,
            )
        }
        #[cfg(not(feature = "redb-backend"))]
        StorageBackendType::Redb { .. } => {
            anyhow::bail!("redb backend requested but feature 'redb-backend' is not enabled");
        }
    };

    let seed = RateParameters::new(config.seed_loan_to_value_ratio, config.seed_interest_rate)
        .context("invalid seed rate parameters")?;

    let rate_store = Arc::new(RateStore::new(storage));
    rate_store
        .seed(&seed)
        .await
        .context("failed to seed rate parameters")?;

    let current = rate_store
        .current()
        .await
        .context("failed to read rate parameters")?;
    info!(
        loan_to_value_ratio = current.loan_to_value_ratio,
        annual_interest_rate = current.annual_interest_rate,
        "rate parameters loaded"
    );

    if config.admin_token.is_none() {
        info!("AURUM_ADMIN_TOKEN not set, rate parameter writes disabled");
    }

    Ok(Arc::new(AppState {
        rate_store,
        term_schedule: TermSchedule::default(),
        admin_token: config.admin_token.clone(),
    }))
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.ok();
    };

    #[cfg(unix)]
    let terminate = async {
        if let Ok(mut sig) =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        {
            sig.recv().await;
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("shutdown signal received, stopping server");
}
