//! DefDeploy Server: marketing definition deployment service
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

use defdeploy_api::{build_app, build_state_from_config};
use defdeploy_core::config::AppConfig;
use defdeploy_core::error::AppError;
use defdeploy_jobs::{JobReaper, JobRegistry};
use defdeploy_service::DisabledVisitTracker;

#[tokio::main]
async fn main() {
    let env = std::env::var("DEFDEPLOY_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!("Loaded configuration (env: {})", env);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting DefDeploy v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Job registry and retention reaper ────────────────
    let registry = Arc::new(JobRegistry::new());

    let mut reaper = if config.jobs.reaper_enabled {
        let reaper = JobReaper::new(Arc::clone(&registry), &config.jobs).await?;
        reaper.start(&config.jobs.reaper_schedule).await?;
        Some(reaper)
    } else {
        tracing::info!("Job reaper disabled");
        None
    };

    // ── Step 2: Backends, services and state ─────────────────────
    let state = build_state_from_config(
        config.clone(),
        Arc::clone(&registry),
        Arc::new(DisabledVisitTracker),
    )?;
    let app = build_app(state);

    // ── Step 3: Bind and serve ───────────────────────────────────
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("DefDeploy server listening on {}", addr);

    let server = axum::serve(listener, app).with_graceful_shutdown(async {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    // ── Step 4: Stop the reaper and drain running jobs ───────────
    if let Some(reaper) = reaper.as_mut() {
        if let Err(e) = reaper.shutdown().await {
            tracing::warn!("Job reaper did not shut down cleanly: {}", e);
        }
    }

    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let running: Vec<_> = registry
        .list()
        .into_iter()
        .filter_map(|summary| registry.get(&summary.name).ok())
        .filter(|job| !job.is_done())
        .collect();

    if !running.is_empty() {
        tracing::info!("Waiting for {} running job(s) to complete...", running.len());
        let drain = drain_jobs(running);
        if tokio::time::timeout(grace, drain).await.is_err() {
            tracing::warn!("Running jobs did not finish within {}s", grace.as_secs());
        }
    }

    tracing::info!("DefDeploy server shut down gracefully");
    Ok(())
}

/// Wait for every job in `jobs` to reach the done state.
async fn drain_jobs(jobs: Vec<Arc<defdeploy_jobs::Job>>) {
    for job in jobs {
        job.wait_done().await;
    }
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
