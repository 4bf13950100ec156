//! ATOM Agent Runner daemon
//!
//! Loads agent definitions from the registry file, schedules each one on the
//! runner, and runs until SIGINT/SIGTERM, then drains all agent tasks.

use atom_agent_runner::config::Config;
use atom_agent_runner::executor::CommandExecutor;
use atom_agent_runner::runner::AgentRunner;
use atom_agent_runner::state::AgentRegistry;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load configuration
    let config = Config::from_env();
    info!("Configuration loaded: {:?}", config);

    // Load agent definitions
    let specs = AgentRegistry::load_from_file(&config.registry_path)?;
    if specs.is_empty() {
        warn!(
            "No agents defined in {}; runner will idle until terminated",
            config.registry_path.display()
        );
    } else {
        info!(
            "Loaded {} agents from {}",
            specs.len(),
            config.registry_path.display()
        );
    }

    // Compose the runner around a command executor
    let executor = Arc::new(CommandExecutor::new(
        specs.clone(),
        config.execution.default_timeout_secs,
    ));
    let runner = Arc::new(AgentRunner::new(executor, config.runner.clone()));

    for spec in &specs {
        runner
            .register_agent_with_interval(&spec.id, Duration::from_secs(spec.interval_secs))
            .await;
        runner.start_agent(&spec.id).await?;
    }

    let summary = runner.status_summary().await;
    info!(
        "🚀 Agent runner started: {} registered, {} running",
        summary.total_agents, summary.running
    );
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    shutdown_signal().await;

    runner.shutdown().await;
    info!("Runner shutdown complete");
    Ok(())
}

/// Handle graceful shutdown signals (Ctrl+C, SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down gracefully...");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down gracefully...");
        },
    }
}
