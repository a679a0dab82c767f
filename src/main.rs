use devops_helper::env::ProcessEnv;
use devops_helper::fatal::ProcessAbort;
use devops_helper::server::{create_metrics, run_app_server, run_metrics_server, shutdown_signal};
use devops_helper::{AppConfig, AppState};
use std::sync::Arc;
use tracing::info;

/// Filter used when `RUST_LOG` is unset or invalid
const DEFAULT_LOG_FILTER: &str = "info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    info!("Starting devops-helper");

    let env = Arc::new(ProcessEnv);
    let config = AppConfig::from_env(env.as_ref())?;
    info!(
        port = config.port,
        metrics_port = config.metrics_port,
        "Configuration loaded"
    );

    let metrics = create_metrics()?;
    let state = AppState::new(env, metrics.clone());

    let app = run_app_server(config.port, state, Arc::new(ProcessAbort), shutdown_signal());
    let exporter = run_metrics_server(config.metrics_port, metrics, shutdown_signal());

    // Either server failing to bind or serve stops the process
    futures::future::try_join(app, exporter).await?;

    info!("Shutdown complete");
    Ok(())
}
