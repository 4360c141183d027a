use fish_service::config::FishConfig;
use fish_service::services::init_metrics;
use fish_service::startup::Application;
use service_core::observability::init_tracing;

const SERVICE_NAME: &str = "fish-service";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Configuration comes first: a missing MONGO_URI must stop the process
    // before any connection is attempted.
    let config = FishConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        SERVICE_NAME,
        &config.common.log_level,
        config.common.otlp_endpoint.as_deref(),
    )?;

    // Must be before any metrics are recorded
    init_metrics()?;

    let app = Application::build(config).await.map_err(|e| {
        tracing::error!("Failed to start {}: {}", SERVICE_NAME, e);
        anyhow::anyhow!("Startup error: {}", e)
    })?;

    app.run_until_stopped().await.map_err(|e| {
        tracing::error!("Server error: {}", e);
        anyhow::anyhow!("Server error: {}", e)
    })?;

    Ok(())
}
