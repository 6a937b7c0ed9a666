//! Application setup and initialization

pub mod routes;
pub mod server;

use crate::state::AppState;
use anyhow::{Context, Result};
use iris_core::Config;
use std::sync::Arc;

/// Initialize the long-running server: state plus the `/api` router
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    let state = initialize_state(config).await?;
    let router = routes::setup_routes(&state.config, state.clone())?;
    Ok((state, router))
}

/// Validate configuration, start tracing and build the workflow.
pub async fn initialize_state(config: Config) -> Result<Arc<AppState>> {
    // Fail fast on misconfiguration
    config.validate().context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.log_format())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment(),
        storage_backend = %config.storage_backend(),
        metadata_backend = %config.metadata_backend(),
        "Configuration loaded and validated successfully"
    );

    let workflow = iris_services::build_workflow(&config).await?;

    Ok(Arc::new(AppState::new(config, workflow)))
}
