//! Heart-Failure Survival Prediction form server
//!
//! Loads the classifier artifact once, then serves the form. A missing or
//! corrupt artifact does not stop the server: the page reports the problem
//! and refuses input.

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use hf_survival::config::AppConfig;
use hf_survival::predictor::PredictionService;
use hf_survival::server::{self, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("hf_survival=info,tower_http=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    let config = AppConfig::from_env();
    info!(
        "Starting with model={} bind={} theme={:?}",
        config.model_path.display(),
        config.bind_addr,
        config.theme
    );

    let state = AppState::from_load(PredictionService::load(&config.model_path), config.theme);
    server::run_server(&config, state).await
}
