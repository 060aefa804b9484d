pub mod config;
pub mod fallback;
pub mod llm;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod planner;
pub mod routes;

#[cfg(test)]
mod test_utils;

use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::util::TryInitError;

use config::{AppConfig, ConfigError, API_KEY_VAR};
use llm::LlmError;
use logging::LoggingConfig;
use routes::AppState;

#[derive(Error, Debug)]
pub enum StartupError {
  #[error("Configuration error: {0}")]
  Config(#[from] ConfigError),

  #[error("Failed to initialize logging: {0}")]
  Logging(#[from] TryInitError),

  #[error("Failed to build LLM client: {0}")]
  Llm(#[from] LlmError),

  #[error("Server error: {0}")]
  Io(#[from] std::io::Error),
}

pub async fn run() -> Result<(), StartupError> {
  // Load environment variables from .env file
  dotenvy::dotenv().ok();

  LoggingConfig::from_env().init()?;
  let config = AppConfig::from_env()?;

  if !config.llm.has_api_key() {
    warn!("{} is not set; plan generation will return 503", API_KEY_VAR);
  }

  let address = config.server.bind_address();
  let state = AppState::new(config)?;
  let listener = TcpListener::bind(&address).await?;
  info!(
    address = %address,
    model = %state.config.llm.model,
    api_key = state.config.llm.api_key_status(),
    "FitMentor API listening"
  );

  let app = routes::router(Arc::new(state));
  axum::serve(listener, app).await?;

  Ok(())
}
