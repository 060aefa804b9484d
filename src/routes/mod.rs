//! HTTP boundary
//!
//! Every handler validates its payload before doing any work, so a bad
//! request never reaches the metrics layer or the remote API.

pub mod calculators;
pub mod health;
pub mod plan;

use std::any::Any;
use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use thiserror::Error;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::config::{AppConfig, API_KEY_VAR};
use crate::llm::LlmError;
use crate::models::ValidationError;
use crate::planner::PlanGenerator;

/// Shared, read-only per-process state
pub struct AppState {
  pub config: AppConfig,
  /// `None` when no API key is configured
  generator: Option<PlanGenerator>,
}

impl AppState {
  /// Builds the plan generator once; a missing key is not a startup error.
  pub fn new(config: AppConfig) -> Result<Self, LlmError> {
    let generator = match PlanGenerator::new(&config.llm) {
      Ok(generator) => Some(generator),
      Err(LlmError::MissingApiKey) => None,
      Err(e) => return Err(e),
    };
    Ok(Self { config, generator })
  }

  pub fn generator(&self) -> Result<&PlanGenerator, ApiError> {
    self.generator.as_ref().ok_or(ApiError::MissingApiKey)
  }
}

pub fn router(state: Arc<AppState>) -> Router {
  Router::new()
    .route("/api", get(health::api_info))
    .route("/api/health", get(health::health_check))
    .route("/api/generate-plan", post(plan::generate_plan))
    .route("/api/calculate-bmi", post(calculators::calculate_bmi))
    .route("/api/calculate-calories", post(calculators::calculate_calories))
    .fallback(not_found)
    .with_state(state)
    .layer(CatchPanicLayer::custom(handle_panic))
    .layer(TraceLayer::new_for_http())
    .layer(CorsLayer::permissive())
}

async fn not_found() -> ApiError {
  ApiError::NotFound
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
  let detail = if let Some(s) = err.downcast_ref::<String>() {
    s.clone()
  } else if let Some(s) = err.downcast_ref::<&str>() {
    s.to_string()
  } else {
    "unknown panic".to_string()
  };
  ApiError::Internal(detail).into_response()
}

/// ---------------------------------------------------------------------------
/// Error Responses
/// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum ApiError {
  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error("Invalid JSON body: {0}")]
  InvalidBody(String),

  #[error("LLM API key not configured")]
  MissingApiKey,

  #[error("Endpoint not found")]
  NotFound,

  #[error("Internal error: {0}")]
  Internal(String),
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    ApiError::InvalidBody(rejection.body_text())
  }
}

impl From<LlmError> for ApiError {
  fn from(err: LlmError) -> Self {
    match err {
      LlmError::MissingApiKey => ApiError::MissingApiKey,
      other => ApiError::Internal(other.to_string()),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, body) = match &self {
      ApiError::Validation(ValidationError::MissingFields(fields)) => (
        StatusCode::BAD_REQUEST,
        json!({ "error": "Missing required fields", "missing_fields": fields }),
      ),
      ApiError::Validation(e) => (StatusCode::BAD_REQUEST, json!({ "error": e.to_string() })),
      ApiError::InvalidBody(detail) => {
        warn!(detail = %detail, "rejected request body");
        (StatusCode::BAD_REQUEST, json!({ "error": "Invalid JSON body" }))
      }
      ApiError::MissingApiKey => (
        StatusCode::SERVICE_UNAVAILABLE,
        json!({
          "error": "LLM API key not configured",
          "message": format!("Please set {} in the environment or .env file", API_KEY_VAR),
        }),
      ),
      ApiError::NotFound => (StatusCode::NOT_FOUND, json!({ "error": "Endpoint not found" })),
      ApiError::Internal(detail) => {
        error!(detail = %detail, "internal error while handling request");
        (StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": "Internal server error" }))
      }
    };

    (status, Json(body)).into_response()
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
