use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

use super::AppState;

const SERVICE_NAME: &str = "FitMentor AI API";

/// GET /api
pub async fn api_info(State(state): State<Arc<AppState>>) -> Json<Value> {
  let llm = &state.config.llm;

  Json(json!({
    "message": "Welcome to FitMentor AI",
    "version": env!("CARGO_PKG_VERSION"),
    "model": llm.model,
    "api_key_status": llm.api_key_status(),
    "endpoints": {
      "/api/generate-plan": "POST - Generate AI-powered fitness plan",
      "/api/health": "GET - Check API health",
      "/api/calculate-bmi": "POST - Calculate BMI",
      "/api/calculate-calories": "POST - Calculate daily caloric needs"
    },
  }))
}

/// GET /api/health
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
  let llm = &state.config.llm;

  Json(json!({
    "status": "healthy",
    "timestamp": Utc::now().to_rfc3339(),
    "service": SERVICE_NAME,
    "model": llm.model,
    "api_key_status": llm.api_key_status(),
  }))
}
