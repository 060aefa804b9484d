use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use super::{ApiError, AppState};
use crate::metrics::DerivedMetrics;
use crate::models::{Choice, UserProfile, WeeklyPlan};

#[derive(Debug, Serialize)]
pub struct PlanMetadata {
  pub success: bool,
  pub timestamp: String,
  pub model: String,
}

/// The plan object with `_metadata` merged in alongside its sections
#[derive(Debug, Serialize)]
pub struct PlanResponse {
  #[serde(flatten)]
  pub plan: WeeklyPlan,
  #[serde(rename = "_metadata")]
  pub metadata: PlanMetadata,
}

/// POST /api/generate-plan
pub async fn generate_plan(
  State(state): State<Arc<AppState>>,
  payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<PlanResponse>, ApiError> {
  let Json(payload) = payload?;
  let profile = UserProfile::from_payload(&payload)?;
  let generator = state.generator()?;

  info!(
    goal = profile.fitness_goal.as_str(),
    diet = profile.dietary_preference.as_str(),
    "generating weekly plan"
  );

  let metrics = DerivedMetrics::compute(&profile);
  let plan = generator.generate(&profile, &metrics).await;

  Ok(Json(PlanResponse {
    plan,
    metadata: PlanMetadata {
      success: true,
      timestamp: Utc::now().to_rfc3339(),
      model: generator.model().to_string(),
    },
  }))
}
