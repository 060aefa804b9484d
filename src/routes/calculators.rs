//! Standalone calculator endpoints. No remote calls.

use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use super::ApiError;
use crate::metrics::{bmi, BmiCategory, CalorieBreakdown};
use crate::models::profile::{AGE, HEIGHT, WEIGHT};
use crate::models::{ActivityLevel, Choice, FitnessGoal, Gender, PayloadFields};

#[derive(Debug, Serialize)]
pub struct BmiResponse {
  pub bmi: f64,
  pub category: &'static str,
  pub recommendation: &'static str,
}

#[derive(Debug, Serialize)]
pub struct CalorieExplanation {
  pub bmr: &'static str,
  pub tdee: &'static str,
  pub target: String,
}

#[derive(Debug, Serialize)]
pub struct CalorieResponse {
  #[serde(flatten)]
  pub breakdown: CalorieBreakdown,
  pub explanation: CalorieExplanation,
}

/// POST /api/calculate-bmi
pub async fn calculate_bmi(
  payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<BmiResponse>, ApiError> {
  let Json(payload) = payload?;
  let fields = PayloadFields::new(&payload)?;
  fields.require(&[WEIGHT.field, HEIGHT.field])?;

  fields.number(WEIGHT.field)?;
  fields.number(HEIGHT.field)?;
  let weight = fields.bounded(WEIGHT)?;
  let height = fields.bounded(HEIGHT)?;

  let value = bmi(weight, height);
  let category = BmiCategory::from_bmi(value);

  Ok(Json(BmiResponse {
    bmi: value,
    category: category.as_str(),
    recommendation: category.recommendation(),
  }))
}

/// POST /api/calculate-calories
pub async fn calculate_calories(
  payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<CalorieResponse>, ApiError> {
  let Json(payload) = payload?;
  let fields = PayloadFields::new(&payload)?;
  fields.require(&[
    WEIGHT.field,
    HEIGHT.field,
    AGE.field,
    "gender",
    "activity_level",
    "fitness_goal",
  ])?;

  for bound in [WEIGHT, HEIGHT, AGE] {
    fields.number(bound.field)?;
  }
  let weight = fields.bounded(WEIGHT)?;
  let height = fields.bounded(HEIGHT)?;
  let age = fields.bounded(AGE)? as u32;

  let gender: Gender = fields.choice("gender")?;
  let activity: ActivityLevel = fields.choice("activity_level")?;
  let goal: FitnessGoal = fields.choice("fitness_goal")?;

  Ok(Json(CalorieResponse {
    breakdown: CalorieBreakdown::compute(weight, height, age, gender, activity, goal),
    explanation: CalorieExplanation {
      bmr: "Basal Metabolic Rate - calories burned at rest",
      tdee: "Total Daily Energy Expenditure",
      target: format!("Adjusted for {} goal", goal.as_str()),
    },
  }))
}
