//! Test utilities and helpers for unit testing
//!
//! This module provides common test infrastructure including:
//! - Mock profiles and request payloads
//! - Canned LLM responses
//! - Helper assertions

use serde_json::{json, Value};

use crate::config::LlmConfig;
use crate::models::{ActivityLevel, DietaryPreference, FitnessGoal, Gender, UserProfile, Weekday};

/// ---------------------------------------------------------------------------
/// Profile Factories
/// ---------------------------------------------------------------------------

/// 70 kg, 175 cm, 25 year old male; moderate activity, muscle gain
pub fn mock_profile() -> UserProfile {
  UserProfile {
    weight_kg: 70.0,
    height_cm: 175.0,
    age: 25,
    gender: Gender::Male,
    activity_level: ActivityLevel::Moderate,
    fitness_goal: FitnessGoal::MuscleGain,
    dietary_preference: DietaryPreference::Balanced,
    health_restrictions: "none".to_string(),
  }
}

/// The request body equivalent of `mock_profile`
pub fn mock_profile_payload() -> Value {
  json!({
    "weight": 70,
    "height": 175,
    "age": 25,
    "gender": "male",
    "activity_level": "moderate",
    "fitness_goal": "muscle gain",
    "dietary_preferences": "balanced",
    "health_restrictions": "none"
  })
}

/// ---------------------------------------------------------------------------
/// LLM Mocks
/// ---------------------------------------------------------------------------

/// Config pointing at a mock server, with a key set
pub fn mock_llm_config(endpoint: &str) -> LlmConfig {
  LlmConfig {
    api_key: Some("test-key".to_string()),
    endpoint: endpoint.to_string(),
    model: "test/model".to_string(),
    timeout_secs: 5,
    max_tokens: 2000,
    temperature: 0.7,
  }
}

/// Wrap generated text in a chat-completions response body
pub fn chat_completion_body(content: &str) -> String {
  json!({
    "id": "gen-test",
    "model": "test/model",
    "choices": [{
      "index": 0,
      "message": { "role": "assistant", "content": content },
      "finish_reason": "stop"
    }]
  })
  .to_string()
}

/// A full week of workouts keyed by day name, as the model returns it
pub fn mock_workout_plan_json() -> String {
  let mut week = serde_json::Map::new();
  for day in Weekday::ALL {
    week.insert(
      day.as_str().to_string(),
      json!([
        {
          "exercise_name": "Barbell Back Squat",
          "sets": 4,
          "reps": "6-8",
          "duration_minutes": 15,
          "intensity_level": "hard",
          "equipment_required": "barbell"
        },
        {
          "exercise_name": "Plank",
          "sets": 3,
          "reps": 1,
          "duration_minutes": 5,
          "intensity_level": "moderate",
          "equipment_required": "none"
        }
      ]),
    );
  }
  Value::Object(week).to_string()
}

/// A full week of meals keyed by day name; snacks omitted as models often do
pub fn mock_meal_plan_json() -> String {
  let meal = |name: &str, calories: i64| {
    json!({
      "meal": name,
      "protein_g": 35,
      "carbs_g": 50,
      "fats_g": 15,
      "calories": calories
    })
  };

  let mut week = serde_json::Map::new();
  for day in Weekday::ALL {
    week.insert(
      day.as_str().to_string(),
      json!({
        "breakfast": meal("Veggie Omelette", 450),
        "lunch": meal("Quinoa Chicken Bowl", 700),
        "dinner": meal("Salmon with Sweet Potato", 650)
      }),
    );
  }
  Value::Object(week).to_string()
}

/// ---------------------------------------------------------------------------
/// Test Macros
/// ---------------------------------------------------------------------------

/// Assert two floats are approximately equal within a tolerance
#[macro_export]
macro_rules! assert_approx_eq {
  ($left:expr, $right:expr, $tolerance:expr) => {{
    let (left, right, tolerance) = ($left, $right, $tolerance);
    let diff = (left - right).abs();
    assert!(
      diff < tolerance,
      "Values not approximately equal: {} vs {} (diff: {}, tolerance: {})",
      left,
      right,
      diff,
      tolerance
    );
  }};
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_mock_payload_matches_profile() {
    let profile = UserProfile::from_payload(&mock_profile_payload()).unwrap();
    assert_eq!(profile, mock_profile());
  }

  #[test]
  fn test_mock_plans_cover_every_day() {
    let workouts: Value = serde_json::from_str(&mock_workout_plan_json()).unwrap();
    let meals: Value = serde_json::from_str(&mock_meal_plan_json()).unwrap();

    for day in Weekday::ALL {
      assert!(workouts[day.as_str()].is_array(), "workouts missing {}", day.as_str());
      assert!(meals[day.as_str()]["dinner"].is_object(), "meals missing {}", day.as_str());
    }
  }

  #[test]
  fn test_chat_completion_body_shape() {
    let body: Value = serde_json::from_str(&chat_completion_body("hello")).unwrap();
    assert_eq!(body["choices"][0]["message"]["content"], "hello");
  }

  #[test]
  fn test_assert_approx_eq_macro() {
    crate::assert_approx_eq!(1.0_f64, 1.0005_f64, 0.001);
  }
}
