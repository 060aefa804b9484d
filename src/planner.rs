//! Weekly plan orchestration
//!
//! Workouts and meals are requested from the model concurrently. Each half
//! either parses cleanly into seven ordered days or is replaced wholesale by
//! its fallback; the remaining sections are always static.

use std::collections::HashMap;

use tracing::{info, warn};

use crate::config::LlmConfig;
use crate::fallback;
use crate::llm::{LlmError, OpenRouterClient};
use crate::metrics::DerivedMetrics;
use crate::models::{
  Choice, DailyMeals, Exercise, MealDay, UserProfile, WeeklyPlan, Weekday, WorkoutDay,
};

pub struct PlanGenerator {
  client: OpenRouterClient,
}

impl PlanGenerator {
  pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
    Ok(Self {
      client: OpenRouterClient::new(config)?,
    })
  }

  pub fn model(&self) -> &str {
    self.client.model()
  }

  /// Never fails: remote errors are absorbed per half by the fallback.
  pub async fn generate(&self, profile: &UserProfile, metrics: &DerivedMetrics) -> WeeklyPlan {
    let context = build_context(profile, metrics);
    info!(model = %self.model(), "generating workout and meal plans in parallel");

    let (workouts, meals) = tokio::join!(
      self.generate_workouts(&context, profile),
      self.generate_meals(&context, profile, metrics),
    );

    let workouts = resolve("workouts", workouts, fallback::workouts);
    let meals = resolve("meals", meals, || fallback::meals(metrics));

    WeeklyPlan {
      user_profile: *metrics,
      workouts,
      meals,
      tracking_metrics: fallback::tracking_metrics(profile),
      notifications: fallback::notifications(),
      weekly_challenge: fallback::weekly_challenge(profile.fitness_goal),
      fitness_tips: fallback::fitness_tips(),
    }
  }

  async fn generate_workouts(
    &self,
    context: &str,
    profile: &UserProfile,
  ) -> Result<Vec<WorkoutDay>, LlmError> {
    let prompt = workout_prompt(context, profile);
    let days: HashMap<String, Vec<Exercise>> = self.client.complete_json(&prompt).await?;

    Ok(
      by_weekday(days)?
        .into_iter()
        .map(|(day, exercises)| WorkoutDay { day, exercises })
        .collect(),
    )
  }

  async fn generate_meals(
    &self,
    context: &str,
    profile: &UserProfile,
    metrics: &DerivedMetrics,
  ) -> Result<Vec<MealDay>, LlmError> {
    let prompt = meal_prompt(context, profile, metrics);
    let days: HashMap<String, DailyMeals> = self.client.complete_json(&prompt).await?;

    Ok(
      by_weekday(days)?
        .into_iter()
        .map(|(day, meals)| MealDay { day, meals })
        .collect(),
    )
  }
}

/// Pick the generated half, or log the failure and build the fallback
fn resolve<T>(section: &str, outcome: Result<T, LlmError>, substitute: impl FnOnce() -> T) -> T {
  match outcome {
    Ok(value) => {
      info!(section, "using generated {}", section);
      value
    }
    Err(e) => {
      warn!(section, error = %e, "generation failed, using fallback {}", section);
      substitute()
    }
  }
}

/// Reorder a day-keyed object Monday..Sunday. Keys match case-insensitively;
/// a missing day fails the whole half.
fn by_weekday<T>(days: HashMap<String, T>) -> Result<Vec<(Weekday, T)>, LlmError> {
  let mut by_name: HashMap<String, T> = days
    .into_iter()
    .map(|(name, value)| (name.trim().to_lowercase(), value))
    .collect();

  Weekday::ALL
    .iter()
    .map(|&day| {
      by_name
        .remove(&day.as_str().to_lowercase())
        .map(|value| (day, value))
        .ok_or_else(|| LlmError::Parse(format!("missing day {}", day.as_str())))
    })
    .collect()
}

/// ---------------------------------------------------------------------------
/// Prompts
/// ---------------------------------------------------------------------------

pub fn build_context(profile: &UserProfile, metrics: &DerivedMetrics) -> String {
  format!(
    "User Profile:\n\
     - Weight: {}kg, Height: {}cm, Age: {}, Gender: {}\n\
     - BMI: {}\n\
     - Activity Level: {}\n\
     - Fitness Goal: {}\n\
     - Dietary Preferences: {}\n\
     - Health Restrictions: {}\n\
     - Daily Calories: {} kcal\n\
     - Daily Macros: Protein {}g, Carbs {}g, Fats {}g\n",
    profile.weight_kg,
    profile.height_cm,
    profile.age,
    profile.gender.as_str(),
    metrics.bmi,
    profile.activity_level.as_str(),
    profile.fitness_goal.as_str(),
    profile.dietary_preference.as_str(),
    profile.health_restrictions,
    metrics.daily_calories,
    metrics.macros.protein_g,
    metrics.macros.carbs_g,
    metrics.macros.fats_g,
  )
}

fn workout_prompt(context: &str, profile: &UserProfile) -> String {
  format!(
    r#"{context}
Create 7-day workout plan. Return ONLY valid JSON:

{{
    "Monday": [{{"exercise_name": "name", "sets": 3, "reps": 12, "duration_minutes": 5, "intensity_level": "moderate", "equipment_required": "dumbbells"}}],
    "Tuesday": [...],
    "Wednesday": [...],
    "Thursday": [...],
    "Friday": [...],
    "Saturday": [...],
    "Sunday": [...]
}}

Rules:
- 4-5 exercises per day for goal: {goal}
- Include warm-up, main, cool-down
- Respect: {restrictions}
- Return ONLY JSON, no markdown."#,
    context = context,
    goal = profile.fitness_goal.as_str(),
    restrictions = profile.health_restrictions,
  )
}

fn meal_prompt(context: &str, profile: &UserProfile, metrics: &DerivedMetrics) -> String {
  format!(
    r#"{context}
Create 7-day meal plan. Return ONLY valid JSON with this structure:
{{"Monday": {{"breakfast": {{"meal": "name", "protein_g": 30, "carbs_g": 45, "fats_g": 15, "calories": 420}}, "lunch": {{}}, "dinner": {{}}, "snacks": []}}, "Tuesday": {{}}, "Wednesday": {{}}, "Thursday": {{}}, "Friday": {{}}, "Saturday": {{}}, "Sunday": {{}}}}

Diet: {diet}. Target: Protein {protein}g, Carbs {carbs}g, Fats {fats}g. Calories: ~{calories} kcal/day. Return ONLY JSON, no markdown."#,
    context = context,
    diet = profile.dietary_preference.as_str(),
    protein = metrics.macros.protein_g,
    carbs = metrics.macros.carbs_g,
    fats = metrics.macros.fats_g,
    calories = metrics.daily_calories,
  )
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use crate::test_utils::{
    chat_completion_body, mock_llm_config, mock_meal_plan_json, mock_profile,
    mock_workout_plan_json,
  };
  use mockito::{Matcher, Server};
  use serde_json::{json, Value};
  use std::time::{Duration, Instant};

  const WORKOUT_MARKER: &str = "Create 7-day workout plan";
  const MEAL_MARKER: &str = "Create 7-day meal plan";

  fn generator(server: &Server) -> PlanGenerator {
    let config = mock_llm_config(&format!("{}/chat/completions", server.url()));
    PlanGenerator::new(&config).unwrap()
  }

  #[test]
  fn test_context_includes_profile_and_targets() {
    let profile = mock_profile();
    let metrics = DerivedMetrics::compute(&profile);
    let context = build_context(&profile, &metrics);

    assert!(context.contains("Weight: 70kg, Height: 175cm, Age: 25, Gender: male"));
    assert!(context.contains("BMI: 22.86"));
    assert!(context.contains("Fitness Goal: muscle gain"));
    assert!(context.contains("Daily Calories: 2894 kcal"));
    assert!(context.contains("Protein 217g, Carbs 325g, Fats 80g"));
  }

  #[test]
  fn test_prompts_carry_rules() {
    let profile = mock_profile();
    let metrics = DerivedMetrics::compute(&profile);
    let context = build_context(&profile, &metrics);

    let workout = workout_prompt(&context, &profile);
    assert!(workout.starts_with("User Profile:"));
    assert!(workout.contains(WORKOUT_MARKER));
    assert!(workout.contains("Respect: none"));

    let meal = meal_prompt(&context, &profile, &metrics);
    assert!(meal.contains(MEAL_MARKER));
    assert!(meal.contains("Diet: balanced"));
    assert!(meal.contains("~2894 kcal/day"));
  }

  #[test]
  fn test_by_weekday_orders_and_ignores_case() {
    let days: HashMap<String, u32> = [
      ("sunday", 7),
      ("Monday", 1),
      ("TUESDAY", 2),
      ("Wednesday", 3),
      ("Thursday", 4),
      ("Friday", 5),
      ("Saturday", 6),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();

    let ordered = by_weekday(days).unwrap();
    let values: Vec<u32> = ordered.iter().map(|(_, v)| *v).collect();
    assert_eq!(values, vec![1, 2, 3, 4, 5, 6, 7]);
    assert_eq!(ordered[6].0, Weekday::Sunday);
  }

  #[test]
  fn test_by_weekday_missing_day_is_parse_error() {
    let days: HashMap<String, u32> = [("Monday".to_string(), 1)].into_iter().collect();
    match by_weekday(days) {
      Err(LlmError::Parse(msg)) => assert!(msg.contains("Tuesday")),
      other => panic!("expected parse error, got {:?}", other),
    }
  }

  #[tokio::test]
  async fn test_both_halves_generated() {
    // Reasoning models wrap the payload; cleaning has to see through it
    let wrapped = format!(
      "<think>\nPlan around squats.\n</think>\n```json\n{}\n```",
      mock_workout_plan_json()
    );

    let mut server = Server::new_async().await;
    server
      .mock("POST", "/chat/completions")
      .match_body(Matcher::Regex(WORKOUT_MARKER.to_string()))
      .with_status(200)
      .with_body(chat_completion_body(&wrapped))
      .create_async()
      .await;
    server
      .mock("POST", "/chat/completions")
      .match_body(Matcher::Regex(MEAL_MARKER.to_string()))
      .with_status(200)
      .with_body(chat_completion_body(&mock_meal_plan_json()))
      .create_async()
      .await;

    let profile = mock_profile();
    let metrics = DerivedMetrics::compute(&profile);
    let plan = generator(&server).generate(&profile, &metrics).await;

    assert_ne!(plan.workouts, fallback::workouts());
    assert_eq!(plan.workouts.len(), 7);
    assert_eq!(plan.workouts[0].exercises[0].exercise_name, "Barbell Back Squat");
    assert_eq!(plan.meals[0].meals.breakfast.meal, "Veggie Omelette");
    assert_eq!(plan.user_profile, metrics);
  }

  #[tokio::test]
  async fn test_workout_failure_only_replaces_workouts() {
    let mut server = Server::new_async().await;
    let workout_mock = server
      .mock("POST", "/chat/completions")
      .match_body(Matcher::Regex(WORKOUT_MARKER.to_string()))
      .with_status(500)
      .with_body(r#"{"error": {"message": "upstream overloaded"}}"#)
      .expect(1)
      .create_async()
      .await;
    let meal_mock = server
      .mock("POST", "/chat/completions")
      .match_body(Matcher::Regex(MEAL_MARKER.to_string()))
      .with_status(200)
      .with_body(chat_completion_body(&mock_meal_plan_json()))
      .expect(1)
      .create_async()
      .await;

    let profile = mock_profile();
    let metrics = DerivedMetrics::compute(&profile);
    let plan = generator(&server).generate(&profile, &metrics).await;

    assert_eq!(plan.workouts, fallback::workouts());
    assert_ne!(plan.meals, fallback::meals(&metrics));
    assert_eq!(plan.meals[0].meals.breakfast.meal, "Veggie Omelette");

    workout_mock.assert_async().await;
    meal_mock.assert_async().await;
  }

  #[tokio::test]
  async fn test_unparsable_meals_fall_back_scaled() {
    let mut server = Server::new_async().await;
    server
      .mock("POST", "/chat/completions")
      .match_body(Matcher::Regex(WORKOUT_MARKER.to_string()))
      .with_status(200)
      .with_body(chat_completion_body(&mock_workout_plan_json()))
      .create_async()
      .await;
    server
      .mock("POST", "/chat/completions")
      .match_body(Matcher::Regex(MEAL_MARKER.to_string()))
      .with_status(200)
      .with_body(chat_completion_body(r#"{"Monday": {"breakfast": {"meal": "Toast"}}}"#))
      .create_async()
      .await;

    let profile = mock_profile();
    let metrics = DerivedMetrics::compute(&profile);
    let plan = generator(&server).generate(&profile, &metrics).await;

    assert_eq!(plan.workouts[0].exercises[0].exercise_name, "Barbell Back Squat");
    assert_eq!(plan.meals, fallback::meals(&metrics));
  }

  #[tokio::test]
  async fn test_fractional_macros_keep_generated_meals() {
    let meal = |name: &str| {
      json!({
        "meal": name,
        "protein_g": 30.5,
        "carbs_g": 45,
        "fats_g": 12.5,
        "calories": 420.0
      })
    };
    let mut week = serde_json::Map::new();
    for day in Weekday::ALL {
      week.insert(
        day.as_str().to_string(),
        json!({
          "breakfast": meal("Veggie Omelette"),
          "lunch": meal("Lentil Soup"),
          "dinner": meal("Grilled Tofu")
        }),
      );
    }

    let mut server = Server::new_async().await;
    server
      .mock("POST", "/chat/completions")
      .match_body(Matcher::Regex(WORKOUT_MARKER.to_string()))
      .with_status(200)
      .with_body(chat_completion_body(&mock_workout_plan_json()))
      .create_async()
      .await;
    server
      .mock("POST", "/chat/completions")
      .match_body(Matcher::Regex(MEAL_MARKER.to_string()))
      .with_status(200)
      .with_body(chat_completion_body(&Value::Object(week).to_string()))
      .create_async()
      .await;

    let profile = mock_profile();
    let metrics = DerivedMetrics::compute(&profile);
    let plan = generator(&server).generate(&profile, &metrics).await;

    assert_ne!(plan.meals, fallback::meals(&metrics));
    let breakfast = &plan.meals[0].meals.breakfast;
    assert_eq!(breakfast.meal, "Veggie Omelette");
    assert_eq!((breakfast.protein_g, breakfast.fats_g, breakfast.calories), (30, 12, 420));
  }

  #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
  async fn test_workout_timeout_falls_back_without_blocking_meals() {
    let mut server = Server::new_async().await;
    server
      .mock("POST", "/chat/completions")
      .match_body(Matcher::Regex(WORKOUT_MARKER.to_string()))
      .with_status(200)
      .with_chunked_body(|w| {
        std::thread::sleep(Duration::from_secs(3));
        w.write_all(b"{}")
      })
      .create_async()
      .await;
    server
      .mock("POST", "/chat/completions")
      .match_body(Matcher::Regex(MEAL_MARKER.to_string()))
      .with_status(200)
      .with_body(chat_completion_body(&mock_meal_plan_json()))
      .create_async()
      .await;

    let mut config = mock_llm_config(&format!("{}/chat/completions", server.url()));
    config.timeout_secs = 1;
    let generator = PlanGenerator::new(&config).unwrap();

    let profile = mock_profile();
    let metrics = DerivedMetrics::compute(&profile);
    let started = Instant::now();
    let plan = generator.generate(&profile, &metrics).await;
    let elapsed = started.elapsed();

    assert!(elapsed < Duration::from_millis(2500), "took {:?}", elapsed);
    assert_eq!(plan.workouts, fallback::workouts());
    assert_eq!(plan.meals[0].meals.breakfast.meal, "Veggie Omelette");
  }

  #[tokio::test]
  async fn test_both_failures_yield_complete_static_plan() {
    let mut server = Server::new_async().await;
    server
      .mock("POST", "/chat/completions")
      .with_status(503)
      .expect(2)
      .create_async()
      .await;

    let profile = mock_profile();
    let metrics = DerivedMetrics::compute(&profile);
    let plan = generator(&server).generate(&profile, &metrics).await;

    assert_eq!(plan.workouts, fallback::workouts());
    assert_eq!(plan.meals, fallback::meals(&metrics));
    assert_eq!(plan.notifications.len(), 6);
    assert_eq!(plan.fitness_tips.len(), 7);
    assert_eq!(plan.weekly_challenge.title, "Muscle Gain Challenge");
    assert_eq!(plan.tracking_metrics.water_intake, "2.5 liters/day");
  }
}
