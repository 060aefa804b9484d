use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::metrics::DerivedMetrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Weekday {
  Monday,
  Tuesday,
  Wednesday,
  Thursday,
  Friday,
  Saturday,
  Sunday,
}

impl Weekday {
  pub const ALL: [Weekday; 7] = [
    Weekday::Monday,
    Weekday::Tuesday,
    Weekday::Wednesday,
    Weekday::Thursday,
    Weekday::Friday,
    Weekday::Saturday,
    Weekday::Sunday,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      Weekday::Monday => "Monday",
      Weekday::Tuesday => "Tuesday",
      Weekday::Wednesday => "Wednesday",
      Weekday::Thursday => "Thursday",
      Weekday::Friday => "Friday",
      Weekday::Saturday => "Saturday",
      Weekday::Sunday => "Sunday",
    }
  }
}

/// ---------------------------------------------------------------------------
/// Lenient Numbers
/// ---------------------------------------------------------------------------

/// Any JSON shape a model uses for a number
#[derive(Deserialize)]
#[serde(untagged)]
enum LooseNumber {
  Int(i64),
  Float(f64),
  Text(String),
}

impl LooseNumber {
  fn as_f64(&self) -> Option<f64> {
    match self {
      LooseNumber::Int(n) => Some(*n as f64),
      LooseNumber::Float(f) => Some(*f),
      LooseNumber::Text(s) => s.trim().parse().ok(),
    }
  }
}

/// Accept an integer, float or numeric string and truncate toward zero
fn truncated<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
  D: Deserializer<'de>,
  T: TryFrom<i64>,
{
  let raw = LooseNumber::deserialize(deserializer)?;
  let value = raw
    .as_f64()
    .filter(|v| v.is_finite())
    .ok_or_else(|| D::Error::custom("expected a number"))?;

  T::try_from(value.trunc() as i64)
    .map_err(|_| D::Error::custom(format!("number out of range: {}", value)))
}

/// ---------------------------------------------------------------------------
/// Workouts
/// ---------------------------------------------------------------------------

/// Rep target: models write either a count or a range like "8-12"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reps {
  Count(#[serde(deserialize_with = "truncated")] u32),
  Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub phase: Option<String>,
  pub exercise_name: String,
  #[serde(deserialize_with = "truncated")]
  pub sets: u32,
  pub reps: Reps,
  #[serde(deserialize_with = "truncated")]
  pub duration_minutes: u32,
  pub intensity_level: String,
  pub equipment_required: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub alternative: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutDay {
  pub day: Weekday,
  pub exercises: Vec<Exercise>,
}

/// ---------------------------------------------------------------------------
/// Meals
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meal {
  pub meal: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  #[serde(deserialize_with = "truncated")]
  pub protein_g: i64,
  #[serde(deserialize_with = "truncated")]
  pub carbs_g: i64,
  #[serde(deserialize_with = "truncated")]
  pub fats_g: i64,
  #[serde(deserialize_with = "truncated")]
  pub calories: i64,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub alternatives: Vec<String>,
}

/// One day of eating, as the model is asked to return it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyMeals {
  pub breakfast: Meal,
  pub lunch: Meal,
  pub dinner: Meal,
  #[serde(default)]
  pub snacks: Vec<Meal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealDay {
  pub day: Weekday,
  #[serde(flatten)]
  pub meals: DailyMeals,
}

/// ---------------------------------------------------------------------------
/// Static Plan Sections
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingMetrics {
  pub weight: String,
  pub body_fat: String,
  pub muscle_mass: String,
  pub water_intake: String,
  pub sleep_hours: String,
  pub steps: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
  pub time: String,
  #[serde(rename = "type")]
  pub kind: String,
  pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyChallenge {
  pub title: String,
  pub description: String,
  pub goal: String,
  pub reward: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessTip {
  pub day: Weekday,
  pub tip: String,
  pub motivation: String,
}

/// ---------------------------------------------------------------------------
/// Assembled Plan
/// ---------------------------------------------------------------------------

/// Everything returned for one plan request.
///
/// `workouts` and `meals` each come wholesale from either the model or the
/// fallback templates; the remaining sections are always static.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyPlan {
  pub user_profile: DerivedMetrics,
  pub workouts: Vec<WorkoutDay>,
  pub meals: Vec<MealDay>,
  pub tracking_metrics: TrackingMetrics,
  pub notifications: Vec<Notification>,
  pub weekly_challenge: WeeklyChallenge,
  pub fitness_tips: Vec<FitnessTip>,
}
