//! User profile and request-boundary validation
//!
//! Payloads arrive as loose JSON. Everything is checked here (presence,
//! numeric type, practical range, enum membership) so the calculator and
//! planner only ever see a well-formed `UserProfile`.

use serde_json::{Map, Value};
use thiserror::Error;

/// ---------------------------------------------------------------------------
/// Validation Errors
/// ---------------------------------------------------------------------------

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
  #[error("Invalid JSON body")]
  NotAnObject,

  #[error("Missing required fields: {}", .0.join(", "))]
  MissingFields(Vec<&'static str>),

  /// Carries the first offending field; the message stays generic
  #[error("Invalid data types for weight, height, or age")]
  InvalidNumber(&'static str),

  #[error("{label} must be between 1 and {max} {unit}")]
  OutOfRange {
    label: &'static str,
    max: u32,
    unit: &'static str,
  },

  #[error("{label} must be one of: {allowed}")]
  InvalidChoice {
    label: &'static str,
    allowed: String,
  },
}

/// ---------------------------------------------------------------------------
/// Categorical Selections
/// ---------------------------------------------------------------------------

/// A closed set of string choices accepted at the boundary.
pub trait Choice: Copy + 'static {
  const ALL: &'static [Self];
  const LABEL: &'static str;

  fn as_str(&self) -> &'static str;

  /// Case-insensitive lookup against `as_str`
  fn parse(raw: &str) -> Option<Self> {
    let normalized = raw.trim().to_lowercase();
    Self::ALL.iter().copied().find(|c| c.as_str() == normalized)
  }

  fn allowed() -> String {
    Self::ALL
      .iter()
      .map(|c| c.as_str())
      .collect::<Vec<_>>()
      .join(", ")
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
  Male,
  Female,
}

impl Choice for Gender {
  const ALL: &'static [Self] = &[Gender::Male, Gender::Female];
  const LABEL: &'static str = "Gender";

  fn as_str(&self) -> &'static str {
    match self {
      Gender::Male => "male",
      Gender::Female => "female",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityLevel {
  Sedentary,
  Light,
  Moderate,
  Active,
  VeryActive,
}

impl Choice for ActivityLevel {
  const ALL: &'static [Self] = &[
    ActivityLevel::Sedentary,
    ActivityLevel::Light,
    ActivityLevel::Moderate,
    ActivityLevel::Active,
    ActivityLevel::VeryActive,
  ];
  const LABEL: &'static str = "Activity level";

  fn as_str(&self) -> &'static str {
    match self {
      ActivityLevel::Sedentary => "sedentary",
      ActivityLevel::Light => "light",
      ActivityLevel::Moderate => "moderate",
      ActivityLevel::Active => "active",
      ActivityLevel::VeryActive => "very_active",
    }
  }

  // Older clients send "very active" with a space
  fn parse(raw: &str) -> Option<Self> {
    let normalized = raw.trim().to_lowercase().replace(' ', "_");
    Self::ALL.iter().copied().find(|c| c.as_str() == normalized)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitnessGoal {
  WeightLoss,
  MuscleGain,
  Maintenance,
  Endurance,
}

impl FitnessGoal {
  /// Title-cased form used in user-facing copy ("Muscle Gain")
  pub fn title(&self) -> &'static str {
    match self {
      FitnessGoal::WeightLoss => "Weight Loss",
      FitnessGoal::MuscleGain => "Muscle Gain",
      FitnessGoal::Maintenance => "Maintenance",
      FitnessGoal::Endurance => "Endurance",
    }
  }
}

impl Choice for FitnessGoal {
  const ALL: &'static [Self] = &[
    FitnessGoal::WeightLoss,
    FitnessGoal::MuscleGain,
    FitnessGoal::Maintenance,
    FitnessGoal::Endurance,
  ];
  const LABEL: &'static str = "Fitness goal";

  fn as_str(&self) -> &'static str {
    match self {
      FitnessGoal::WeightLoss => "weight loss",
      FitnessGoal::MuscleGain => "muscle gain",
      FitnessGoal::Maintenance => "maintenance",
      FitnessGoal::Endurance => "endurance",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DietaryPreference {
  Vegetarian,
  Vegan,
  Keto,
  Balanced,
}

impl Choice for DietaryPreference {
  const ALL: &'static [Self] = &[
    DietaryPreference::Vegetarian,
    DietaryPreference::Vegan,
    DietaryPreference::Keto,
    DietaryPreference::Balanced,
  ];
  const LABEL: &'static str = "Dietary preference";

  fn as_str(&self) -> &'static str {
    match self {
      DietaryPreference::Vegetarian => "vegetarian",
      DietaryPreference::Vegan => "vegan",
      DietaryPreference::Keto => "keto",
      DietaryPreference::Balanced => "balanced",
    }
  }
}

/// ---------------------------------------------------------------------------
/// Numeric Bounds
/// ---------------------------------------------------------------------------

/// Practical range for a numeric field: `0 < value <= max`
#[derive(Debug, Clone, Copy)]
pub struct Bound {
  pub field: &'static str,
  pub label: &'static str,
  pub max: u32,
  pub unit: &'static str,
  /// Truncate to a whole number before the range check
  pub whole: bool,
}

pub const WEIGHT: Bound = Bound {
  field: "weight",
  label: "Weight",
  max: 300,
  unit: "kg",
  whole: false,
};

pub const HEIGHT: Bound = Bound {
  field: "height",
  label: "Height",
  max: 250,
  unit: "cm",
  whole: false,
};

pub const AGE: Bound = Bound {
  field: "age",
  label: "Age",
  max: 120,
  unit: "years",
  whole: true,
};

/// ---------------------------------------------------------------------------
/// Payload Access
/// ---------------------------------------------------------------------------

/// Typed accessors over a raw JSON request body
pub struct PayloadFields<'a> {
  map: &'a Map<String, Value>,
}

impl<'a> PayloadFields<'a> {
  pub fn new(payload: &'a Value) -> Result<Self, ValidationError> {
    payload
      .as_object()
      .map(|map| Self { map })
      .ok_or(ValidationError::NotAnObject)
  }

  fn get(&self, field: &str) -> Option<&'a Value> {
    self.map.get(field).filter(|v| !v.is_null())
  }

  /// Report every absent field at once, in the order given
  pub fn require(&self, fields: &[&'static str]) -> Result<(), ValidationError> {
    let missing: Vec<&'static str> = fields
      .iter()
      .copied()
      .filter(|f| self.get(f).is_none())
      .collect();

    if missing.is_empty() {
      Ok(())
    } else {
      Err(ValidationError::MissingFields(missing))
    }
  }

  /// A JSON number or a numeric string
  pub fn number(&self, field: &'static str) -> Result<f64, ValidationError> {
    let value = match self.get(field) {
      Some(Value::Number(n)) => n.as_f64(),
      Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
      _ => None,
    };

    value
      .filter(|v| v.is_finite())
      .ok_or(ValidationError::InvalidNumber(field))
  }

  pub fn bounded(&self, bound: Bound) -> Result<f64, ValidationError> {
    let mut value = self.number(bound.field)?;
    if bound.whole {
      value = value.trunc();
    }

    if value <= 0.0 || value > f64::from(bound.max) {
      return Err(ValidationError::OutOfRange {
        label: bound.label,
        max: bound.max,
        unit: bound.unit,
      });
    }

    Ok(value)
  }

  pub fn choice<T: Choice>(&self, field: &'static str) -> Result<T, ValidationError> {
    self
      .get(field)
      .and_then(Value::as_str)
      .and_then(T::parse)
      .ok_or_else(|| ValidationError::InvalidChoice {
        label: T::LABEL,
        allowed: T::allowed(),
      })
  }

  /// Optional free text; blank strings count as absent
  pub fn text(&self, field: &str) -> Option<String> {
    self
      .get(field)
      .and_then(Value::as_str)
      .map(str::trim)
      .filter(|s| !s.is_empty())
      .map(str::to_string)
  }
}

/// ---------------------------------------------------------------------------
/// User Profile
/// ---------------------------------------------------------------------------

pub const PROFILE_FIELDS: [&str; 7] = [
  "weight",
  "height",
  "age",
  "gender",
  "activity_level",
  "fitness_goal",
  "dietary_preferences",
];

const NO_RESTRICTIONS: &str = "none";

#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
  pub weight_kg: f64,
  pub height_cm: f64,
  pub age: u32,
  pub gender: Gender,
  pub activity_level: ActivityLevel,
  pub fitness_goal: FitnessGoal,
  pub dietary_preference: DietaryPreference,
  pub health_restrictions: String,
}

impl UserProfile {
  /// Validate a plan request body.
  ///
  /// Checks run in a fixed order: presence, numeric type, range, then enum
  /// membership. The first failing stage is reported.
  pub fn from_payload(payload: &Value) -> Result<Self, ValidationError> {
    let fields = PayloadFields::new(payload)?;
    fields.require(&PROFILE_FIELDS)?;

    for bound in [WEIGHT, HEIGHT, AGE] {
      fields.number(bound.field)?;
    }
    let weight_kg = fields.bounded(WEIGHT)?;
    let height_cm = fields.bounded(HEIGHT)?;
    let age = fields.bounded(AGE)? as u32;

    Ok(Self {
      weight_kg,
      height_cm,
      age,
      gender: fields.choice("gender")?,
      activity_level: fields.choice("activity_level")?,
      fitness_goal: fields.choice("fitness_goal")?,
      dietary_preference: fields.choice("dietary_preferences")?,
      health_restrictions: fields
        .text("health_restrictions")
        .map(|s| s.to_lowercase())
        .unwrap_or_else(|| NO_RESTRICTIONS.to_string()),
    })
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
