//! Deterministic metrics layer
//!
//! BMI, BMR (Mifflin-St Jeor), TDEE and macro targets. The model is handed
//! these pre-computed numbers rather than being asked to do the math itself.

use serde::{Deserialize, Serialize};

use crate::models::{ActivityLevel, FitnessGoal, Gender, UserProfile};

const PROTEIN_KCAL_PER_G: f64 = 4.0;
const CARBS_KCAL_PER_G: f64 = 4.0;
const FATS_KCAL_PER_G: f64 = 9.0;

/// ---------------------------------------------------------------------------
/// Basic Formulas
/// ---------------------------------------------------------------------------

/// Body Mass Index, rounded to 2 decimals
pub fn bmi(weight_kg: f64, height_cm: f64) -> f64 {
  let height_m = height_cm / 100.0;
  let raw = weight_kg / (height_m * height_m);
  (raw * 100.0).round() / 100.0
}

/// Basal Metabolic Rate (Mifflin-St Jeor)
pub fn bmr(weight_kg: f64, height_cm: f64, age: u32, gender: Gender) -> f64 {
  let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age);
  match gender {
    Gender::Male => base + 5.0,
    Gender::Female => base - 161.0,
  }
}

impl ActivityLevel {
  pub fn multiplier(&self) -> f64 {
    match self {
      ActivityLevel::Sedentary => 1.2,
      ActivityLevel::Light => 1.375,
      ActivityLevel::Moderate => 1.55,
      ActivityLevel::Active => 1.725,
      ActivityLevel::VeryActive => 1.9,
    }
  }
}

/// Total Daily Energy Expenditure
pub fn tdee(bmr: f64, activity: ActivityLevel) -> f64 {
  bmr * activity.multiplier()
}

/// ---------------------------------------------------------------------------
/// Goal Adjustments
/// ---------------------------------------------------------------------------

/// Share of daily calories per macronutrient
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacroRatios {
  pub protein: f64,
  pub carbs: f64,
  pub fats: f64,
}

impl FitnessGoal {
  /// Daily kcal offset applied to TDEE
  pub fn calorie_adjustment(&self) -> i64 {
    match self {
      FitnessGoal::WeightLoss => -500,
      FitnessGoal::MuscleGain => 300,
      FitnessGoal::Maintenance | FitnessGoal::Endurance => 0,
    }
  }

  pub fn macro_ratios(&self) -> MacroRatios {
    match self {
      FitnessGoal::MuscleGain => MacroRatios { protein: 0.30, carbs: 0.45, fats: 0.25 },
      FitnessGoal::WeightLoss => MacroRatios { protein: 0.35, carbs: 0.35, fats: 0.30 },
      FitnessGoal::Maintenance | FitnessGoal::Endurance => {
        MacroRatios { protein: 0.25, carbs: 0.45, fats: 0.30 }
      }
    }
  }
}

/// Goal-adjusted calorie target, truncated toward zero
pub fn target_calories(tdee: f64, goal: FitnessGoal) -> i64 {
  (tdee + goal.calorie_adjustment() as f64) as i64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Macros {
  pub protein_g: i64,
  pub carbs_g: i64,
  pub fats_g: i64,
}

impl Macros {
  pub fn compute(calories: i64, goal: FitnessGoal) -> Self {
    let ratios = goal.macro_ratios();
    let kcal = calories as f64;
    Self {
      protein_g: (kcal * ratios.protein / PROTEIN_KCAL_PER_G) as i64,
      carbs_g: (kcal * ratios.carbs / CARBS_KCAL_PER_G) as i64,
      fats_g: (kcal * ratios.fats / FATS_KCAL_PER_G) as i64,
    }
  }
}

/// ---------------------------------------------------------------------------
/// Derived Metrics (per profile)
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedMetrics {
  pub bmi: f64,
  pub daily_calories: i64,
  pub macros: Macros,
}

impl DerivedMetrics {
  pub fn compute(profile: &UserProfile) -> Self {
    let breakdown = CalorieBreakdown::compute(
      profile.weight_kg,
      profile.height_cm,
      profile.age,
      profile.gender,
      profile.activity_level,
      profile.fitness_goal,
    );

    Self {
      bmi: bmi(profile.weight_kg, profile.height_cm),
      daily_calories: breakdown.target_calories,
      macros: breakdown.macros,
    }
  }
}

/// Full calorie derivation, including the intermediate BMR and TDEE
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalorieBreakdown {
  pub bmr: i64,
  pub tdee: i64,
  pub target_calories: i64,
  pub adjustment: i64,
  pub macros: Macros,
}

impl CalorieBreakdown {
  pub fn compute(
    weight_kg: f64,
    height_cm: f64,
    age: u32,
    gender: Gender,
    activity: ActivityLevel,
    goal: FitnessGoal,
  ) -> Self {
    let bmr = bmr(weight_kg, height_cm, age, gender);
    let tdee = tdee(bmr, activity);
    let target = target_calories(tdee, goal);

    Self {
      bmr: bmr as i64,
      tdee: tdee as i64,
      target_calories: target,
      adjustment: goal.calorie_adjustment(),
      macros: Macros::compute(target, goal),
    }
  }
}

/// ---------------------------------------------------------------------------
/// BMI Categories
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BmiCategory {
  Underweight,
  Normal,
  Overweight,
  Obese,
}

impl BmiCategory {
  pub fn from_bmi(bmi: f64) -> Self {
    match bmi {
      b if b < 18.5 => BmiCategory::Underweight,
      b if b < 25.0 => BmiCategory::Normal,
      b if b < 30.0 => BmiCategory::Overweight,
      _ => BmiCategory::Obese,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      BmiCategory::Underweight => "Underweight",
      BmiCategory::Normal => "Normal weight",
      BmiCategory::Overweight => "Overweight",
      BmiCategory::Obese => "Obese",
    }
  }

  pub fn recommendation(&self) -> &'static str {
    match self {
      BmiCategory::Underweight => "Consider muscle gain program",
      BmiCategory::Normal => "Maintain your healthy weight",
      BmiCategory::Overweight => "Consider weight loss program",
      BmiCategory::Obese => "Consult with healthcare provider and consider weight loss program",
    }
  }
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
