//! Static plan content
//!
//! Used wholesale for a plan half when generation fails, and always for the
//! notification, challenge and tip sections. Meal macros are scaled to the
//! profile's computed targets.

use crate::metrics::DerivedMetrics;
use crate::models::{
  ActivityLevel, DailyMeals, Exercise, FitnessGoal, FitnessTip, Gender, Meal, MealDay,
  Notification, Reps, TrackingMetrics, UserProfile, WeeklyChallenge, Weekday, WorkoutDay,
};

/// ---------------------------------------------------------------------------
/// Workouts
/// ---------------------------------------------------------------------------

/// One fixed exercise; reps are always a plain count here
struct Template {
  phase: &'static str,
  name: &'static str,
  sets: u32,
  reps: u32,
  minutes: u32,
  intensity: &'static str,
  equipment: &'static str,
  alternative: &'static str,
}

impl Template {
  fn build(&self) -> Exercise {
    Exercise {
      phase: Some(self.phase.to_string()),
      exercise_name: self.name.to_string(),
      sets: self.sets,
      reps: Reps::Count(self.reps),
      duration_minutes: self.minutes,
      intensity_level: self.intensity.to_string(),
      equipment_required: self.equipment.to_string(),
      alternative: Some(self.alternative.to_string()),
    }
  }
}

const MONDAY: &[Template] = &[
  Template {
    phase: "Warm-up",
    name: "Dynamic Stretching",
    sets: 1,
    reps: 10,
    minutes: 5,
    intensity: "easy",
    equipment: "none",
    alternative: "Light cardio",
  },
  Template {
    phase: "Main Workout",
    name: "Full Body Strength Training",
    sets: 3,
    reps: 12,
    minutes: 30,
    intensity: "moderate",
    equipment: "dumbbells",
    alternative: "Bodyweight exercises",
  },
  Template {
    phase: "Cool-down",
    name: "Stretching",
    sets: 1,
    reps: 1,
    minutes: 5,
    intensity: "easy",
    equipment: "none",
    alternative: "Walking",
  },
];

const TUESDAY: &[Template] = &[Template {
  phase: "Cardio",
  name: "Cardio Session",
  sets: 1,
  reps: 1,
  minutes: 30,
  intensity: "moderate",
  equipment: "none",
  alternative: "Walking",
}];

const WEDNESDAY: &[Template] = &[Template {
  phase: "Main Workout",
  name: "Strength Training",
  sets: 3,
  reps: 12,
  minutes: 30,
  intensity: "moderate",
  equipment: "dumbbells",
  alternative: "Bodyweight",
}];

const THURSDAY: &[Template] = &[Template {
  phase: "Rest",
  name: "Active Recovery",
  sets: 1,
  reps: 1,
  minutes: 20,
  intensity: "easy",
  equipment: "none",
  alternative: "Yoga",
}];

const FRIDAY: &[Template] = &[Template {
  phase: "Main Workout",
  name: "Full Body Workout",
  sets: 3,
  reps: 12,
  minutes: 30,
  intensity: "moderate",
  equipment: "dumbbells",
  alternative: "Bodyweight",
}];

const SATURDAY: &[Template] = &[Template {
  phase: "Cardio",
  name: "HIIT Session",
  sets: 1,
  reps: 1,
  minutes: 25,
  intensity: "hard",
  equipment: "none",
  alternative: "Jogging",
}];

const SUNDAY: &[Template] = &[Template {
  phase: "Rest",
  name: "Rest Day",
  sets: 1,
  reps: 1,
  minutes: 20,
  intensity: "easy",
  equipment: "none",
  alternative: "Light walk",
}];

fn schedule(day: Weekday) -> &'static [Template] {
  match day {
    Weekday::Monday => MONDAY,
    Weekday::Tuesday => TUESDAY,
    Weekday::Wednesday => WEDNESDAY,
    Weekday::Thursday => THURSDAY,
    Weekday::Friday => FRIDAY,
    Weekday::Saturday => SATURDAY,
    Weekday::Sunday => SUNDAY,
  }
}

pub fn workouts() -> Vec<WorkoutDay> {
  Weekday::ALL
    .iter()
    .map(|&day| WorkoutDay {
      day,
      exercises: schedule(day).iter().map(Template::build).collect(),
    })
    .collect()
}

/// ---------------------------------------------------------------------------
/// Meals
/// ---------------------------------------------------------------------------

/// Fraction of each daily target a meal covers
struct Portion {
  protein: f64,
  carbs: f64,
  fats: f64,
  calories: f64,
}

fn share(total: i64, fraction: f64) -> i64 {
  (total as f64 * fraction) as i64
}

fn meal(
  name: &str,
  description: &str,
  portion: Portion,
  alternatives: [&str; 2],
  metrics: &DerivedMetrics,
) -> Meal {
  Meal {
    meal: name.to_string(),
    description: Some(description.to_string()),
    protein_g: share(metrics.macros.protein_g, portion.protein),
    carbs_g: share(metrics.macros.carbs_g, portion.carbs),
    fats_g: share(metrics.macros.fats_g, portion.fats),
    calories: share(metrics.daily_calories, portion.calories),
    alternatives: alternatives.iter().map(|s| s.to_string()).collect(),
  }
}

fn daily_meals(metrics: &DerivedMetrics) -> DailyMeals {
  let snack_portion = || Portion { protein: 0.05, carbs: 0.05, fats: 0.075, calories: 0.05 };

  DailyMeals {
    breakfast: meal(
      "Protein Oatmeal",
      "Oats with protein powder and berries",
      Portion { protein: 0.25, carbs: 0.30, fats: 0.25, calories: 0.25 },
      ["Greek yogurt parfait", "Egg white omelet"],
      metrics,
    ),
    lunch: meal(
      "Chicken and Rice Bowl",
      "Grilled chicken with brown rice and vegetables",
      Portion { protein: 0.35, carbs: 0.35, fats: 0.35, calories: 0.35 },
      ["Turkey wrap", "Salmon salad"],
      metrics,
    ),
    dinner: meal(
      "Lean Protein Dinner",
      "Lean meat with vegetables and complex carbs",
      Portion { protein: 0.30, carbs: 0.25, fats: 0.30, calories: 0.30 },
      ["Fish with quinoa", "Tofu stir-fry"],
      metrics,
    ),
    snacks: vec![
      meal(
        "Protein Snack",
        "Greek yogurt with nuts",
        snack_portion(),
        ["Protein bar", "Cottage cheese"],
        metrics,
      ),
      meal(
        "Energy Snack",
        "Fruit with nut butter",
        snack_portion(),
        ["Trail mix", "Rice cakes"],
        metrics,
      ),
    ],
  }
}

/// Same menu every day, scaled to the profile's targets
pub fn meals(metrics: &DerivedMetrics) -> Vec<MealDay> {
  let menu = daily_meals(metrics);
  Weekday::ALL
    .iter()
    .map(|&day| MealDay {
      day,
      meals: menu.clone(),
    })
    .collect()
}

/// ---------------------------------------------------------------------------
/// Always-Static Sections
/// ---------------------------------------------------------------------------

pub fn tracking_metrics(profile: &UserProfile) -> TrackingMetrics {
  let water_liters = match profile.gender {
    Gender::Male => 2.5,
    Gender::Female => 2.0,
  };
  let steps = match profile.activity_level {
    ActivityLevel::Sedentary | ActivityLevel::Moderate => 8000,
    ActivityLevel::Light | ActivityLevel::Active | ActivityLevel::VeryActive => 10000,
  };

  TrackingMetrics {
    weight: format!("{} kg", profile.weight_kg),
    body_fat: "Track weekly".to_string(),
    muscle_mass: "Track weekly".to_string(),
    water_intake: format!("{:.1} liters/day", water_liters),
    sleep_hours: "7-8 hours/night".to_string(),
    steps: format!("{} steps/day", steps),
  }
}

pub fn notifications() -> Vec<Notification> {
  [
    ("07:00", "workout", "💪 Time for your workout!"),
    ("08:00", "breakfast", "🥗 Breakfast time!"),
    ("12:30", "lunch", "🍽️ Lunch break!"),
    ("15:00", "snack", "🥜 Healthy snack time!"),
    ("19:00", "dinner", "🍴 Dinner time!"),
    ("22:00", "sleep_prep", "😴 Time to wind down!"),
  ]
  .iter()
  .map(|(time, kind, message)| Notification {
    time: time.to_string(),
    kind: kind.to_string(),
    message: message.to_string(),
  })
  .collect()
}

pub fn weekly_challenge(goal: FitnessGoal) -> WeeklyChallenge {
  use crate::models::Choice;

  WeeklyChallenge {
    title: format!("{} Challenge", goal.title()),
    description: format!("Stay consistent with your {} program this week", goal.as_str()),
    goal: "Complete all workouts and track your meals".to_string(),
    reward: "Improved fitness and progress toward your goal".to_string(),
  }
}

const DAILY_TIPS: [&str; 7] = [
  "Stay consistent with your workouts",
  "Proper nutrition is key to results",
  "Rest and recovery are essential",
  "Focus on form over weight",
  "Stay hydrated throughout the day",
  "Get adequate sleep for recovery",
  "Reflect on your weekly progress",
];

pub fn fitness_tips() -> Vec<FitnessTip> {
  Weekday::ALL
    .iter()
    .zip(DAILY_TIPS)
    .map(|(&day, tip)| FitnessTip {
      day,
      tip: tip.to_string(),
      motivation: "Keep pushing forward!".to_string(),
    })
    .collect()
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
