pub mod plan;
pub mod profile;

pub use plan::{
  DailyMeals, Exercise, FitnessTip, Meal, MealDay, Notification, Reps, TrackingMetrics,
  WeeklyChallenge, WeeklyPlan, Weekday, WorkoutDay,
};
pub use profile::{
  ActivityLevel, Choice, DietaryPreference, FitnessGoal, Gender, PayloadFields, UserProfile,
  ValidationError,
};
