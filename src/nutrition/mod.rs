pub mod calculator;
pub mod distribution;
pub mod snapshot;

pub use calculator::{
    daily_targets, ActivityLevel, BodyMetrics, FitnessGoal, Gender, MacroTargets,
};
pub use distribution::{split_for_meal, MealType, NutrientRange};
pub use snapshot::NutritionSnapshot;
