use serde::{Deserialize, Serialize};

use crate::nutrition::{ActivityLevel, FitnessGoal, Gender, MacroTargets};

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub age: Option<i32>,
    pub gender: Option<Gender>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub activity_level: Option<ActivityLevel>,
    pub fitness_goal: Option<FitnessGoal>,
    pub diet_preference: Option<String>,
    pub allergies: Option<Vec<String>>,
    pub preferred_cuisines: Option<Vec<String>>,
    pub meals_per_day: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct MealSplit {
    pub breakfast: MacroTargets,
    pub lunch: MacroTargets,
    pub dinner: MacroTargets,
}

#[derive(Debug, Serialize)]
pub struct MacrosResponse {
    pub bmr: f64,
    pub tdee: f64,
    pub daily: MacroTargets,
    pub meals: MealSplit,
}
