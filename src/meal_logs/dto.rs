use serde::{Deserialize, Serialize};

use super::repo_types::MealLog;
use crate::nutrition::{MealType, NutritionSnapshot};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMealLogRequest {
    /// `YYYY-MM-DD`; today (UTC) when absent.
    pub date: Option<String>,
    pub recipe_id: String,
    pub recipe_title: String,
    pub nutrition: NutritionSnapshot,
    pub meal_type: MealType,
}

#[derive(Debug, Deserialize)]
pub struct DayQuery {
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WeekQuery {
    pub end: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DayLogs {
    pub date: String,
    pub logs: Vec<MealLog>,
    pub totals: NutritionSnapshot,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DayTotal {
    pub date: String,
    pub meal_count: usize,
    pub totals: NutritionSnapshot,
}

#[derive(Debug, Serialize)]
pub struct WeeklySummary {
    pub start: String,
    pub end: String,
    pub days: Vec<DayTotal>,
}
