use serde::{Deserialize, Serialize};

use super::schema::{DailyPlan, MealSearchParams, WeeklyPlan};
use crate::nutrition::{MacroTargets, MealType};
use crate::recipes::dto::SearchResponse;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MealRecommendationRequest {
    pub meal_type: MealType,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealRecommendation {
    pub meal_type: MealType,
    pub targets: MacroTargets,
    pub search_params: MealSearchParams,
    pub recipes: SearchResponse,
}

#[derive(Debug, Serialize)]
pub struct DailyPlanResponse {
    pub targets: MacroTargets,
    pub plan: DailyPlan,
}

#[derive(Debug, Serialize)]
pub struct WeeklyPlanResponse {
    pub targets: MacroTargets,
    pub plan: WeeklyPlan,
}
