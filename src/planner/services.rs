use tracing::{info, warn};

use super::dto::{DailyPlanResponse, MealRecommendation, WeeklyPlanResponse};
use super::prompts;
use super::schema::{decode_strict, DailyPlan, MealSearchParams, PlanSchema, WeeklyPlan};
use crate::error::{AppError, AppResult};
use crate::llm::{CompletionClient, CompletionRequest};
use crate::nutrition::{daily_targets, split_for_meal, MacroTargets, MealType};
use crate::profile::repo_types::ProfileSettings;
use crate::recipe_api::RecipeQuery;
use crate::recipes::services::search_merged;
use crate::state::AppState;

/// One completion call, decoded strictly. Any failure is an upstream error
/// and nothing partial is returned.
pub async fn request_plan<T: PlanSchema>(
    llm: &dyn CompletionClient,
    req: &CompletionRequest,
) -> AppResult<T> {
    let raw = llm.complete(req).await.map_err(|e| {
        warn!(error = %e, "completion call failed");
        AppError::Upstream(e.to_string())
    })?;
    decode_strict::<T>(&raw).map_err(|e| {
        warn!(error = %e, raw_len = raw.len(), "completion output rejected");
        AppError::Upstream(e.to_string())
    })
}

/// Ask the model for search parameters for one meal of the day.
pub async fn meal_search_params(
    llm: &dyn CompletionClient,
    settings: &ProfileSettings,
    meal: MealType,
) -> AppResult<(MacroTargets, MealSearchParams)> {
    let daily = daily_targets(&settings.body_metrics());
    let targets = split_for_meal(&daily, meal.as_str());
    let req = prompts::meal_search(settings, meal, &targets);
    let params: MealSearchParams = request_plan(llm, &req).await?;
    if params.meal_type != meal {
        return Err(AppError::Upstream(format!(
            "asked for {} parameters, got {}",
            meal.as_str(),
            params.meal_type.as_str()
        )));
    }
    Ok((targets, params))
}

pub fn query_for(params: &MealSearchParams) -> RecipeQuery {
    RecipeQuery {
        diet: params.diet.as_query().map(str::to_string),
        exclude_ingredients: params.exclude_ingredients.clone(),
        number: params.number_of_recipes,
        ..Default::default()
    }
    .with_range(&params.nutrient_targets)
}

pub async fn recommend_meal(
    state: &AppState,
    settings: &ProfileSettings,
    meal: MealType,
) -> AppResult<MealRecommendation> {
    let (targets, params) = meal_search_params(state.llm.as_ref(), settings, meal).await?;
    let recipes = search_merged(state, &query_for(&params)).await?;
    info!(meal = meal.as_str(), results = recipes.results.len(), "meal recommendation ready");
    Ok(MealRecommendation {
        meal_type: meal,
        targets,
        search_params: params,
        recipes,
    })
}

pub async fn daily_plan(
    llm: &dyn CompletionClient,
    settings: &ProfileSettings,
) -> AppResult<DailyPlanResponse> {
    let targets = daily_targets(&settings.body_metrics());
    let plan: DailyPlan = request_plan(llm, &prompts::daily_plan(settings, &targets)).await?;
    Ok(DailyPlanResponse { targets, plan })
}

pub async fn weekly_plan(
    llm: &dyn CompletionClient,
    settings: &ProfileSettings,
) -> AppResult<WeeklyPlanResponse> {
    let targets = daily_targets(&settings.body_metrics());
    let plan: WeeklyPlan = request_plan(llm, &prompts::weekly_plan(settings, &targets)).await?;
    Ok(WeeklyPlanResponse { targets, plan })
}
