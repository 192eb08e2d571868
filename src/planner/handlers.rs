use axum::{extract::State, routing::post, Json, Router};
use tracing::instrument;

use super::dto::{
    DailyPlanResponse, MealRecommendation, MealRecommendationRequest, WeeklyPlanResponse,
};
use super::services;
use crate::{
    auth::services::AuthUser,
    error::AppResult,
    profile::repo_types::ProfileSettings,
    profile::services::{load_profile, require_completed},
    state::AppState,
};
use uuid::Uuid;

pub fn planner_routes() -> Router<AppState> {
    Router::new()
        .route("/ai/meal-recommendation", post(meal_recommendation))
        .route("/ai/daily-plan", post(daily_plan))
        .route("/ai/weekly-plan", post(weekly_plan))
}

async fn completed_settings(state: &AppState, user_id: Uuid) -> AppResult<ProfileSettings> {
    let profile = load_profile(&state.db, user_id).await?;
    require_completed(&profile)?;
    Ok(profile.settings)
}

#[instrument(skip(state))]
pub async fn meal_recommendation(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<MealRecommendationRequest>,
) -> AppResult<Json<MealRecommendation>> {
    let settings = completed_settings(&state, user_id).await?;
    Ok(Json(
        services::recommend_meal(&state, &settings, payload.meal_type).await?,
    ))
}

#[instrument(skip(state))]
pub async fn daily_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<DailyPlanResponse>> {
    let settings = completed_settings(&state, user_id).await?;
    Ok(Json(services::daily_plan(state.llm.as_ref(), &settings).await?))
}

#[instrument(skip(state))]
pub async fn weekly_plan(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<WeeklyPlanResponse>> {
    let settings = completed_settings(&state, user_id).await?;
    Ok(Json(services::weekly_plan(state.llm.as_ref(), &settings).await?))
}
