use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::{CreateMealLogRequest, DayLogs, DayQuery, WeekQuery, WeeklySummary};
use super::repo;
use super::repo_types::MealLog;
use super::services::{daily_totals, day_or_today, format_day, validate, week_start};
use crate::{
    auth::services::AuthUser,
    error::{ensure_owner, AppError, AppResult},
    nutrition::NutritionSnapshot,
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/meal-logs", get(list_day).post(create_log))
        .route("/meal-logs/weekly", get(weekly))
}

pub fn write_routes() -> Router<AppState> {
    Router::new().route("/meal-logs/:id", delete(delete_log))
}

#[instrument(skip(state, payload))]
pub async fn create_log(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateMealLogRequest>,
) -> AppResult<(StatusCode, Json<MealLog>)> {
    let new_log = validate(&payload)?;
    let row = repo::insert(&state.db, user_id, &new_log).await?;
    info!(%user_id, log_id = %row.id, meal_type = new_log.meal_type.as_str(), "meal logged");
    Ok((StatusCode::CREATED, Json(MealLog::try_from(row)?)))
}

#[instrument(skip(state))]
pub async fn list_day(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<DayQuery>,
) -> AppResult<Json<DayLogs>> {
    let day = day_or_today(q.date.as_deref())?;
    let rows = repo::list_between(&state.db, user_id, day, day).await?;
    let totals: NutritionSnapshot = rows.iter().map(|r| r.nutrition()).sum();
    let logs = rows
        .into_iter()
        .map(MealLog::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(DayLogs {
        date: format_day(day),
        logs,
        totals,
    }))
}

#[instrument(skip(state))]
pub async fn weekly(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(q): Query<WeekQuery>,
) -> AppResult<Json<WeeklySummary>> {
    let end = day_or_today(q.end.as_deref())?;
    let start = week_start(end)?;
    let rows = repo::list_between(&state.db, user_id, start, end).await?;
    Ok(Json(WeeklySummary {
        start: format_day(start),
        end: format_day(end),
        days: daily_totals(start, end, &rows),
    }))
}

#[instrument(skip(state))]
pub async fn delete_log(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let existing = repo::find_by_id(&state.db, id)
        .await?
        .ok_or(AppError::NotFound("meal log"))?;
    ensure_owner(existing.user_id, user_id, "meal log")?;
    if !repo::delete(&state.db, id, user_id).await? {
        return Err(AppError::NotFound("meal log"));
    }
    info!(%user_id, log_id = %id, "meal log deleted");
    Ok(StatusCode::NO_CONTENT)
}
