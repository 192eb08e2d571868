use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};

use super::dto::{MacrosResponse, ProfileUpdate};
use super::repo;
use super::repo_types::UserProfile;
use super::services::{apply_update, load_profile, macros_for};
use crate::{
    auth::services::AuthUser,
    error::{AppError, AppResult},
    state::AppState,
};

pub fn profile_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile).put(update_profile))
        .route("/profile/macros", get(get_macros))
}

#[instrument(skip(state))]
pub async fn get_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<UserProfile>> {
    Ok(Json(load_profile(&state.db, user_id).await?))
}

#[instrument(skip(state, payload))]
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<ProfileUpdate>,
) -> AppResult<Json<UserProfile>> {
    let current = load_profile(&state.db, user_id).await?;
    let next = apply_update(&current.settings, payload)?;
    let row = repo::update(&state.db, user_id, &next)
        .await?
        .ok_or(AppError::NotFound("profile"))?;
    info!(%user_id, "profile updated");
    Ok(Json(row.into()))
}

#[instrument(skip(state))]
pub async fn get_macros(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<MacrosResponse>> {
    let profile = load_profile(&state.db, user_id).await?;
    Ok(Json(macros_for(&profile.settings)))
}
