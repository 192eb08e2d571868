use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use tracing::{info, instrument};

use super::repo_types::{AddFavoriteRequest, Favorite, FavoriteRow};
use crate::{
    auth::services::AuthUser,
    error::{AppError, AppResult},
    state::AppState,
};

pub fn favorite_routes() -> Router<AppState> {
    Router::new()
        .route("/favorites", get(list_favorites).post(add_favorite))
        .route("/favorites/:recipe_id", delete(remove_favorite))
}

#[instrument(skip(state))]
pub async fn list_favorites(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Vec<Favorite>>> {
    let rows = FavoriteRow::list_by_user(&state.db, user_id).await?;
    let items = rows
        .into_iter()
        .map(Favorite::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(items))
}

#[instrument(skip(state))]
pub async fn add_favorite(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<AddFavoriteRequest>,
) -> AppResult<(StatusCode, Json<Favorite>)> {
    let recipe_id = payload.recipe_id.trim();
    let title = payload.title.trim();
    if recipe_id.is_empty() || title.is_empty() {
        return Err(AppError::validation("recipeId and title are required"));
    }
    let image = payload.image.as_deref().filter(|i| !i.trim().is_empty());
    let row =
        FavoriteRow::upsert(&state.db, user_id, recipe_id, payload.source, title, image).await?;
    info!(%user_id, recipe_id, "favorite saved");
    Ok((StatusCode::CREATED, Json(Favorite::try_from(row)?)))
}

#[instrument(skip(state))]
pub async fn remove_favorite(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(recipe_id): Path<String>,
) -> AppResult<StatusCode> {
    if !FavoriteRow::delete(&state.db, user_id, &recipe_id).await? {
        return Err(AppError::NotFound("favorite"));
    }
    info!(%user_id, %recipe_id, "favorite removed");
    Ok(StatusCode::NO_CONTENT)
}
