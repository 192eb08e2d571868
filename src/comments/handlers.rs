use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use super::repo_types::{Comment, NewComment};
use crate::{
    auth::{repo_types::User, services::AuthUser},
    error::{ensure_owner, AppError, AppResult},
    state::AppState,
};

pub const MAX_BODY_CHARS: usize = 2000;

pub fn comment_routes() -> Router<AppState> {
    Router::new()
        .route("/recipes/:id/comments", get(list_comments).post(add_comment))
        .route("/comments/:id", delete(delete_comment))
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}
fn default_limit() -> i64 { 50 }

/// Trimmed body, 1 to 2000 characters.
pub fn clean_body(raw: &str) -> AppResult<&str> {
    let body = raw.trim();
    let chars = body.chars().count();
    if chars == 0 || chars > MAX_BODY_CHARS {
        return Err(AppError::validation("comment must be 1 to 2000 characters"));
    }
    Ok(body)
}

#[instrument(skip(state))]
pub async fn list_comments(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(recipe_id): Path<String>,
    Query(p): Query<Pagination>,
) -> AppResult<Json<Vec<Comment>>> {
    let rows =
        Comment::list_for_recipe(&state.db, &recipe_id, p.limit.clamp(1, 200), p.offset.max(0))
            .await?;
    Ok(Json(rows))
}

#[instrument(skip(state, payload))]
pub async fn add_comment(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(recipe_id): Path<String>,
    Json(payload): Json<NewComment>,
) -> AppResult<(StatusCode, Json<Comment>)> {
    let body = clean_body(&payload.body)?;
    let author = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".into()))?;
    let comment = Comment::create(&state.db, &recipe_id, user_id, &author.email, body).await?;
    info!(%user_id, %recipe_id, comment_id = %comment.id, "comment added");
    Ok((StatusCode::CREATED, Json(comment)))
}

#[instrument(skip(state))]
pub async fn delete_comment(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let comment = Comment::find_by_id(&state.db, id)
        .await?
        .ok_or(AppError::NotFound("comment"))?;
    ensure_owner(comment.author_id, user_id, "comment")?;
    if !Comment::delete(&state.db, id, user_id).await? {
        return Err(AppError::NotFound("comment"));
    }
    info!(%user_id, comment_id = %id, "comment deleted");
    Ok(StatusCode::NO_CONTENT)
}
