use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::{
    ImageUploaded, Pagination, RecipeRequest, RecipeResponse, SearchParams, SearchResponse,
};
use super::repo;
use super::repo_types::RecipeRow;
use super::services::{build_query, external_error, search_merged, to_response, validate};
use crate::{
    auth::services::AuthUser,
    error::{ensure_owner, AppError, AppResult},
    images::services::{
        discard, ext_from_mime, presign, upload_recipe_image, UploadItem, MAX_IMAGE_BYTES,
    },
    state::AppState,
};

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/recipes/search", get(search_recipes))
        .route("/recipes/external/:id", get(get_external))
        .route("/recipes/mine", get(list_mine))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/recipes", post(create_recipe))
        .route(
            "/recipes/:id",
            get(get_recipe).put(update_recipe).delete(delete_recipe),
        )
        .route(
            "/recipes/:id/image",
            post(upload_image).layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES + 64 * 1024)),
        )
}

async fn load(state: &AppState, id: Uuid) -> AppResult<RecipeRow> {
    repo::find_by_id(&state.db, id)
        .await?
        .ok_or(AppError::NotFound("recipe"))
}

#[instrument(skip(state))]
pub async fn search_recipes(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<SearchResponse>> {
    let q = build_query(params)?;
    Ok(Json(search_merged(&state, &q).await?))
}

#[instrument(skip(state))]
pub async fn get_external(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<serde_json::Value>> {
    let info = state
        .recipes
        .information(id)
        .await
        .map_err(external_error)?;
    Ok(Json(info))
}

#[instrument(skip(state))]
pub async fn list_mine(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(p): Query<Pagination>,
) -> AppResult<Json<Vec<RecipeResponse>>> {
    let limit = p.limit.clamp(1, 100);
    let rows = repo::list_by_author(&state.db, user_id, limit, p.offset.max(0)).await?;
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        out.push(to_response(&state, row).await);
    }
    Ok(Json(out))
}

#[instrument(skip(state, payload))]
pub async fn create_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<RecipeRequest>,
) -> AppResult<(StatusCode, Json<RecipeResponse>)> {
    let input = validate(payload)?;
    let row = repo::insert(&state.db, user_id, &input).await?;
    info!(%user_id, recipe_id = %row.id, "recipe created");
    Ok((StatusCode::CREATED, Json(to_response(&state, row).await)))
}

#[instrument(skip(state))]
pub async fn get_recipe(
    State(state): State<AppState>,
    AuthUser(_user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RecipeResponse>> {
    let row = load(&state, id).await?;
    Ok(Json(to_response(&state, row).await))
}

#[instrument(skip(state, payload))]
pub async fn update_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<RecipeRequest>,
) -> AppResult<Json<RecipeResponse>> {
    let existing = load(&state, id).await?;
    ensure_owner(existing.author_id, user_id, "recipe")?;
    let input = validate(payload)?;
    let row = repo::update(&state.db, id, user_id, &input)
        .await?
        .ok_or(AppError::NotFound("recipe"))?;
    info!(%user_id, recipe_id = %id, "recipe updated");
    Ok(Json(to_response(&state, row).await))
}

#[instrument(skip(state))]
pub async fn delete_recipe(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    let existing = load(&state, id).await?;
    ensure_owner(existing.author_id, user_id, "recipe")?;
    if !repo::delete(&state.db, id, user_id).await? {
        return Err(AppError::NotFound("recipe"));
    }
    if let Some(key) = existing.image_key.as_deref() {
        discard(&state, key).await;
    }
    info!(%user_id, recipe_id = %id, "recipe deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /recipes/:id/image (multipart, field `file`)
#[instrument(skip(state, mp))]
pub async fn upload_image(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    mut mp: Multipart,
) -> AppResult<(StatusCode, Json<ImageUploaded>)> {
    let existing = load(&state, id).await?;
    ensure_owner(existing.author_id, user_id, "recipe")?;

    let mut upload = None;
    while let Some(field) = mp
        .next_field()
        .await
        .map_err(|e| AppError::validation(format!("invalid multipart body: {e}")))?
    {
        if field.name() == Some("file") {
            let content_type = field
                .content_type()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "application/octet-stream".into());
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::validation(format!("invalid multipart body: {e}")))?;
            upload = Some((content_type, data));
            break;
        }
    }
    let Some((content_type, body)) = upload else {
        return Err(AppError::validation("file is required"));
    };
    if ext_from_mime(&content_type).is_none() {
        return Err(AppError::validation("file must be a jpeg, png, webp or heic image"));
    }
    if body.is_empty() || body.len() > MAX_IMAGE_BYTES {
        return Err(AppError::validation("file must be between 1 byte and 10 MB"));
    }

    let key = upload_recipe_image(
        &state,
        user_id,
        id,
        UploadItem {
            body,
            content_type: &content_type,
        },
    )
    .await?;
    if !repo::set_image_key(&state.db, id, user_id, &key).await? {
        discard(&state, &key).await;
        return Err(AppError::NotFound("recipe"));
    }
    if let Some(old) = existing.image_key.as_deref() {
        discard(&state, old).await;
    }
    let image = presign(&state, &key).await?;
    info!(%user_id, recipe_id = %id, "recipe image uploaded");
    Ok((StatusCode::CREATED, Json(ImageUploaded { id, image })))
}
