use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, patch},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::repo;
use super::repo_types::{AddItemsRequest, Cleared, NewItem, SetCheckedRequest, ShoppingItem};
use crate::{
    auth::services::AuthUser,
    error::{ensure_owner, AppError, AppResult},
    state::AppState,
};

const MAX_ITEMS_PER_REQUEST: usize = 100;
const MAX_NAME_LEN: usize = 200;

pub fn shopping_routes() -> Router<AppState> {
    Router::new()
        .route("/shopping-list", get(list_items).post(add_items))
        .route("/shopping-list/checked", delete(clear_checked))
        .route("/shopping-list/:id", patch(set_checked).delete(delete_item))
}

/// Trim names and units; reject empty names and negative amounts.
pub fn clean_items(items: Vec<NewItem>) -> AppResult<Vec<NewItem>> {
    if items.is_empty() || items.len() > MAX_ITEMS_PER_REQUEST {
        return Err(AppError::validation("items must contain 1 to 100 entries"));
    }
    items
        .into_iter()
        .map(|i| {
            let name = i.name.trim().to_string();
            if name.is_empty() || name.len() > MAX_NAME_LEN {
                return Err(AppError::validation("item name must be 1 to 200 characters"));
            }
            if let Some(a) = i.amount {
                if !a.is_finite() || a < 0.0 {
                    return Err(AppError::validation("item amount must not be negative"));
                }
            }
            Ok(NewItem {
                name,
                amount: i.amount,
                unit: i.unit.map(|u| u.trim().to_string()).filter(|u| !u.is_empty()),
            })
        })
        .collect()
}

async fn load_owned(state: &AppState, id: Uuid, user_id: Uuid) -> AppResult<ShoppingItem> {
    let item = repo::find_by_id(&state.db, id)
        .await?
        .ok_or(AppError::NotFound("shopping item"))?;
    ensure_owner(item.user_id, user_id, "shopping item")?;
    Ok(item)
}

#[instrument(skip(state))]
pub async fn list_items(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Vec<ShoppingItem>>> {
    Ok(Json(repo::list_by_user(&state.db, user_id).await?))
}

#[instrument(skip(state, payload))]
pub async fn add_items(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<AddItemsRequest>,
) -> AppResult<(StatusCode, Json<Vec<ShoppingItem>>)> {
    let items = clean_items(payload.items)?;

    let mut tx = state.db.begin().await?;
    let mut created = Vec::with_capacity(items.len());
    for item in &items {
        created.push(repo::insert_tx(&mut tx, user_id, item).await?);
    }
    tx.commit().await?;

    info!(%user_id, count = created.len(), "shopping items added");
    Ok((StatusCode::CREATED, Json(created)))
}

#[instrument(skip(state))]
pub async fn set_checked(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<SetCheckedRequest>,
) -> AppResult<Json<ShoppingItem>> {
    load_owned(&state, id, user_id).await?;
    let item = repo::set_checked(&state.db, id, user_id, payload.checked)
        .await?
        .ok_or(AppError::NotFound("shopping item"))?;
    Ok(Json(item))
}

#[instrument(skip(state))]
pub async fn delete_item(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    load_owned(&state, id, user_id).await?;
    if !repo::delete(&state.db, id, user_id).await? {
        return Err(AppError::NotFound("shopping item"));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn clear_checked(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<Cleared>> {
    let removed = repo::delete_checked(&state.db, user_id).await?;
    info!(%user_id, removed, "checked shopping items cleared");
    Ok(Json(Cleared { removed }))
}
