use tracing::warn;

use super::dto::{RecipeRequest, RecipeResponse, SearchParams, SearchResponse};
use super::repo;
use super::repo_types::{RecipeInput, RecipeRow};
use crate::error::{AppError, AppResult};
use crate::images::services::presign;
use crate::recipe_api::{RecipeApiError, RecipeQuery, RecipeSummary, SearchPage};
use crate::state::AppState;

pub const DEFAULT_PAGE: u32 = 10;
pub const MAX_PAGE: u32 = 100;
const MAX_TITLE_LEN: usize = 200;

/// Check a submitted recipe and normalise it for storage.
pub fn validate(req: RecipeRequest) -> AppResult<RecipeInput> {
    let title = req.title.trim().to_string();
    if title.is_empty() || title.len() > MAX_TITLE_LEN {
        return Err(AppError::validation("title must be 1 to 200 characters"));
    }
    if req.servings < 1 {
        return Err(AppError::validation("servings must be at least 1"));
    }
    if req.prep_minutes < 0 {
        return Err(AppError::validation("prepMinutes must not be negative"));
    }
    if req.ingredients.is_empty() {
        return Err(AppError::validation("at least one ingredient is required"));
    }
    for i in &req.ingredients {
        if i.name.trim().is_empty() {
            return Err(AppError::validation("ingredient name is required"));
        }
        if !i.amount.is_finite() || i.amount < 0.0 {
            return Err(AppError::validation("ingredient amount must be a non-negative number"));
        }
    }
    let instructions: Vec<String> = req
        .instructions
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if instructions.is_empty() {
        return Err(AppError::validation("at least one instruction step is required"));
    }
    if !req.nutrition.is_valid() {
        return Err(AppError::validation("nutrition values must be non-negative numbers"));
    }
    if let Some(p) = req.price_per_serving {
        if !p.is_finite() || p < 0.0 {
            return Err(AppError::validation("pricePerServing must not be negative"));
        }
    }
    let mut flags = req.dietary;
    // vegan implies vegetarian
    flags.vegetarian |= flags.vegan;

    Ok(RecipeInput {
        title,
        summary: req.summary.trim().to_string(),
        image_url: req.image_url.filter(|u| !u.trim().is_empty()),
        servings: req.servings,
        prep_minutes: req.prep_minutes,
        ingredients: req.ingredients,
        instructions,
        nutrition: req.nutrition,
        flags,
        price_per_serving: req.price_per_serving,
    })
}

/// Turn the search query string into the shared filter shape.
pub fn build_query(p: SearchParams) -> AppResult<RecipeQuery> {
    let number = p.number.unwrap_or(DEFAULT_PAGE);
    if number == 0 || number > MAX_PAGE {
        return Err(AppError::validation("number must be between 1 and 100"));
    }
    let pairs = [
        (p.min_calories, p.max_calories, "calories"),
        (p.min_protein, p.max_protein, "protein"),
        (p.min_carbs, p.max_carbs, "carbs"),
        (p.min_fat, p.max_fat, "fat"),
    ];
    for (min, max, name) in pairs {
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                return Err(AppError::validation(format!("min {name} is above max {name}")));
            }
        }
    }
    let exclude_ingredients = p
        .exclude_ingredients
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    Ok(RecipeQuery {
        query: p.query.map(|q| q.trim().to_string()).filter(|q| !q.is_empty()),
        min_calories: p.min_calories,
        max_calories: p.max_calories,
        min_protein: p.min_protein,
        max_protein: p.max_protein,
        min_carbs: p.min_carbs,
        max_carbs: p.max_carbs,
        min_fat: p.min_fat,
        max_fat: p.max_fat,
        diet: p.diet.map(|d| d.trim().to_lowercase()).filter(|d| !d.is_empty()),
        exclude_ingredients,
        number,
        offset: p.offset.unwrap_or(0),
    })
}

/// Image to show for a local recipe: uploaded object first, then the submitted URL.
pub async fn image_for(state: &AppState, row: &RecipeRow) -> Option<String> {
    match &row.image_key {
        Some(key) => match presign(state, key).await {
            Ok(url) => Some(url),
            Err(e) => {
                warn!(error = %e, recipe_id = %row.id, "presign failed");
                row.image_url.clone()
            }
        },
        None => row.image_url.clone(),
    }
}

pub async fn to_response(state: &AppState, row: RecipeRow) -> RecipeResponse {
    let image = image_for(state, &row).await;
    let nutrition = row.nutrition();
    let dietary = row.flags();
    RecipeResponse {
        id: row.id,
        author_id: row.author_id,
        title: row.title,
        summary: row.summary,
        image,
        servings: row.servings,
        prep_minutes: row.prep_minutes,
        ingredients: row.ingredients.0,
        instructions: row.instructions,
        nutrition,
        dietary,
        price_per_serving: row.price_per_serving,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

/// Local matches first, then external ones. An external failure degrades
/// to local-only results instead of failing the request.
pub fn merge(
    local: Vec<RecipeSummary>,
    external: Result<SearchPage, RecipeApiError>,
) -> SearchResponse {
    let local_count = local.len() as i64;
    match external {
        Ok(page) => {
            let mut results = local;
            results.extend(page.results);
            SearchResponse {
                results,
                total_results: local_count + page.total_results,
                external_available: true,
            }
        }
        Err(e) => {
            warn!(error = %e, "external recipe search failed; returning local results only");
            SearchResponse {
                results: local,
                total_results: local_count,
                external_available: false,
            }
        }
    }
}

pub async fn search_merged(state: &AppState, q: &RecipeQuery) -> AppResult<SearchResponse> {
    let rows = repo::search(&state.db, q).await?;
    let mut local = Vec::with_capacity(rows.len());
    for row in &rows {
        local.push(row.summary(image_for(state, row).await));
    }
    Ok(merge(local, state.recipes.search(q).await))
}

/// An id the provider does not know is a missing recipe; anything else is upstream.
pub fn external_error(e: RecipeApiError) -> AppError {
    match e {
        RecipeApiError::Api { status: 404, .. } => AppError::NotFound("recipe"),
        other => AppError::Upstream(other.to_string()),
    }
}
