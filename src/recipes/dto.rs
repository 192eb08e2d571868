use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{DietaryFlags, Ingredient};
use crate::nutrition::NutritionSnapshot;
use crate::recipe_api::RecipeSummary;

/// Body of `POST /recipes` and `PUT /recipes/:id`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeRequest {
    pub title: String,
    #[serde(default)]
    pub summary: String,
    pub image_url: Option<String>,
    pub servings: i32,
    pub prep_minutes: i32,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<String>,
    pub nutrition: NutritionSnapshot,
    #[serde(default)]
    pub dietary: DietaryFlags,
    pub price_per_serving: Option<f64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeResponse {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub summary: String,
    pub image: Option<String>,
    pub servings: i32,
    pub prep_minutes: i32,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<String>,
    pub nutrition: NutritionSnapshot,
    pub dietary: DietaryFlags,
    pub price_per_serving: Option<f64>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// `GET /recipes/search` query string. `excludeIngredients` is comma separated.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub query: Option<String>,
    pub min_calories: Option<i64>,
    pub max_calories: Option<i64>,
    pub min_protein: Option<i64>,
    pub max_protein: Option<i64>,
    pub min_carbs: Option<i64>,
    pub max_carbs: Option<i64>,
    pub min_fat: Option<i64>,
    pub max_fat: Option<i64>,
    pub diet: Option<String>,
    pub exclude_ingredients: Option<String>,
    pub number: Option<u32>,
    pub offset: Option<u32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub results: Vec<RecipeSummary>,
    pub total_results: i64,
    /// False when the external search failed and only local recipes are listed.
    pub external_available: bool,
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}
fn default_limit() -> i64 { 20 }

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageUploaded {
    pub id: Uuid,
    pub image: String,
}
