use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::nutrition::NutritionSnapshot;
use crate::recipe_api::{RecipeSource, RecipeSummary};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ingredient {
    pub name: String,
    pub amount: f64,
    pub unit: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DietaryFlags {
    pub vegetarian: bool,
    pub vegan: bool,
    pub gluten_free: bool,
    pub dairy_free: bool,
}

#[derive(Debug, FromRow)]
pub struct RecipeRow {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub summary: String,
    pub image_url: Option<String>,
    pub image_key: Option<String>,
    pub servings: i32,
    pub prep_minutes: i32,
    pub ingredients: Json<Vec<Ingredient>>,
    pub instructions: Vec<String>,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub vegetarian: bool,
    pub vegan: bool,
    pub gluten_free: bool,
    pub dairy_free: bool,
    pub price_per_serving: Option<f64>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl RecipeRow {
    pub fn nutrition(&self) -> NutritionSnapshot {
        NutritionSnapshot {
            calories: self.calories,
            protein: self.protein,
            carbs: self.carbs,
            fat: self.fat,
        }
    }

    pub fn flags(&self) -> DietaryFlags {
        DietaryFlags {
            vegetarian: self.vegetarian,
            vegan: self.vegan,
            gluten_free: self.gluten_free,
            dairy_free: self.dairy_free,
        }
    }

    /// Summary for search results; `image` is resolved by the caller.
    pub fn summary(&self, image: Option<String>) -> RecipeSummary {
        RecipeSummary {
            id: self.id.to_string(),
            source: RecipeSource::Local,
            title: self.title.clone(),
            image,
            ready_in_minutes: Some(self.prep_minutes),
            servings: Some(self.servings),
            nutrition: self.nutrition(),
        }
    }
}

/// Validated recipe content, as written to the database.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeInput {
    pub title: String,
    pub summary: String,
    pub image_url: Option<String>,
    pub servings: i32,
    pub prep_minutes: i32,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<String>,
    pub nutrition: NutritionSnapshot,
    pub flags: DietaryFlags,
    pub price_per_serving: Option<f64>,
}
