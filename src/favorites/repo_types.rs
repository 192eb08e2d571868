use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::recipe_api::RecipeSource;

/// Favorite recipe of a user; one row per (user, recipe).
#[derive(Debug, Clone, FromRow)]
pub struct FavoriteRow {
    pub user_id: Uuid,
    pub recipe_id: String, // external numeric id or local UUID
    pub source: String,
    pub title: String,
    pub image: Option<String>,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub recipe_id: String,
    pub source: RecipeSource,
    pub title: String,
    pub image: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl TryFrom<FavoriteRow> for Favorite {
    type Error = anyhow::Error;

    fn try_from(r: FavoriteRow) -> Result<Self, Self::Error> {
        let source = match r.source.as_str() {
            "external" => RecipeSource::External,
            "local" => RecipeSource::Local,
            other => anyhow::bail!("favorite {} has unknown source {:?}", r.recipe_id, other),
        };
        Ok(Self {
            recipe_id: r.recipe_id,
            source,
            title: r.title,
            image: r.image,
            created_at: r.created_at,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFavoriteRequest {
    pub recipe_id: String,
    pub source: RecipeSource,
    pub title: String,
    pub image: Option<String>,
}
