use serde::Serialize;
use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::nutrition::{MealType, NutritionSnapshot};

#[derive(Debug, FromRow)]
pub struct MealLogRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub log_date: Date,
    pub recipe_id: String,
    pub recipe_title: String,
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
    pub meal_type: String,
    pub logged_at: OffsetDateTime,
}

impl MealLogRow {
    pub fn nutrition(&self) -> NutritionSnapshot {
        NutritionSnapshot {
            calories: self.calories,
            protein: self.protein,
            carbs: self.carbs,
            fat: self.fat,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealLog {
    pub id: Uuid,
    pub date: String,
    pub recipe_id: String,
    pub recipe_title: String,
    pub nutrition: NutritionSnapshot,
    pub meal_type: MealType,
    #[serde(with = "time::serde::rfc3339")]
    pub logged_at: OffsetDateTime,
}

impl TryFrom<MealLogRow> for MealLog {
    type Error = anyhow::Error;

    fn try_from(r: MealLogRow) -> Result<Self, Self::Error> {
        let meal_type = MealType::parse(&r.meal_type).ok_or_else(|| {
            anyhow::anyhow!("meal log {} has unknown meal type {:?}", r.id, r.meal_type)
        })?;
        Ok(Self {
            id: r.id,
            date: super::services::format_day(r.log_date),
            nutrition: r.nutrition(),
            recipe_id: r.recipe_id,
            recipe_title: r.recipe_title,
            meal_type,
            logged_at: r.logged_at,
        })
    }
}
