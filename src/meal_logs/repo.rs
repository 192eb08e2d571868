use sqlx::PgPool;
use time::Date;
use uuid::Uuid;

use super::repo_types::MealLogRow;
use crate::nutrition::{MealType, NutritionSnapshot};

const COLUMNS: &str = "id, user_id, log_date, recipe_id, recipe_title, \
    calories, protein, carbs, fat, meal_type, logged_at";

pub struct NewMealLog<'a> {
    pub date: Date,
    pub recipe_id: &'a str,
    pub recipe_title: &'a str,
    pub nutrition: NutritionSnapshot,
    pub meal_type: MealType,
}

pub async fn insert(
    db: &PgPool,
    user_id: Uuid,
    log: &NewMealLog<'_>,
) -> Result<MealLogRow, sqlx::Error> {
    let query = format!(
        "INSERT INTO meal_logs \
            (user_id, log_date, recipe_id, recipe_title, calories, protein, carbs, fat, meal_type) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
         RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, MealLogRow>(&query)
        .bind(user_id)
        .bind(log.date)
        .bind(log.recipe_id)
        .bind(log.recipe_title)
        .bind(log.nutrition.calories)
        .bind(log.nutrition.protein)
        .bind(log.nutrition.carbs)
        .bind(log.nutrition.fat)
        .bind(log.meal_type.as_str())
        .fetch_one(db)
        .await
}

/// Logs of `user_id` with `from <= log_date <= to`, oldest first.
pub async fn list_between(
    db: &PgPool,
    user_id: Uuid,
    from: Date,
    to: Date,
) -> Result<Vec<MealLogRow>, sqlx::Error> {
    let query = format!(
        "SELECT {COLUMNS} FROM meal_logs \
         WHERE user_id = $1 AND log_date BETWEEN $2 AND $3 \
         ORDER BY log_date ASC, logged_at ASC"
    );
    sqlx::query_as::<_, MealLogRow>(&query)
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_all(db)
        .await
}

pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<MealLogRow>, sqlx::Error> {
    let query = format!("SELECT {COLUMNS} FROM meal_logs WHERE id = $1");
    sqlx::query_as::<_, MealLogRow>(&query)
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn delete(db: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
    let res = sqlx::query("DELETE FROM meal_logs WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(res.rows_affected() == 1)
}
