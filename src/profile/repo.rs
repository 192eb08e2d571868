use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::repo_types::{ProfileRow, ProfileSettings};

const COLUMNS: &str = "\
    user_id, age, gender, height_cm, weight_kg, activity_level, fitness_goal, \
    diet_preference, allergies, preferred_cuisines, meals_per_day, \
    profile_completed, updated_at";

/// Insert the signup profile (all defaults, not completed).
pub async fn insert_default_tx(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
) -> Result<(), sqlx::Error> {
    let d = ProfileSettings::default();
    sqlx::query(
        r#"
        INSERT INTO profiles (user_id, age, gender, height_cm, weight_kg, activity_level,
                              fitness_goal, diet_preference, allergies, preferred_cuisines,
                              meals_per_day, profile_completed)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, FALSE)
        "#,
    )
    .bind(user_id)
    .bind(d.age)
    .bind(d.gender.as_str())
    .bind(d.height)
    .bind(d.weight)
    .bind(d.activity_level.as_str())
    .bind(d.fitness_goal.as_str())
    .bind(&d.diet_preference)
    .bind(&d.allergies)
    .bind(&d.preferred_cuisines)
    .bind(d.meals_per_day)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

pub async fn find_by_user(db: &PgPool, user_id: Uuid) -> Result<Option<ProfileRow>, sqlx::Error> {
    let query = format!("SELECT {COLUMNS} FROM profiles WHERE user_id = $1");
    sqlx::query_as::<_, ProfileRow>(&query)
        .bind(user_id)
        .fetch_optional(db)
        .await
}

/// Overwrite the profile and mark it completed.
pub async fn update(
    db: &PgPool,
    user_id: Uuid,
    s: &ProfileSettings,
) -> Result<Option<ProfileRow>, sqlx::Error> {
    let query = format!(
        "UPDATE profiles SET \
            age = $2, gender = $3, height_cm = $4, weight_kg = $5, activity_level = $6, \
            fitness_goal = $7, diet_preference = $8, allergies = $9, preferred_cuisines = $10, \
            meals_per_day = $11, profile_completed = TRUE, updated_at = now() \
         WHERE user_id = $1 RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, ProfileRow>(&query)
        .bind(user_id)
        .bind(s.age)
        .bind(s.gender.as_str())
        .bind(s.height)
        .bind(s.weight)
        .bind(s.activity_level.as_str())
        .bind(s.fitness_goal.as_str())
        .bind(&s.diet_preference)
        .bind(&s.allergies)
        .bind(&s.preferred_cuisines)
        .bind(s.meals_per_day)
        .fetch_optional(db)
        .await
}
