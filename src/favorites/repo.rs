use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::FavoriteRow;
use crate::recipe_api::RecipeSource;

impl FavoriteRow {
    pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> Result<Vec<FavoriteRow>, sqlx::Error> {
        sqlx::query_as::<_, FavoriteRow>(
            r#"
            SELECT user_id, recipe_id, source, title, image, created_at
            FROM favorites
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(db)
        .await
    }

    /// Insert or refresh the stored title/image of an existing favorite.
    pub async fn upsert(
        db: &PgPool,
        user_id: Uuid,
        recipe_id: &str,
        source: RecipeSource,
        title: &str,
        image: Option<&str>,
    ) -> Result<FavoriteRow, sqlx::Error> {
        let source = match source {
            RecipeSource::External => "external",
            RecipeSource::Local => "local",
        };
        sqlx::query_as::<_, FavoriteRow>(
            r#"
            INSERT INTO favorites (user_id, recipe_id, source, title, image)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id, recipe_id)
            DO UPDATE SET source = EXCLUDED.source, title = EXCLUDED.title, image = EXCLUDED.image
            RETURNING user_id, recipe_id, source, title, image, created_at
            "#,
        )
        .bind(user_id)
        .bind(recipe_id)
        .bind(source)
        .bind(title)
        .bind(image)
        .fetch_one(db)
        .await
    }

    pub async fn delete(db: &PgPool, user_id: Uuid, recipe_id: &str) -> Result<bool, sqlx::Error> {
        let res = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND recipe_id = $2")
            .bind(user_id)
            .bind(recipe_id)
            .execute(db)
            .await?;
        Ok(res.rows_affected() == 1)
    }
}
