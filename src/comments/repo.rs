use sqlx::PgPool;
use uuid::Uuid;

use super::repo_types::Comment;

impl Comment {
    pub async fn list_for_recipe(
        db: &PgPool,
        recipe_id: &str,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Comment>, sqlx::Error> {
        sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, recipe_id, author_id, author_email, body, created_at
            FROM comments
            WHERE recipe_id = $1
            ORDER BY created_at ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(recipe_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await
    }

    pub async fn create(
        db: &PgPool,
        recipe_id: &str,
        author_id: Uuid,
        author_email: &str,
        body: &str,
    ) -> Result<Comment, sqlx::Error> {
        sqlx::query_as::<_, Comment>(
            r#"
            INSERT INTO comments (recipe_id, author_id, author_email, body)
            VALUES ($1, $2, $3, $4)
            RETURNING id, recipe_id, author_id, author_email, body, created_at
            "#,
        )
        .bind(recipe_id)
        .bind(author_id)
        .bind(author_email)
        .bind(body)
        .fetch_one(db)
        .await
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<Comment>, sqlx::Error> {
        sqlx::query_as::<_, Comment>(
            "SELECT id, recipe_id, author_id, author_email, body, created_at \
             FROM comments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn delete(db: &PgPool, id: Uuid, author_id: Uuid) -> Result<bool, sqlx::Error> {
        let res = sqlx::query("DELETE FROM comments WHERE id = $1 AND author_id = $2")
            .bind(id)
            .bind(author_id)
            .execute(db)
            .await?;
        Ok(res.rows_affected() == 1)
    }
}
