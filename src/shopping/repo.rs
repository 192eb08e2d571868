use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use super::repo_types::{NewItem, ShoppingItem};

const COLUMNS: &str = "id, user_id, name, amount, unit, checked, created_at";

pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> Result<Vec<ShoppingItem>, sqlx::Error> {
    let query = format!(
        "SELECT {COLUMNS} FROM shopping_items WHERE user_id = $1 \
         ORDER BY checked ASC, created_at ASC"
    );
    sqlx::query_as::<_, ShoppingItem>(&query)
        .bind(user_id)
        .fetch_all(db)
        .await
}

pub async fn insert_tx(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    item: &NewItem,
) -> Result<ShoppingItem, sqlx::Error> {
    let query = format!(
        "INSERT INTO shopping_items (user_id, name, amount, unit) \
         VALUES ($1, $2, $3, $4) RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, ShoppingItem>(&query)
        .bind(user_id)
        .bind(&item.name)
        .bind(item.amount)
        .bind(&item.unit)
        .fetch_one(&mut **tx)
        .await
}

pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<ShoppingItem>, sqlx::Error> {
    let query = format!("SELECT {COLUMNS} FROM shopping_items WHERE id = $1");
    sqlx::query_as::<_, ShoppingItem>(&query)
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn set_checked(
    db: &PgPool,
    id: Uuid,
    user_id: Uuid,
    checked: bool,
) -> Result<Option<ShoppingItem>, sqlx::Error> {
    let query = format!(
        "UPDATE shopping_items SET checked = $3 WHERE id = $1 AND user_id = $2 RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, ShoppingItem>(&query)
        .bind(id)
        .bind(user_id)
        .bind(checked)
        .fetch_optional(db)
        .await
}

pub async fn delete(db: &PgPool, id: Uuid, user_id: Uuid) -> Result<bool, sqlx::Error> {
    let res = sqlx::query("DELETE FROM shopping_items WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(res.rows_affected() == 1)
}

pub async fn delete_checked(db: &PgPool, user_id: Uuid) -> Result<u64, sqlx::Error> {
    let res = sqlx::query("DELETE FROM shopping_items WHERE user_id = $1 AND checked")
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(res.rows_affected())
}
