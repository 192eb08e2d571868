use sqlx::{types::Json, PgPool};
use uuid::Uuid;

use super::repo_types::{RecipeInput, RecipeRow};
use crate::recipe_api::RecipeQuery;

const COLUMNS: &str = "\
    id, author_id, title, summary, image_url, image_key, servings, prep_minutes, \
    ingredients, instructions, calories, protein, carbs, fat, \
    vegetarian, vegan, gluten_free, dairy_free, price_per_serving, created_at, updated_at";

pub async fn insert(
    db: &PgPool,
    author_id: Uuid,
    r: &RecipeInput,
) -> Result<RecipeRow, sqlx::Error> {
    let query = format!(
        "INSERT INTO recipes \
            (author_id, title, summary, image_url, servings, prep_minutes, ingredients, \
             instructions, calories, protein, carbs, fat, vegetarian, vegan, gluten_free, \
             dairy_free, price_per_serving) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17) \
         RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, RecipeRow>(&query)
        .bind(author_id)
        .bind(&r.title)
        .bind(&r.summary)
        .bind(&r.image_url)
        .bind(r.servings)
        .bind(r.prep_minutes)
        .bind(Json(&r.ingredients))
        .bind(&r.instructions)
        .bind(r.nutrition.calories)
        .bind(r.nutrition.protein)
        .bind(r.nutrition.carbs)
        .bind(r.nutrition.fat)
        .bind(r.flags.vegetarian)
        .bind(r.flags.vegan)
        .bind(r.flags.gluten_free)
        .bind(r.flags.dairy_free)
        .bind(r.price_per_serving)
        .fetch_one(db)
        .await
}

pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<RecipeRow>, sqlx::Error> {
    let query = format!("SELECT {COLUMNS} FROM recipes WHERE id = $1");
    sqlx::query_as::<_, RecipeRow>(&query)
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn list_by_author(
    db: &PgPool,
    author_id: Uuid,
    limit: i64,
    offset: i64,
) -> Result<Vec<RecipeRow>, sqlx::Error> {
    let query = format!(
        "SELECT {COLUMNS} FROM recipes WHERE author_id = $1 \
         ORDER BY created_at DESC LIMIT $2 OFFSET $3"
    );
    sqlx::query_as::<_, RecipeRow>(&query)
        .bind(author_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await
}

/// Owner-scoped full replace of the recipe content.
pub async fn update(
    db: &PgPool,
    id: Uuid,
    author_id: Uuid,
    r: &RecipeInput,
) -> Result<Option<RecipeRow>, sqlx::Error> {
    let query = format!(
        "UPDATE recipes SET \
            title = $3, summary = $4, image_url = $5, servings = $6, prep_minutes = $7, \
            ingredients = $8, instructions = $9, calories = $10, protein = $11, carbs = $12, \
            fat = $13, vegetarian = $14, vegan = $15, gluten_free = $16, dairy_free = $17, \
            price_per_serving = $18, updated_at = now() \
         WHERE id = $1 AND author_id = $2 RETURNING {COLUMNS}"
    );
    sqlx::query_as::<_, RecipeRow>(&query)
        .bind(id)
        .bind(author_id)
        .bind(&r.title)
        .bind(&r.summary)
        .bind(&r.image_url)
        .bind(r.servings)
        .bind(r.prep_minutes)
        .bind(Json(&r.ingredients))
        .bind(&r.instructions)
        .bind(r.nutrition.calories)
        .bind(r.nutrition.protein)
        .bind(r.nutrition.carbs)
        .bind(r.nutrition.fat)
        .bind(r.flags.vegetarian)
        .bind(r.flags.vegan)
        .bind(r.flags.gluten_free)
        .bind(r.flags.dairy_free)
        .bind(r.price_per_serving)
        .fetch_optional(db)
        .await
}

pub async fn set_image_key(
    db: &PgPool,
    id: Uuid,
    author_id: Uuid,
    key: &str,
) -> Result<bool, sqlx::Error> {
    let res = sqlx::query(
        "UPDATE recipes SET image_key = $3, updated_at = now() WHERE id = $1 AND author_id = $2",
    )
    .bind(id)
    .bind(author_id)
    .bind(key)
    .execute(db)
    .await?;
    Ok(res.rows_affected() == 1)
}

pub async fn delete(db: &PgPool, id: Uuid, author_id: Uuid) -> Result<bool, sqlx::Error> {
    let res = sqlx::query("DELETE FROM recipes WHERE id = $1 AND author_id = $2")
        .bind(id)
        .bind(author_id)
        .execute(db)
        .await?;
    Ok(res.rows_affected() == 1)
}

/// SQL condition for a diet key. Static fragments only.
pub fn diet_condition(diet: Option<&str>) -> &'static str {
    match diet.map(|d| d.trim().to_lowercase()).as_deref() {
        None | Some("") => "TRUE",
        Some("vegetarian") => "(vegetarian OR vegan)",
        Some("vegan") => "vegan",
        Some("gluten free") | Some("gluten-free") => "gluten_free",
        Some("dairy free") | Some("dairy-free") => "dairy_free",
        // diets the local collection cannot express match nothing
        Some(_) => "FALSE",
    }
}

/// `%term%` for `ILIKE ... ESCAPE '\'`, with the user's own wildcards escaped.
pub fn contains_pattern(term: &str) -> String {
    let mut out = String::with_capacity(term.len() + 2);
    out.push('%');
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

/// Local counterpart of the external search, same filter shape.
/// Exclusions are checked in SQL so LIMIT/OFFSET page over matching rows only.
pub async fn search(db: &PgPool, q: &RecipeQuery) -> Result<Vec<RecipeRow>, sqlx::Error> {
    let query = format!(
        "SELECT {COLUMNS} FROM recipes \
         WHERE ($1::text IS NULL OR title ILIKE $1 ESCAPE '\\' OR summary ILIKE $1 ESCAPE '\\') \
           AND ($2::float8 IS NULL OR calories >= $2) AND ($3::float8 IS NULL OR calories <= $3) \
           AND ($4::float8 IS NULL OR protein >= $4) AND ($5::float8 IS NULL OR protein <= $5) \
           AND ($6::float8 IS NULL OR carbs >= $6) AND ($7::float8 IS NULL OR carbs <= $7) \
           AND ($8::float8 IS NULL OR fat >= $8) AND ($9::float8 IS NULL OR fat <= $9) \
           AND {diet} \
           AND NOT EXISTS ( \
             SELECT 1 FROM jsonb_array_elements(ingredients) AS i, unnest($12::text[]) AS x(pat) \
             WHERE i->>'name' ILIKE x.pat ESCAPE '\\') \
         ORDER BY created_at DESC LIMIT $10 OFFSET $11",
        diet = diet_condition(q.diet.as_deref()),
    );
    let bound = |v: Option<i64>| v.map(|v| v as f64);
    let excluded: Vec<String> = q
        .exclude_ingredients
        .iter()
        .map(|e| e.trim())
        .filter(|e| !e.is_empty())
        .map(contains_pattern)
        .collect();
    sqlx::query_as::<_, RecipeRow>(&query)
        .bind(
            q.query
                .as_deref()
                .filter(|s| !s.is_empty())
                .map(contains_pattern),
        )
        .bind(bound(q.min_calories))
        .bind(bound(q.max_calories))
        .bind(bound(q.min_protein))
        .bind(bound(q.max_protein))
        .bind(bound(q.min_carbs))
        .bind(bound(q.max_carbs))
        .bind(bound(q.min_fat))
        .bind(bound(q.max_fat))
        .bind(i64::from(q.number))
        .bind(i64::from(q.offset))
        .bind(excluded)
        .fetch_all(db)
        .await
}

#[cfg(test)]
mod tests {
    use super::{contains_pattern, diet_condition};

    #[test]
    fn diet_keys_map_to_flag_conditions() {
        assert_eq!(diet_condition(None), "TRUE");
        assert_eq!(diet_condition(Some("")), "TRUE");
        assert_eq!(diet_condition(Some("Vegetarian")), "(vegetarian OR vegan)");
        assert_eq!(diet_condition(Some("vegan")), "vegan");
        assert_eq!(diet_condition(Some("gluten free")), "gluten_free");
        assert_eq!(diet_condition(Some("dairy-free")), "dairy_free");
        assert_eq!(diet_condition(Some("ketogenic")), "FALSE");
    }

    #[test]
    fn contains_pattern_escapes_like_wildcards() {
        assert_eq!(contains_pattern("pasta"), "%pasta%");
        assert_eq!(contains_pattern("100%"), "%100\\%%");
        assert_eq!(contains_pattern("a_b"), "%a\\_b%");
        assert_eq!(contains_pattern(r"c:\x"), r"%c:\\x%");
    }
}
