//! Recipe persistence.
//!
//! DESIGN
//! ======
//! Route handlers depend on the [`RecipeStore`] trait, not on Postgres. The
//! production implementation keeps scalar columns for the fields the
//! catalog filters and sorts on, and stores nested lists (ingredients,
//! instructions, tips, substitutions, nutrition) as `jsonb` in the
//! canonical camelCase shape so the row round-trips through
//! `recipes::Recipe` without a mapping layer.
//!
//! Timestamps are `timestamptz` in the table and milliseconds on the wire.

use recipes::{Difficulty, Ingredient, Instruction, NutritionInfo, Recipe, RecipeSummary, Substitution, Tip};
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum RecipeError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[async_trait::async_trait]
pub trait RecipeStore: Send + Sync {
    /// Listing projection of every recipe, newest first.
    async fn list(&self) -> Result<Vec<RecipeSummary>, RecipeError>;

    async fn get(&self, id: Uuid) -> Result<Option<Recipe>, RecipeError>;

    /// Insert a recipe. Returns `false` when a recipe with the same id
    /// already exists (the existing row is left untouched).
    async fn insert(&self, recipe: &Recipe) -> Result<bool, RecipeError>;

    async fn count(&self) -> Result<i64, RecipeError>;
}

// =============================================================================
// POSTGRES
// =============================================================================

pub struct PgRecipeStore {
    pool: PgPool,
}

impl PgRecipeStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SUMMARY_COLUMNS: &str = "id, title, image_url, category, prep_time, difficulty, tags";

const RECIPE_COLUMNS: &str = r"id, user_id, title, description, category, prep_time, cook_time, servings,
    difficulty, spicy_level, image_url, ingredients, instructions, tips, substitutions, tags, nutrition,
    (EXTRACT(EPOCH FROM created_at) * 1000)::bigint AS created_at_ms,
    (EXTRACT(EPOCH FROM updated_at) * 1000)::bigint AS updated_at_ms";

#[async_trait::async_trait]
impl RecipeStore for PgRecipeStore {
    async fn list(&self) -> Result<Vec<RecipeSummary>, RecipeError> {
        let rows = sqlx::query(&format!("SELECT {SUMMARY_COLUMNS} FROM recipes ORDER BY created_at DESC, id"))
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(summary_from_row).collect()
    }

    async fn get(&self, id: Uuid) -> Result<Option<Recipe>, RecipeError> {
        let row = sqlx::query(&format!("SELECT {RECIPE_COLUMNS} FROM recipes WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(recipe_from_row).transpose()
    }

    async fn insert(&self, recipe: &Recipe) -> Result<bool, RecipeError> {
        let result = sqlx::query(
            r"INSERT INTO recipes (
                  id, user_id, title, description, category, prep_time, cook_time, servings,
                  difficulty, spicy_level, image_url, ingredients, instructions, tips,
                  substitutions, tags, nutrition, created_at, updated_at
              ) VALUES (
                  $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17,
                  to_timestamp($18::double precision / 1000.0),
                  to_timestamp($19::double precision / 1000.0)
              )
              ON CONFLICT (id) DO NOTHING",
        )
        .bind(recipe.id)
        .bind(recipe.user_id)
        .bind(&recipe.title)
        .bind(&recipe.description)
        .bind(recipe.category.as_deref())
        .bind(to_i32(recipe.prep_time))
        .bind(to_i32(recipe.cook_time))
        .bind(to_i32(recipe.servings))
        .bind(recipe.difficulty.as_str())
        .bind(i32::from(recipe.spicy_level))
        .bind(&recipe.image_url)
        .bind(Json(&recipe.ingredients))
        .bind(Json(&recipe.instructions))
        .bind(Json(&recipe.tips))
        .bind(Json(&recipe.substitutions))
        .bind(&recipe.tags)
        .bind(recipe.nutrition.as_ref().map(Json))
        .bind(recipe.created_at)
        .bind(recipe.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn count(&self) -> Result<i64, RecipeError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM recipes")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get("n")?)
    }
}

// =============================================================================
// ROW MAPPING
// =============================================================================

fn to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Columns are constrained non-negative by the migration; clamp anything
/// else rather than failing the whole listing.
fn to_u32(value: i32) -> u32 {
    u32::try_from(value).unwrap_or(0)
}

fn summary_from_row(row: &PgRow) -> Result<RecipeSummary, RecipeError> {
    let difficulty: String = row.try_get("difficulty")?;
    Ok(RecipeSummary {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        image_url: row.try_get("image_url")?,
        category: row.try_get("category")?,
        prep_time: to_u32(row.try_get("prep_time")?),
        difficulty: Difficulty::parse(&difficulty).unwrap_or_default(),
        tags: row.try_get("tags")?,
    })
}

fn recipe_from_row(row: &PgRow) -> Result<Recipe, RecipeError> {
    let difficulty: String = row.try_get("difficulty")?;
    let spicy_level: i32 = row.try_get("spicy_level")?;
    let Json(ingredients): Json<Vec<Ingredient>> = row.try_get("ingredients")?;
    let Json(instructions): Json<Vec<Instruction>> = row.try_get("instructions")?;
    let Json(tips): Json<Vec<Tip>> = row.try_get("tips")?;
    let Json(substitutions): Json<Vec<Substitution>> = row.try_get("substitutions")?;
    let nutrition: Option<Json<NutritionInfo>> = row.try_get("nutrition")?;

    Ok(Recipe {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        image_url: row.try_get("image_url")?,
        prep_time: to_u32(row.try_get("prep_time")?),
        cook_time: to_u32(row.try_get("cook_time")?),
        servings: to_u32(row.try_get("servings")?).max(1),
        difficulty: Difficulty::parse(&difficulty).unwrap_or_default(),
        category: row.try_get("category")?,
        tags: row.try_get("tags")?,
        spicy_level: u8::try_from(spicy_level).unwrap_or(0),
        ingredients,
        instructions,
        tips,
        substitutions,
        nutrition: nutrition.map(|Json(n)| n),
        user_id: row.try_get("user_id")?,
        created_at: row.try_get("created_at_ms")?,
        updated_at: row.try_get("updated_at_ms")?,
    })
}

#[cfg(test)]
#[path = "recipe_test.rs"]
mod tests;
