//! Sample catalog seeding.
//!
//! The fixture in `seed/recipes.yaml` ships with the binary. It is inserted
//! only when the table is empty, and inserts are idempotent on `id`, so two
//! servers starting against the same database cannot duplicate it.

use recipes::Recipe;
use tracing::info;

use super::recipe::{RecipeError, RecipeStore};

const SAMPLE_CATALOG: &str = include_str!("../../seed/recipes.yaml");

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("sample catalog is malformed: {0}")]
    Fixture(#[from] serde_yaml::Error),
    #[error(transparent)]
    Store(#[from] RecipeError),
}

/// Parse the bundled sample catalog.
///
/// # Errors
///
/// Returns an error if the YAML fixture does not match the recipe schema.
pub fn sample_catalog() -> Result<Vec<Recipe>, serde_yaml::Error> {
    serde_yaml::from_str(SAMPLE_CATALOG)
}

/// Insert the sample catalog when the store holds no recipes.
/// Returns the number of recipes inserted.
///
/// # Errors
///
/// Returns an error if the fixture is malformed or the store fails.
pub async fn seed_if_empty(store: &dyn RecipeStore) -> Result<usize, SeedError> {
    let existing = store.count().await?;
    if existing > 0 {
        info!(existing, "recipe table already populated; skipping seed");
        return Ok(0);
    }

    let mut inserted = 0;
    for recipe in sample_catalog()? {
        if store.insert(&recipe).await? {
            inserted += 1;
        }
    }
    info!(inserted, "seeded sample recipes");
    Ok(inserted)
}

#[cfg(test)]
#[path = "seed_test.rs"]
mod tests;
