use recipes::Difficulty;

use super::*;
use crate::state::test_helpers::MemoryRecipeStore;

#[test]
fn sample_catalog_has_six_valid_recipes() {
    let catalog = sample_catalog().unwrap();
    assert_eq!(catalog.len(), 6);
    for recipe in &catalog {
        assert!(recipe.servings >= 1, "{} has no servings", recipe.title);
        assert!(!recipe.ingredients.is_empty(), "{} has no ingredients", recipe.title);
        assert!(recipe.ingredients.iter().all(|i| i.amount >= 0.0));
        let steps: Vec<u32> = recipe.instructions.iter().map(|i| i.step).collect();
        let expected: Vec<u32> = (1..=u32::try_from(steps.len()).unwrap()).collect();
        assert_eq!(steps, expected, "{} steps not sequential", recipe.title);
        assert!(recipe.image_url.starts_with("/images/recipes/"));
    }
}

#[test]
fn sample_catalog_matches_listing_page() {
    let catalog = sample_catalog().unwrap();
    let titles: Vec<&str> = catalog.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(
        titles,
        [
            "Rainbow Quinoa Buddha Bowl",
            "Creamy Overnight Oats",
            "Spiced Lentil Curry",
            "Berry Smoothie Bowl",
            "Mediterranean Chickpea Salad",
            "Creamy Mushroom Pasta",
        ]
    );
    assert_eq!(catalog[2].difficulty, Difficulty::Medium);
    assert_eq!(catalog[1].category.as_deref(), Some("Breakfast"));
    assert_eq!(catalog[0].prep_time, 25);
}

#[tokio::test]
async fn seed_if_empty_inserts_once() {
    let store = MemoryRecipeStore::default();
    assert_eq!(seed_if_empty(&store).await.unwrap(), 6);
    assert_eq!(store.count().await.unwrap(), 6);

    assert_eq!(seed_if_empty(&store).await.unwrap(), 0);
    assert_eq!(store.count().await.unwrap(), 6);
}

#[tokio::test]
async fn seeded_listing_is_newest_first() {
    let store = MemoryRecipeStore::default();
    seed_if_empty(&store).await.unwrap();
    let list = store.list().await.unwrap();
    assert_eq!(list.first().map(|r| r.title.as_str()), Some("Rainbow Quinoa Buddha Bowl"));
    assert_eq!(list.last().map(|r| r.title.as_str()), Some("Creamy Mushroom Pasta"));
}
