use recipes::{Difficulty, Ingredient};

use super::*;

fn recipe(servings: u32, ingredients: Vec<Ingredient>) -> Recipe {
    Recipe {
        id: Uuid::from_u128(3),
        title: "Spiced Lentil Curry".to_owned(),
        description: "Warming red lentils.".to_owned(),
        image_url: String::new(),
        prep_time: 10,
        cook_time: 30,
        servings,
        difficulty: Difficulty::Medium,
        category: Some("Dinner".to_owned()),
        tags: Vec::new(),
        spicy_level: 2,
        ingredients,
        instructions: Vec::new(),
        tips: Vec::new(),
        substitutions: Vec::new(),
        nutrition: None,
        user_id: None,
        created_at: 0,
        updated_at: 0,
    }
}

fn ingredient(name: &str, amount: f64, unit: &str) -> Ingredient {
    Ingredient { name: name.to_owned(), amount, unit: unit.to_owned(), notes: None, optional: false }
}

#[test]
fn parse_recipe_id_accepts_uuid() {
    let id = "3f1c6a2e-8d4b-4b7a-9a51-0c2f6e1d7a03";
    assert_eq!(parse_recipe_id(Some(id)), Ok(Uuid::parse_str(id).unwrap()));
}

#[test]
fn missing_or_malformed_id_is_not_found() {
    assert_eq!(parse_recipe_id(None), Err(NOT_FOUND.to_owned()));
    assert_eq!(parse_recipe_id(Some("")), Err(NOT_FOUND.to_owned()));
    assert_eq!(parse_recipe_id(Some("lentil-curry")), Err(NOT_FOUND.to_owned()));
}

#[test]
fn base_servings_show_stored_amounts() {
    let r = recipe(4, vec![ingredient("red lentils", 1.5, "cup"), ingredient("cumin", 2.0, "tsp")]);
    let lines = scaled_ingredients(&r, 4);
    assert_eq!(lines[0].amount, "1.5");
    assert_eq!(lines[1].amount, "2");
    assert_eq!(lines[0].name, "red lentils");
    assert_eq!(lines[0].unit, "cup");
}

#[test]
fn amounts_scale_linearly_and_round_to_two_decimals() {
    let r = recipe(4, vec![ingredient("red lentils", 1.5, "cup"), ingredient("ginger", 1.0, "tbsp")]);
    let doubled = scaled_ingredients(&r, 8);
    assert_eq!(doubled[0].amount, "3");
    let one = scaled_ingredients(&r, 3);
    assert_eq!(one[1].amount, "0.75");
    let third = scaled_ingredients(&recipe(3, vec![ingredient("oil", 1.0, "tbsp")]), 1);
    assert_eq!(third[0].amount, "0.33");
}

#[test]
fn notes_and_optional_flag_carry_through() {
    let mut garnish = ingredient("cilantro", 0.25, "cup");
    garnish.notes = Some("chopped".to_owned());
    garnish.optional = true;
    let lines = scaled_ingredients(&recipe(2, vec![garnish]), 2);
    assert_eq!(lines[0].notes.as_deref(), Some("chopped"));
    assert!(lines[0].optional);
}
