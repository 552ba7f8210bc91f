use super::*;

fn summary(title: &str, category: Option<&str>, tags: &[&str]) -> RecipeSummary {
    RecipeSummary {
        id: Uuid::nil(),
        title: title.to_owned(),
        image_url: "/images/recipes/x.jpg".to_owned(),
        category: category.map(str::to_owned),
        prep_time: 10,
        difficulty: Difficulty::Easy,
        tags: tags.iter().map(|t| (*t).to_owned()).collect(),
    }
}

#[test]
fn difficulty_parse_ignores_case_and_whitespace() {
    assert_eq!(Difficulty::parse(" Easy "), Some(Difficulty::Easy));
    assert_eq!(Difficulty::parse("MEDIUM"), Some(Difficulty::Medium));
    assert_eq!(Difficulty::parse("hard"), Some(Difficulty::Hard));
    assert_eq!(Difficulty::parse("extreme"), None);
}

#[test]
fn difficulty_serializes_lowercase() {
    assert_eq!(serde_json::to_string(&Difficulty::Hard).unwrap(), "\"hard\"");
    assert_eq!(Difficulty::default(), Difficulty::Medium);
}

#[test]
fn recipe_accepts_legacy_image_field() {
    let json = serde_json::json!({
        "id": Uuid::nil(),
        "title": "Oats",
        "description": "Creamy",
        "image": "/images/recipes/overnight-oats.jpg",
        "prepTime": 10,
        "cookTime": 0,
        "servings": 2,
        "difficulty": "easy",
        "ingredients": [{"name": "oats", "amount": 1.0, "unit": "cup", "isOptional": true}],
        "instructions": [{"step": 1, "description": "Soak", "timingInMinutes": 480}]
    });
    let recipe: Recipe = serde_json::from_value(json).unwrap();
    assert_eq!(recipe.image_url, "/images/recipes/overnight-oats.jpg");
    assert!(recipe.ingredients[0].optional);
    assert_eq!(recipe.instructions[0].timing_minutes, Some(480));
    assert!(recipe.tips.is_empty());
    assert!(recipe.user_id.is_none());
}

#[test]
fn recipe_serializes_camel_case_image_url() {
    let recipe = NewRecipe {
        title: "Curry".to_owned(),
        description: "Spiced".to_owned(),
        prep_time: 10,
        cook_time: 25,
        servings: 4,
        difficulty: Difficulty::Medium,
        category: Some("Dinner".to_owned()),
        tags: vec![],
        spicy_level: 2,
        ingredients: vec![],
        instructions: vec![],
        tips: vec![],
        substitutions: vec![],
    }
    .into_recipe(Uuid::nil(), "https://cdn/x.jpg".to_owned(), None, 5);
    let value = serde_json::to_value(&recipe).unwrap();
    assert_eq!(value["imageUrl"], "https://cdn/x.jpg");
    assert_eq!(value["prepTime"], 10);
    assert_eq!(value["createdAt"], 5);
    assert!(value.get("image").is_none());
    assert_eq!(recipe.total_time(), 35);
}

#[test]
fn summary_matches_title_category_and_tags() {
    let s = summary("Spiced Lentil Curry", Some("Dinner"), &["vegan", "one-pot"]);
    assert!(s.matches("lentil"));
    assert!(s.matches("DINNER"));
    assert!(s.matches("one-pot"));
    assert!(s.matches("   "));
    assert!(!s.matches("breakfast"));
}

#[test]
fn summary_without_category_only_matches_title_and_tags() {
    let s = summary("Berry Bowl", None, &[]);
    assert!(s.matches("berry"));
    assert!(!s.matches("lunch"));
}
