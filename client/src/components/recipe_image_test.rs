use super::*;

#[test]
fn keeps_recipe_image() {
    assert_eq!(initial_image_src(" /images/recipes/oats.jpg "), "/images/recipes/oats.jpg");
}

#[test]
fn blank_source_uses_default() {
    assert_eq!(initial_image_src(""), DEFAULT_RECIPE_IMAGE);
    assert_eq!(initial_image_src("   "), DEFAULT_RECIPE_IMAGE);
}
