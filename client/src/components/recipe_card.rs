//! Reusable card for catalog grid items.
//!
//! DESIGN
//! ======
//! Keeps recipe summary presentation consistent between the home page and
//! the full listing while centralizing the link to the detail route.

use leptos::prelude::*;
use recipes::RecipeSummary;

use crate::components::recipe_image::RecipeImage;
use crate::util::format::minutes_label;

/// A clickable card representing a recipe.
#[component]
pub fn RecipeCard(recipe: RecipeSummary) -> impl IntoView {
    let href = format!("/recipe/{}", recipe.id);
    let difficulty_class = format!("recipe-card__difficulty recipe-card__difficulty--{}", recipe.difficulty.as_str());

    view! {
        <a class="recipe-card" href=href>
            <RecipeImage src=recipe.image_url alt=recipe.title.clone() class="recipe-card__image"/>
            <span class="recipe-card__body">
                {recipe.category.map(|category| view! { <span class="recipe-card__category">{category}</span> })}
                <span class="recipe-card__title">{recipe.title}</span>
                <span class="recipe-card__meta">
                    <span class="recipe-card__time">{minutes_label(recipe.prep_time)}</span>
                    <span class=difficulty_class>{recipe.difficulty.label()}</span>
                </span>
            </span>
        </a>
    }
}
