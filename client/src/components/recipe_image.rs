//! Recipe photo with a fallback for missing or broken images.

#[cfg(test)]
#[path = "recipe_image_test.rs"]
mod recipe_image_test;

use leptos::prelude::*;

pub const DEFAULT_RECIPE_IMAGE: &str = "/images/recipes/default-recipe.jpg";

/// Image URL to request first: the recipe's own, or the default when blank.
pub fn initial_image_src(src: &str) -> String {
    let src = src.trim();
    if src.is_empty() { DEFAULT_RECIPE_IMAGE.to_owned() } else { src.to_owned() }
}

/// `<img>` that swaps to the default image once if the source fails to load.
#[component]
pub fn RecipeImage(src: String, alt: String, #[prop(optional)] class: &'static str) -> impl IntoView {
    let current = RwSignal::new(initial_image_src(&src));
    let on_error = move |_| {
        if current.get_untracked() != DEFAULT_RECIPE_IMAGE {
            current.set(DEFAULT_RECIPE_IMAGE.to_owned());
        }
    };

    view! { <img class=class src=move || current.get() alt=alt loading="lazy" on:error=on_error /> }
}
