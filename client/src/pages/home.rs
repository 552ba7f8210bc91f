//! Home page: hero search, category shortcuts, and featured recipes.
//!
//! SYSTEM CONTEXT
//! ==============
//! The authenticated landing route. It loads the catalog once on mount and
//! filters it in memory; there is no server-side search.

#[cfg(test)]
#[path = "home_test.rs"]
mod home_test;

use leptos::prelude::*;
use recipes::RecipeSummary;

use crate::components::recipe_card::RecipeCard;
use crate::components::site_header::SiteHeader;
use crate::state::fetch::FetchState;

pub const CATEGORIES: [&str; 4] = ["Breakfast", "Lunch", "Dinner", "Snacks"];
pub const FEATURED_COUNT: usize = 3;

/// The first recipes of the catalog, which arrives newest first.
pub fn featured(catalog: &[RecipeSummary]) -> Vec<RecipeSummary> {
    catalog.iter().take(FEATURED_COUNT).cloned().collect()
}

/// Recipes matching the search text and, when set, the category.
pub fn filter_catalog(catalog: &[RecipeSummary], query: &str, category: Option<&str>) -> Vec<RecipeSummary> {
    catalog
        .iter()
        .filter(|recipe| recipe.matches(query))
        .filter(|recipe| {
            category.is_none_or(|wanted| {
                recipe
                    .category
                    .as_deref()
                    .is_some_and(|c| c.eq_ignore_ascii_case(wanted))
            })
        })
        .cloned()
        .collect()
}

#[component]
pub fn HomePage() -> impl IntoView {
    let catalog = RwSignal::new(FetchState::<Vec<RecipeSummary>>::Loading);
    let query = RwSignal::new(String::new());
    let category = RwSignal::new(None::<&'static str>);

    #[cfg(feature = "hydrate")]
    leptos::task::spawn_local(async move {
        catalog.set(FetchState::from(crate::net::api::fetch_recipes().await));
    });

    let filtering = move || !query.get().trim().is_empty() || category.get().is_some();

    let body = move || match catalog.get() {
        FetchState::Loading => view! { <p class="page-status">"Loading recipes..."</p> }.into_any(),
        FetchState::Failed(message) => view! { <p class="page-status page-status--error">{message}</p> }.into_any(),
        FetchState::Ready(list) if filtering() => {
            let matches = filter_catalog(&list, &query.get(), category.get());
            let count = matches.len();
            view! {
                <section class="home-results">
                    <h2>{format!("{count} matching recipes")}</h2>
                    <div class="recipe-grid">
                        {matches.into_iter().map(|recipe| view! { <RecipeCard recipe=recipe/> }).collect_view()}
                    </div>
                </section>
            }
            .into_any()
        }
        FetchState::Ready(list) => view! {
            <section class="home-featured">
                <h2>"Featured recipes"</h2>
                <div class="recipe-grid">
                    {featured(&list).into_iter().map(|recipe| view! { <RecipeCard recipe=recipe/> }).collect_view()}
                </div>
                <a class="btn home-featured__all" href="/recipes">"View all recipes"</a>
            </section>
        }
        .into_any(),
    };

    view! {
        <SiteHeader/>
        <main class="home-page">
            <section class="hero">
                <h1>"Plant-powered cooking, made simple"</h1>
                <p>"Find a recipe for any meal, scale it to your table, and share your own."</p>
                <input
                    class="hero__search"
                    type="search"
                    placeholder="Search by name, category, or tag"
                    prop:value=move || query.get()
                    on:input=move |ev| query.set(event_target_value(&ev))
                />
            </section>
            <nav class="category-strip">
                <button
                    class="category-strip__item"
                    class:category-strip__item--active=move || category.get().is_none()
                    on:click=move |_| category.set(None)
                >
                    "All"
                </button>
                {CATEGORIES
                    .into_iter()
                    .map(|name| {
                        view! {
                            <button
                                class="category-strip__item"
                                class:category-strip__item--active=move || category.get() == Some(name)
                                on:click=move |_| {
                                    category.update(|c| *c = if *c == Some(name) { None } else { Some(name) });
                                }
                            >
                                {name}
                            </button>
                        }
                    })
                    .collect_view()}
            </nav>
            {body}
        </main>
    }
}
