//! Catalog page: every recipe as a card grid, newest first.

use leptos::prelude::*;
use recipes::RecipeSummary;

use crate::components::recipe_card::RecipeCard;
use crate::components::site_header::SiteHeader;
use crate::state::fetch::FetchState;

#[component]
pub fn RecipeListPage() -> impl IntoView {
    let catalog = RwSignal::new(FetchState::<Vec<RecipeSummary>>::Loading);

    #[cfg(feature = "hydrate")]
    leptos::task::spawn_local(async move {
        catalog.set(FetchState::from(crate::net::api::fetch_recipes().await));
    });

    let body = move || match catalog.get() {
        FetchState::Loading => view! { <p class="page-status">"Loading recipes..."</p> }.into_any(),
        FetchState::Failed(message) => view! { <p class="page-status page-status--error">{message}</p> }.into_any(),
        FetchState::Ready(list) if list.is_empty() => view! {
            <p class="page-status">"No recipes yet. " <a href="/recipe/new">"Add the first one."</a></p>
        }
        .into_any(),
        FetchState::Ready(list) => view! {
            <div class="recipe-grid">
                {list.into_iter().map(|recipe| view! { <RecipeCard recipe=recipe/> }).collect_view()}
            </div>
        }
        .into_any(),
    };

    view! {
        <SiteHeader/>
        <main class="recipe-list-page">
            <header class="recipe-list-page__header">
                <h1>"Recipes"</h1>
                <a class="btn" href="/recipe/new">"Add Recipe"</a>
            </header>
            {body}
        </main>
    }
}
