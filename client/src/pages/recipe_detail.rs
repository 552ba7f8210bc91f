//! Recipe detail page with serving-size scaling.
//!
//! SYSTEM CONTEXT
//! ==============
//! Mounted at `/recipe/:id`. Fetches the recipe whenever the id changes. A
//! missing or unparseable id never reaches the network and renders the same
//! "Recipe not found" state as a 404.
//!
//! DESIGN
//! ======
//! The servings stepper starts at the recipe's own servings and never goes
//! below one. Ingredient amounts are recomputed from the stored base amounts
//! on every change, so repeated stepping never accumulates rounding error.

#[cfg(test)]
#[path = "recipe_detail_test.rs"]
mod recipe_detail_test;

use leptos::prelude::*;
use leptos_router::hooks::use_params_map;
use recipes::servings::{decrement_servings, increment_servings};
use recipes::{Recipe, format_amount, scale_amount};
use uuid::Uuid;

use crate::components::recipe_image::RecipeImage;
use crate::components::site_header::SiteHeader;
use crate::state::fetch::FetchState;
use crate::util::format::{minutes_label, servings_label, spicy_label};

pub const NOT_FOUND: &str = "Recipe not found";

pub fn parse_recipe_id(raw: Option<&str>) -> Result<Uuid, String> {
    raw.and_then(|id| Uuid::parse_str(id.trim()).ok())
        .ok_or_else(|| NOT_FOUND.to_owned())
}

/// One ingredient line as displayed for the requested servings.
#[derive(Clone, Debug, PartialEq)]
pub struct ScaledIngredient {
    pub amount: String,
    pub unit: String,
    pub name: String,
    pub notes: Option<String>,
    pub optional: bool,
}

pub fn scaled_ingredients(recipe: &Recipe, servings: u32) -> Vec<ScaledIngredient> {
    recipe
        .ingredients
        .iter()
        .map(|ingredient| ScaledIngredient {
            amount: format_amount(scale_amount(ingredient.amount, recipe.servings, servings)),
            unit: ingredient.unit.clone(),
            name: ingredient.name.clone(),
            notes: ingredient.notes.clone(),
            optional: ingredient.optional,
        })
        .collect()
}

#[component]
pub fn RecipeDetailPage() -> impl IntoView {
    let params = use_params_map();
    let state = RwSignal::new(FetchState::<Recipe>::Loading);
    let servings = RwSignal::new(1_u32);

    Effect::new(move || {
        let raw = params.with(|p| p.get("id"));
        match parse_recipe_id(raw.as_deref()) {
            Err(message) => state.set(FetchState::Failed(message)),
            Ok(id) => {
                state.set(FetchState::Loading);
                #[cfg(feature = "hydrate")]
                leptos::task::spawn_local(async move {
                    let result = crate::net::api::fetch_recipe(id).await;
                    if let Ok(recipe) = &result {
                        servings.set(recipe.servings.max(1));
                    }
                    state.set(FetchState::from(result));
                });
                #[cfg(not(feature = "hydrate"))]
                let _ = id;
            }
        }
    });

    let body = move || match state.get() {
        FetchState::Loading => view! { <p class="page-status">"Loading recipe..."</p> }.into_any(),
        FetchState::Failed(message) => view! {
            <div class="page-status page-status--error">
                <p>{message}</p>
                <a href="/recipes">"Back to recipes"</a>
            </div>
        }
        .into_any(),
        FetchState::Ready(recipe) => view! { <RecipeView recipe=recipe servings=servings/> }.into_any(),
    };

    view! {
        <SiteHeader/>
        <main class="recipe-detail-page">{body}</main>
    }
}

#[component]
fn RecipeView(recipe: Recipe, servings: RwSignal<u32>) -> impl IntoView {
    let for_ingredients = recipe.clone();
    let ingredients = move || {
        scaled_ingredients(&for_ingredients, servings.get())
            .into_iter()
            .map(|line| {
                view! {
                    <li class="ingredient" class:ingredient--optional=line.optional>
                        <span class="ingredient__amount">{line.amount} " " {line.unit}</span>
                        " "
                        <span class="ingredient__name">{line.name}</span>
                        {line.notes.map(|notes| view! { <span class="ingredient__notes">{format!(" ({notes})")}</span> })}
                        {line.optional.then(|| view! { <span class="ingredient__optional">" optional"</span> })}
                    </li>
                }
            })
            .collect_view()
    };

    let instructions = recipe
        .instructions
        .iter()
        .map(|step| {
            let image = step.image_url.clone().map(|src| {
                view! { <RecipeImage src=src alt=format!("Step {}", step.step) class="instruction__image"/> }
            });
            view! {
                <li class="instruction">
                    <span class="instruction__step">{step.step}</span>
                    <p>{step.description.clone()}</p>
                    {step.timing_minutes.map(|m| view! { <span class="instruction__timing">{minutes_label(m)}</span> })}
                    {image}
                </li>
            }
        })
        .collect_view();

    let tips = (!recipe.tips.is_empty()).then(|| {
        let items = recipe
            .tips
            .iter()
            .map(|tip| view! { <li>{tip.text.clone()}</li> })
            .collect_view();
        view! {
            <section class="recipe-section">
                <h2>"Tips"</h2>
                <ul class="tips">{items}</ul>
            </section>
        }
    });

    let substitutions = (!recipe.substitutions.is_empty()).then(|| {
        let items = recipe
            .substitutions
            .iter()
            .map(|sub| {
                let alternatives = sub
                    .alternatives
                    .iter()
                    .map(|alt| {
                        let mut label = alt.name.clone();
                        if let Some(ratio) = &alt.ratio {
                            label.push_str(&format!(" ({ratio})"));
                        }
                        if let Some(notes) = &alt.notes {
                            label.push_str(&format!(": {notes}"));
                        }
                        label
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                view! {
                    <li>
                        <strong>{sub.ingredient.clone()}</strong>
                        " → "
                        {alternatives}
                    </li>
                }
            })
            .collect_view();
        view! {
            <section class="recipe-section">
                <h2>"Substitutions"</h2>
                <ul class="substitutions">{items}</ul>
            </section>
        }
    });

    let nutrition = recipe.nutrition.clone().map(|n| {
        view! {
            <section class="recipe-section">
                <h2>"Nutrition"</h2>
                <p class="nutrition__serving">{format!("Per {}", n.serving_size)}</p>
                <dl class="nutrition">
                    <dt>"Calories"</dt><dd>{format_amount(n.calories)}</dd>
                    <dt>"Protein"</dt><dd>{format!("{} g", format_amount(n.protein))}</dd>
                    <dt>"Carbs"</dt><dd>{format!("{} g", format_amount(n.carbohydrates))}</dd>
                    <dt>"Fat"</dt><dd>{format!("{} g", format_amount(n.fat))}</dd>
                    {n.fiber.map(|f| view! { <dt>"Fiber"</dt><dd>{format!("{} g", format_amount(f))}</dd> })}
                    {n.sugar.map(|s| view! { <dt>"Sugar"</dt><dd>{format!("{} g", format_amount(s))}</dd> })}
                </dl>
            </section>
        }
    });

    let tags = recipe
        .tags
        .iter()
        .map(|tag| view! { <span class="tag">{tag.clone()}</span> })
        .collect_view();

    view! {
        <article class="recipe-detail">
            <RecipeImage src=recipe.image_url.clone() alt=recipe.title.clone() class="recipe-detail__image"/>
            <header class="recipe-detail__header">
                {recipe.category.clone().map(|c| view! { <span class="recipe-detail__category">{c}</span> })}
                <h1>{recipe.title.clone()}</h1>
                <p class="recipe-detail__description">{recipe.description.clone()}</p>
                <ul class="recipe-detail__meta">
                    <li>"Prep " {minutes_label(recipe.prep_time)}</li>
                    <li>"Cook " {minutes_label(recipe.cook_time)}</li>
                    <li>"Total " {minutes_label(recipe.total_time())}</li>
                    <li>{recipe.difficulty.label()}</li>
                    <li>{spicy_label(recipe.spicy_level)}</li>
                </ul>
                <div class="tags">{tags}</div>
            </header>

            <section class="recipe-section">
                <div class="recipe-section__heading">
                    <h2>"Ingredients"</h2>
                    <div class="servings-stepper">
                        <button
                            class="servings-stepper__button"
                            aria-label="Fewer servings"
                            disabled=move || servings.get() <= 1
                            on:click=move |_| servings.update(|s| *s = decrement_servings(*s))
                        >
                            "-"
                        </button>
                        <span class="servings-stepper__value">{move || servings_label(servings.get())}</span>
                        <button
                            class="servings-stepper__button"
                            aria-label="More servings"
                            on:click=move |_| servings.update(|s| *s = increment_servings(*s))
                        >
                            "+"
                        </button>
                    </div>
                </div>
                <ul class="ingredients">{ingredients}</ul>
            </section>

            <section class="recipe-section">
                <h2>"Instructions"</h2>
                <ol class="instructions">{instructions}</ol>
            </section>

            {tips}
            {substitutions}
            {nutrition}
        </article>
    }
}
