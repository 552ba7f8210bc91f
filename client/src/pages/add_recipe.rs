//! Add-recipe form.
//!
//! SYSTEM CONTEXT
//! ==============
//! Mounted at `/recipe/new`. Validates locally with the same
//! `RecipeDraft::validate` the server runs, then posts one
//! `multipart/form-data` request to `POST /api/recipes` and navigates to the
//! new recipe on success.
//!
//! DESIGN
//! ======
//! Inputs are kept as text (`RecipeForm`) and converted to a `RecipeDraft`
//! only on submit, so half-typed numbers never fight the input element.
//! Ingredient and instruction rows carry a stable key for keyed rendering;
//! the last remaining row of each list cannot be removed.
//!
//! ERROR HANDLING
//! ==============
//! Local validation failures and the server's 422 field map both land in the
//! same `FieldErrors` signal and render inline next to their fields. Other
//! server failures show as a form-level message. Either way the form stays
//! filled in and can be resubmitted.

#[cfg(test)]
#[path = "add_recipe_test.rs"]
mod add_recipe_test;

use leptos::prelude::*;
use recipes::{Difficulty, FieldErrors, FormField, IngredientDraft, RecipeDraft};

use crate::components::site_header::SiteHeader;

pub const FIX_FIELDS_MESSAGE: &str = "Please fix the highlighted fields";

/// A list row with a key that survives removals of other rows.
#[derive(Clone, Debug, PartialEq)]
pub struct Row<T> {
    pub key: u64,
    pub value: T,
}

/// Remove the row with `key` unless it is the last one left.
pub fn remove_row<T>(rows: &mut Vec<Row<T>>, key: u64) -> bool {
    if rows.len() <= 1 {
        return false;
    }
    let before = rows.len();
    rows.retain(|row| row.key != key);
    rows.len() != before
}

/// Whole-number input. Blank reads as zero; anything unparseable reads as
/// `-1` so validation reports it against the field.
pub fn parse_whole(raw: &str) -> i64 {
    let raw = raw.trim();
    if raw.is_empty() { 0 } else { raw.parse().unwrap_or(-1) }
}

/// Decimal amount input. Blank or unparseable reads as NaN, which
/// validation rejects.
pub fn parse_amount(raw: &str) -> f64 {
    raw.trim().parse().unwrap_or(f64::NAN)
}

/// Comma-separated list, trimmed, blanks dropped.
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_owned)
        .collect()
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IngredientInput {
    pub name: String,
    pub amount: String,
    pub unit: String,
    pub notes: String,
    pub optional: bool,
}

impl IngredientInput {
    fn to_draft(&self) -> IngredientDraft {
        IngredientDraft {
            name: self.name.clone(),
            amount: parse_amount(&self.amount),
            unit: self.unit.clone(),
            notes: self.notes.trim().to_owned(),
            optional: self.optional,
        }
    }
}

/// Raw text of the add-recipe form at submit time.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecipeForm {
    pub title: String,
    pub description: String,
    pub has_image: bool,
    pub prep_time: String,
    pub cook_time: String,
    pub servings: String,
    pub difficulty: Difficulty,
    pub category: String,
    pub tags: String,
    pub spicy_level: String,
    pub ingredients: Vec<IngredientInput>,
    pub instructions: Vec<String>,
    /// One tip per line.
    pub tips: String,
}

impl RecipeForm {
    pub fn to_draft(&self) -> RecipeDraft {
        RecipeDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            has_image: self.has_image,
            prep_time: parse_whole(&self.prep_time),
            cook_time: parse_whole(&self.cook_time),
            servings: parse_whole(&self.servings),
            difficulty: self.difficulty,
            category: self.category.trim().to_owned(),
            tags: split_tags(&self.tags),
            spicy_level: parse_whole(&self.spicy_level),
            ingredients: self.ingredients.iter().map(IngredientInput::to_draft).collect(),
            instructions: self.instructions.clone(),
            tips: self
                .tips
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_owned)
                .collect(),
            substitutions: Vec::new(),
        }
    }
}

#[component]
fn FieldError(errors: RwSignal<FieldErrors>, field: FormField) -> impl IntoView {
    let message = move || errors.with(|e| e.get(&field).cloned());
    view! {
        <Show when=move || message().is_some()>
            <p class="field-error">{move || message().unwrap_or_default()}</p>
        </Show>
    }
}

#[component]
pub fn AddRecipePage() -> impl IntoView {
    let initial = RecipeDraft::new_form();

    let title = RwSignal::new(String::new());
    let description = RwSignal::new(String::new());
    let prep_time = RwSignal::new(String::new());
    let cook_time = RwSignal::new(String::new());
    let servings = RwSignal::new(initial.servings.to_string());
    let difficulty = RwSignal::new(initial.difficulty);
    let category = RwSignal::new(String::new());
    let tags = RwSignal::new(String::new());
    let spicy_level = RwSignal::new("0".to_owned());
    let tips = RwSignal::new(String::new());

    let next_key = StoredValue::new(0_u64);
    let alloc_key = move || {
        next_key.update_value(|k| *k += 1);
        next_key.get_value()
    };
    let ingredients = RwSignal::new(
        initial
            .ingredients
            .iter()
            .map(|_| Row { key: alloc_key(), value: RwSignal::new(IngredientInput::default()) })
            .collect::<Vec<_>>(),
    );
    let instructions = RwSignal::new(
        initial
            .instructions
            .iter()
            .map(|_| Row { key: alloc_key(), value: RwSignal::new(String::new()) })
            .collect::<Vec<_>>(),
    );

    let file_input = NodeRef::<leptos::html::Input>::new();
    let image_name = RwSignal::new(None::<String>);
    let preview = RwSignal::new(None::<String>);

    let errors = RwSignal::new(FieldErrors::new());
    let submit_error = RwSignal::new(String::new());
    let submitting = RwSignal::new(false);

    #[cfg(feature = "hydrate")]
    let navigate = leptos_router::hooks::use_navigate();

    let on_image_change = move |_| {
        #[cfg(feature = "hydrate")]
        {
            let file = selected_file(file_input);
            if let Some(old) = preview.get_untracked() {
                let _ = web_sys::Url::revoke_object_url(&old);
            }
            preview.set(file.as_ref().and_then(|f| web_sys::Url::create_object_url_with_blob(f).ok()));
            image_name.set(file.map(|f| f.name()));
        }
        errors.update(|e| {
            e.remove(&FormField::Image);
        });
    };

    on_cleanup(move || {
        #[cfg(feature = "hydrate")]
        {
            if let Some(url) = preview.get_untracked() {
                let _ = web_sys::Url::revoke_object_url(&url);
            }
        }
    });

    let snapshot = move || RecipeForm {
        title: title.get_untracked(),
        description: description.get_untracked(),
        has_image: image_name.with_untracked(Option::is_some),
        prep_time: prep_time.get_untracked(),
        cook_time: cook_time.get_untracked(),
        servings: servings.get_untracked(),
        difficulty: difficulty.get_untracked(),
        category: category.get_untracked(),
        tags: tags.get_untracked(),
        spicy_level: spicy_level.get_untracked(),
        ingredients: ingredients.with_untracked(|rows| rows.iter().map(|r| r.value.get_untracked()).collect()),
        instructions: instructions.with_untracked(|rows| rows.iter().map(|r| r.value.get_untracked()).collect()),
        tips: tips.get_untracked(),
    };

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }
        let draft = snapshot().to_draft();
        if let Err(field_errors) = draft.validate() {
            errors.set(field_errors);
            submit_error.set(FIX_FIELDS_MESSAGE.to_owned());
            return;
        }
        errors.set(FieldErrors::new());
        submit_error.set(String::new());

        #[cfg(feature = "hydrate")]
        {
            let Some(file) = selected_file(file_input) else {
                errors.update(|e| {
                    e.insert(FormField::Image, "Image is required".to_owned());
                });
                return;
            };
            submitting.set(true);
            let navigate = navigate.clone();
            leptos::task::spawn_local(async move {
                match crate::net::api::create_recipe(&draft, &file).await {
                    Ok(recipe) => {
                        submitting.set(false);
                        navigate(&format!("/recipe/{}", recipe.id), leptos_router::NavigateOptions::default());
                    }
                    Err(err) => {
                        log::warn!("recipe submission failed: {}", err.error);
                        errors.set(err.fields);
                        submit_error.set(err.error);
                        submitting.set(false);
                    }
                }
            });
        }
    };

    let add_ingredient = move |_| {
        let row = Row { key: alloc_key(), value: RwSignal::new(IngredientInput::default()) };
        ingredients.update(|rows| rows.push(row));
    };
    let add_instruction = move |_| {
        let row = Row { key: alloc_key(), value: RwSignal::new(String::new()) };
        instructions.update(|rows| rows.push(row));
    };

    view! {
        <SiteHeader/>
        <main class="add-recipe-page">
            <h1>"Add a Recipe"</h1>
            <form class="recipe-form" on:submit=on_submit>
                <label class="recipe-form__field">
                    "Title"
                    <input
                        type="text"
                        prop:value=move || title.get()
                        on:input=move |ev| title.set(event_target_value(&ev))
                    />
                    <FieldError errors=errors field=FormField::Title/>
                </label>

                <label class="recipe-form__field">
                    "Description"
                    <textarea
                        rows="3"
                        prop:value=move || description.get()
                        on:input=move |ev| description.set(event_target_value(&ev))
                    ></textarea>
                    <FieldError errors=errors field=FormField::Description/>
                </label>

                <label class="recipe-form__field">
                    "Photo"
                    <input type="file" accept="image/*" node_ref=file_input on:change=on_image_change/>
                    <Show when=move || preview.get().is_some()>
                        <img class="recipe-form__preview" src=move || preview.get().unwrap_or_default() alt="Preview"/>
                    </Show>
                    <FieldError errors=errors field=FormField::Image/>
                </label>

                <div class="recipe-form__row">
                    <label class="recipe-form__field">
                        "Prep time (min)"
                        <input
                            type="number"
                            min="0"
                            prop:value=move || prep_time.get()
                            on:input=move |ev| prep_time.set(event_target_value(&ev))
                        />
                        <FieldError errors=errors field=FormField::PrepTime/>
                    </label>
                    <label class="recipe-form__field">
                        "Cook time (min)"
                        <input
                            type="number"
                            min="0"
                            prop:value=move || cook_time.get()
                            on:input=move |ev| cook_time.set(event_target_value(&ev))
                        />
                        <FieldError errors=errors field=FormField::CookTime/>
                    </label>
                    <label class="recipe-form__field">
                        "Servings"
                        <input
                            type="number"
                            min="1"
                            prop:value=move || servings.get()
                            on:input=move |ev| servings.set(event_target_value(&ev))
                        />
                        <FieldError errors=errors field=FormField::Servings/>
                    </label>
                </div>

                <div class="recipe-form__row">
                    <label class="recipe-form__field">
                        "Difficulty"
                        <select on:change=move |ev| {
                            difficulty.set(Difficulty::parse(&event_target_value(&ev)).unwrap_or_default());
                        }>
                            {Difficulty::ALL
                                .into_iter()
                                .map(|d| {
                                    view! {
                                        <option value=d.as_str() selected=move || difficulty.get() == d>
                                            {d.label()}
                                        </option>
                                    }
                                })
                                .collect_view()}
                        </select>
                        <FieldError errors=errors field=FormField::Difficulty/>
                    </label>
                    <label class="recipe-form__field">
                        "Category"
                        <select on:change=move |ev| category.set(event_target_value(&ev))>
                            <option value="">"None"</option>
                            {crate::pages::home::CATEGORIES
                                .into_iter()
                                .map(|c| view! { <option value=c>{c}</option> })
                                .collect_view()}
                        </select>
                    </label>
                    <label class="recipe-form__field">
                        "Spice level (0-5)"
                        <input
                            type="number"
                            min="0"
                            max="5"
                            prop:value=move || spicy_level.get()
                            on:input=move |ev| spicy_level.set(event_target_value(&ev))
                        />
                        <FieldError errors=errors field=FormField::SpicyLevel/>
                    </label>
                </div>

                <label class="recipe-form__field">
                    "Tags (comma separated)"
                    <input
                        type="text"
                        prop:value=move || tags.get()
                        on:input=move |ev| tags.set(event_target_value(&ev))
                    />
                </label>

                <fieldset class="recipe-form__list">
                    <legend>"Ingredients"</legend>
                    <For
                        each=move || ingredients.get()
                        key=|row| row.key
                        children=move |row| {
                            let value = row.value;
                            let key = row.key;
                            view! {
                                <div class="ingredient-row">
                                    <input
                                        type="number"
                                        step="any"
                                        min="0"
                                        placeholder="Amount"
                                        prop:value=move || value.with(|v| v.amount.clone())
                                        on:input=move |ev| value.update(|v| v.amount = event_target_value(&ev))
                                    />
                                    <input
                                        type="text"
                                        placeholder="Unit"
                                        prop:value=move || value.with(|v| v.unit.clone())
                                        on:input=move |ev| value.update(|v| v.unit = event_target_value(&ev))
                                    />
                                    <input
                                        type="text"
                                        placeholder="Ingredient"
                                        prop:value=move || value.with(|v| v.name.clone())
                                        on:input=move |ev| value.update(|v| v.name = event_target_value(&ev))
                                    />
                                    <input
                                        type="text"
                                        placeholder="Notes"
                                        prop:value=move || value.with(|v| v.notes.clone())
                                        on:input=move |ev| value.update(|v| v.notes = event_target_value(&ev))
                                    />
                                    <label class="ingredient-row__optional">
                                        <input
                                            type="checkbox"
                                            prop:checked=move || value.with(|v| v.optional)
                                            on:change=move |ev| value.update(|v| v.optional = event_target_checked(&ev))
                                        />
                                        "Optional"
                                    </label>
                                    <button
                                        type="button"
                                        class="btn btn--ghost"
                                        aria-label="Remove ingredient"
                                        disabled=move || ingredients.with(|rows| rows.len() <= 1)
                                        on:click=move |_| ingredients.update(|rows| {
                                            remove_row(rows, key);
                                        })
                                    >
                                        "✕"
                                    </button>
                                </div>
                            }
                        }
                    />
                    <button type="button" class="btn btn--ghost" on:click=add_ingredient>"+ Add ingredient"</button>
                    <FieldError errors=errors field=FormField::Ingredients/>
                </fieldset>

                <fieldset class="recipe-form__list">
                    <legend>"Instructions"</legend>
                    <For
                        each=move || instructions.get()
                        key=|row| row.key
                        children=move |row| {
                            let value = row.value;
                            let key = row.key;
                            view! {
                                <div class="instruction-row">
                                    <textarea
                                        rows="2"
                                        placeholder="Describe this step"
                                        prop:value=move || value.get()
                                        on:input=move |ev| value.set(event_target_value(&ev))
                                    ></textarea>
                                    <button
                                        type="button"
                                        class="btn btn--ghost"
                                        aria-label="Remove step"
                                        disabled=move || instructions.with(|rows| rows.len() <= 1)
                                        on:click=move |_| instructions.update(|rows| {
                                            remove_row(rows, key);
                                        })
                                    >
                                        "✕"
                                    </button>
                                </div>
                            }
                        }
                    />
                    <button type="button" class="btn btn--ghost" on:click=add_instruction>"+ Add step"</button>
                    <FieldError errors=errors field=FormField::Instructions/>
                </fieldset>

                <label class="recipe-form__field">
                    "Tips (one per line)"
                    <textarea
                        rows="3"
                        prop:value=move || tips.get()
                        on:input=move |ev| tips.set(event_target_value(&ev))
                    ></textarea>
                </label>

                <Show when=move || !submit_error.get().is_empty()>
                    <p class="form-error">{move || submit_error.get()}</p>
                </Show>
                <button class="btn btn--primary" type="submit" disabled=move || submitting.get()>
                    {move || if submitting.get() { "Saving..." } else { "Save Recipe" }}
                </button>
            </form>
        </main>
    }
}

#[cfg(feature = "hydrate")]
fn selected_file(input: NodeRef<leptos::html::Input>) -> Option<web_sys::File> {
    input.get_untracked()?.files()?.get(0)
}
