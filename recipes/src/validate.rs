//! Add-recipe draft and validation.
//!
//! The client validates before any network call; the server runs the same
//! code on the decoded multipart body, so both sides reject identically.

#[cfg(test)]
#[path = "validate_test.rs"]
mod validate_test;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{Difficulty, Ingredient, Instruction, MAX_SPICY_LEVEL, NewRecipe, Substitution, Tip};

/// Form field a validation message is attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormField {
    Title,
    Description,
    Image,
    PrepTime,
    CookTime,
    Servings,
    Difficulty,
    SpicyLevel,
    Ingredients,
    Instructions,
}

/// Inline error messages keyed by field. Empty means valid.
pub type FieldErrors = BTreeMap<FormField, String>;

/// Editable ingredient row. Amount is kept as entered and checked on validate.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientDraft {
    pub name: String,
    pub amount: f64,
    pub unit: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub optional: bool,
}

impl IngredientDraft {
    fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.unit.trim().is_empty() && self.amount.is_finite() && self.amount >= 0.0
    }
}

/// Unvalidated add-recipe form contents.
///
/// Numeric fields are signed so out-of-range input survives until
/// validation can report it against the right field.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecipeDraft {
    pub title: String,
    pub description: String,
    /// Whether an image file has been attached. The bytes travel separately.
    pub has_image: bool,
    pub prep_time: i64,
    pub cook_time: i64,
    pub servings: i64,
    pub difficulty: Difficulty,
    pub category: String,
    pub tags: Vec<String>,
    pub spicy_level: i64,
    pub ingredients: Vec<IngredientDraft>,
    pub instructions: Vec<String>,
    pub tips: Vec<String>,
    pub substitutions: Vec<Substitution>,
}

impl RecipeDraft {
    /// Initial state of the add-recipe form: four servings and one blank
    /// ingredient and instruction row.
    #[must_use]
    pub fn new_form() -> Self {
        Self {
            servings: 4,
            ingredients: vec![IngredientDraft::default()],
            instructions: vec![String::new()],
            ..Self::default()
        }
    }

    pub fn add_ingredient(&mut self) {
        self.ingredients.push(IngredientDraft::default());
    }

    /// Remove an ingredient row. The last remaining row is kept.
    pub fn remove_ingredient(&mut self, index: usize) {
        if self.ingredients.len() > 1 && index < self.ingredients.len() {
            self.ingredients.remove(index);
        }
    }

    pub fn add_instruction(&mut self) {
        self.instructions.push(String::new());
    }

    /// Remove an instruction row. The last remaining row is kept.
    pub fn remove_instruction(&mut self, index: usize) {
        if self.instructions.len() > 1 && index < self.instructions.len() {
            self.instructions.remove(index);
        }
    }

    /// Check every field and produce a storable recipe.
    ///
    /// # Errors
    ///
    /// Returns every failing field with its inline message.
    pub fn validate(&self) -> Result<NewRecipe, FieldErrors> {
        let mut errors = FieldErrors::new();

        let title = self.title.trim();
        if title.is_empty() {
            errors.insert(FormField::Title, "Title is required".to_owned());
        }
        let description = self.description.trim();
        if description.is_empty() {
            errors.insert(FormField::Description, "Description is required".to_owned());
        }
        if !self.has_image {
            errors.insert(FormField::Image, "Image is required".to_owned());
        }

        let prep_time = minutes(self.prep_time, "Prep time", FormField::PrepTime, &mut errors);
        let cook_time = minutes(self.cook_time, "Cook time", FormField::CookTime, &mut errors);

        let servings = match u32::try_from(self.servings) {
            Ok(n) if n >= 1 => n,
            _ => {
                errors.insert(FormField::Servings, "At least one serving is required".to_owned());
                0
            }
        };

        let spicy_level = match u8::try_from(self.spicy_level) {
            Ok(n) if n <= MAX_SPICY_LEVEL => n,
            _ => {
                errors.insert(
                    FormField::SpicyLevel,
                    format!("Spice level must be between 0 and {MAX_SPICY_LEVEL}"),
                );
                0
            }
        };

        if self.ingredients.is_empty() {
            errors.insert(FormField::Ingredients, "Add at least one ingredient".to_owned());
        } else if !self.ingredients.iter().all(IngredientDraft::is_complete) {
            errors.insert(
                FormField::Ingredients,
                "All ingredient fields are required and amounts cannot be negative".to_owned(),
            );
        }

        if self.instructions.is_empty() {
            errors.insert(FormField::Instructions, "Add at least one instruction step".to_owned());
        } else if self.instructions.iter().any(|s| s.trim().is_empty()) {
            errors.insert(FormField::Instructions, "All instruction steps are required".to_owned());
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        let ingredients = self
            .ingredients
            .iter()
            .map(|i| Ingredient {
                name: i.name.trim().to_owned(),
                amount: i.amount,
                unit: i.unit.trim().to_owned(),
                notes: non_blank(&i.notes),
                optional: i.optional,
            })
            .collect();

        let instructions = self
            .instructions
            .iter()
            .zip(1_u32..)
            .map(|(text, step)| Instruction {
                step,
                description: text.trim().to_owned(),
                image_url: None,
                timing_minutes: None,
            })
            .collect();

        Ok(NewRecipe {
            title: title.to_owned(),
            description: description.to_owned(),
            prep_time,
            cook_time,
            servings,
            difficulty: self.difficulty,
            category: non_blank(&self.category),
            tags: self.tags.iter().filter_map(|t| non_blank(t)).collect(),
            spicy_level,
            ingredients,
            instructions,
            tips: self
                .tips
                .iter()
                .filter_map(|t| non_blank(t))
                .map(|text| Tip { text, category: None })
                .collect(),
            substitutions: self
                .substitutions
                .iter()
                .filter(|s| !s.ingredient.trim().is_empty())
                .cloned()
                .collect(),
        })
    }
}

fn minutes(value: i64, label: &str, field: FormField, errors: &mut FieldErrors) -> u32 {
    if value < 0 {
        errors.insert(field, format!("{label} cannot be negative"));
        return 0;
    }
    u32::try_from(value).unwrap_or_else(|_| {
        errors.insert(field, format!("{label} is out of range"));
        0
    })
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() { None } else { Some(trimmed.to_owned()) }
}
