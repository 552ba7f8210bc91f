//! Canonical recipe model.
//!
//! DESIGN
//! ======
//! A single schema serves the listing, the detail view, the add-recipe
//! submission and the database row. Sub-entities carry no identifiers of
//! their own; list position is their identity and instruction steps are
//! renumbered from position on write.

#[cfg(test)]
#[path = "model_test.rs"]
mod model_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Highest accepted spice rating.
pub const MAX_SPICY_LEVEL: u8 = 5;

/// Relative effort of a recipe.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Self; 3] = [Self::Easy, Self::Medium, Self::Hard];

    /// Lowercase identifier used in storage and form fields.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    /// Capitalized label for display.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }

    /// Parse a difficulty, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "easy" => Some(Self::Easy),
            "medium" => Some(Self::Medium),
            "hard" => Some(Self::Hard),
            _ => None,
        }
    }
}

/// One ingredient line. `amount` is expressed for the recipe's base servings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub name: String,
    pub amount: f64,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, alias = "isOptional")]
    pub optional: bool,
}

/// One preparation step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instruction {
    /// 1-based position in the instruction list.
    pub step: u32,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "image")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "timingInMinutes")]
    pub timing_minutes: Option<u32>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TipCategory {
    Preparation,
    Cooking,
    Storage,
    General,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tip {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<TipCategory>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Alternative {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratio: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Substitution {
    pub ingredient: String,
    pub alternatives: Vec<Alternative>,
}

/// Per-serving nutrition facts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionInfo {
    pub calories: f64,
    pub protein: f64,
    pub carbohydrates: f64,
    pub fat: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiber: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sugar: Option<f64>,
    pub serving_size: String,
}

/// A full recipe as returned by `GET /api/recipes/{id}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(alias = "image")]
    pub image_url: String,
    pub prep_time: u32,
    pub cook_time: u32,
    pub servings: u32,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub spicy_level: u8,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<Instruction>,
    #[serde(default)]
    pub tips: Vec<Tip>,
    #[serde(default)]
    pub substitutions: Vec<Substitution>,
    #[serde(default)]
    pub nutrition: Option<NutritionInfo>,
    /// Author, when the recipe was submitted by a signed-in user.
    #[serde(default)]
    pub user_id: Option<Uuid>,
    /// Milliseconds since the Unix epoch.
    #[serde(default)]
    pub created_at: i64,
    /// Milliseconds since the Unix epoch.
    #[serde(default)]
    pub updated_at: i64,
}

impl Recipe {
    #[must_use]
    pub fn total_time(&self) -> u32 {
        self.prep_time.saturating_add(self.cook_time)
    }
}

/// Listing projection used by the catalog grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSummary {
    pub id: Uuid,
    pub title: String,
    #[serde(alias = "image")]
    pub image_url: String,
    #[serde(default)]
    pub category: Option<String>,
    pub prep_time: u32,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl RecipeSummary {
    /// Case-insensitive match against title, category and tags.
    /// A blank query matches everything.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(&needle)
            || self
                .category
                .as_deref()
                .is_some_and(|c| c.to_lowercase().contains(&needle))
            || self.tags.iter().any(|t| t.to_lowercase().contains(&needle))
    }
}

/// A validated submission, ready to be stored. Produced only by
/// [`crate::RecipeDraft::validate`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecipe {
    pub title: String,
    pub description: String,
    pub prep_time: u32,
    pub cook_time: u32,
    pub servings: u32,
    pub difficulty: Difficulty,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub spicy_level: u8,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<Instruction>,
    pub tips: Vec<Tip>,
    pub substitutions: Vec<Substitution>,
}

impl NewRecipe {
    /// Attach storage-assigned fields to produce a full [`Recipe`].
    #[must_use]
    pub fn into_recipe(self, id: Uuid, image_url: String, user_id: Option<Uuid>, now_ms: i64) -> Recipe {
        Recipe {
            id,
            title: self.title,
            description: self.description,
            image_url,
            prep_time: self.prep_time,
            cook_time: self.cook_time,
            servings: self.servings,
            difficulty: self.difficulty,
            category: self.category,
            tags: self.tags,
            spicy_level: self.spicy_level,
            ingredients: self.ingredients,
            instructions: self.instructions,
            tips: self.tips,
            substitutions: self.substitutions,
            nutrition: None,
            user_id,
            created_at: now_ms,
            updated_at: now_ms,
        }
    }
}
