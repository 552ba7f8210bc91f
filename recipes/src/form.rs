//! Multipart field layout for `POST /api/recipes`.
//!
//! Scalar fields travel as plain text parts; list fields travel as JSON text
//! parts; the image travels as a file part named [`IMAGE`].

#[cfg(test)]
#[path = "form_test.rs"]
mod form_test;

use serde::Deserialize;

use crate::model::{Difficulty, Substitution};
use crate::validate::{FormField, IngredientDraft, RecipeDraft};

pub const TITLE: &str = "title";
pub const DESCRIPTION: &str = "description";
pub const IMAGE: &str = "image";
pub const PREP_TIME: &str = "prepTime";
pub const COOK_TIME: &str = "cookTime";
pub const SERVINGS: &str = "servings";
pub const DIFFICULTY: &str = "difficulty";
pub const CATEGORY: &str = "category";
pub const TAGS: &str = "tags";
pub const SPICY_LEVEL: &str = "spicyLevel";
pub const INGREDIENTS: &str = "ingredients";
pub const INSTRUCTIONS: &str = "instructions";
pub const TIPS: &str = "tips";
pub const SUBSTITUTIONS: &str = "substitutions";

/// A text part that could not be decoded into the draft.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FieldDecodeError {
    #[error("field {field} must be a whole number")]
    NotANumber { field: String },
    #[error("unknown difficulty: {0}")]
    Difficulty(String),
    #[error("field {field} is not valid JSON: {reason}")]
    Json { field: String, reason: String },
}

impl FieldDecodeError {
    /// Form field the error is reported against. Malformed `tags`, `tips`
    /// and `substitutions` lists have no inline slot and map to `None`.
    #[must_use]
    pub fn form_field(&self) -> Option<FormField> {
        let field = match self {
            Self::Difficulty(_) => return Some(FormField::Difficulty),
            Self::NotANumber { field } | Self::Json { field, .. } => field.as_str(),
        };
        match field {
            PREP_TIME => Some(FormField::PrepTime),
            COOK_TIME => Some(FormField::CookTime),
            SERVINGS => Some(FormField::Servings),
            SPICY_LEVEL => Some(FormField::SpicyLevel),
            INGREDIENTS => Some(FormField::Ingredients),
            INSTRUCTIONS => Some(FormField::Instructions),
            _ => None,
        }
    }

    /// Message shown next to the field.
    #[must_use]
    pub fn inline_message(&self) -> String {
        match self {
            Self::NotANumber { .. } => "Enter a whole number".to_owned(),
            Self::Difficulty(_) => "Choose easy, medium or hard".to_owned(),
            Self::Json { .. } => "Could not read this list".to_owned(),
        }
    }
}

/// Encode the text parts of a draft in submission order.
#[must_use]
pub fn encode_fields(draft: &RecipeDraft) -> Vec<(&'static str, String)> {
    let instructions: Vec<&str> = draft.instructions.iter().map(String::as_str).collect();
    vec![
        (TITLE, draft.title.clone()),
        (DESCRIPTION, draft.description.clone()),
        (PREP_TIME, draft.prep_time.to_string()),
        (COOK_TIME, draft.cook_time.to_string()),
        (SERVINGS, draft.servings.to_string()),
        (DIFFICULTY, draft.difficulty.as_str().to_owned()),
        (CATEGORY, draft.category.clone()),
        (SPICY_LEVEL, draft.spicy_level.to_string()),
        (TAGS, json_text(&draft.tags)),
        (INGREDIENTS, json_text(&draft.ingredients)),
        (INSTRUCTIONS, json_text(&instructions)),
        (TIPS, json_text(&draft.tips)),
        (SUBSTITUTIONS, json_text(&draft.substitutions)),
    ]
}

fn json_text<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "[]".to_owned())
}

/// An instruction may arrive as a bare string or as `{ "text" }` /
/// `{ "description" }`.
#[derive(Deserialize)]
#[serde(untagged)]
enum InstructionPart {
    Text(String),
    Object {
        #[serde(alias = "text")]
        description: String,
    },
}

/// Apply one decoded text part to the draft. Unknown field names are ignored.
///
/// # Errors
///
/// Returns an error when a numeric, enum, or JSON field cannot be parsed.
pub fn apply_field(draft: &mut RecipeDraft, name: &str, value: &str) -> Result<(), FieldDecodeError> {
    match name {
        TITLE => draft.title = value.to_owned(),
        DESCRIPTION => draft.description = value.to_owned(),
        CATEGORY => draft.category = value.to_owned(),
        PREP_TIME => draft.prep_time = parse_int(name, value)?,
        COOK_TIME => draft.cook_time = parse_int(name, value)?,
        SERVINGS => draft.servings = parse_int(name, value)?,
        SPICY_LEVEL => draft.spicy_level = parse_int(name, value)?,
        DIFFICULTY => {
            draft.difficulty = Difficulty::parse(value).ok_or_else(|| FieldDecodeError::Difficulty(value.to_owned()))?;
        }
        TAGS => draft.tags = parse_json::<Vec<String>>(name, value)?,
        INGREDIENTS => draft.ingredients = parse_json::<Vec<IngredientDraft>>(name, value)?,
        INSTRUCTIONS => {
            draft.instructions = parse_json::<Vec<InstructionPart>>(name, value)?
                .into_iter()
                .map(|part| match part {
                    InstructionPart::Text(text) | InstructionPart::Object { description: text } => text,
                })
                .collect();
        }
        TIPS => draft.tips = parse_json::<Vec<String>>(name, value)?,
        SUBSTITUTIONS => draft.substitutions = parse_json::<Vec<Substitution>>(name, value)?,
        _ => {}
    }
    Ok(())
}

fn parse_int(field: &str, value: &str) -> Result<i64, FieldDecodeError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed
        .parse::<i64>()
        .map_err(|_| FieldDecodeError::NotANumber { field: field.to_owned() })
}

fn parse_json<T: serde::de::DeserializeOwned>(field: &str, value: &str) -> Result<T, FieldDecodeError> {
    let trimmed = value.trim();
    let source = if trimmed.is_empty() { "[]" } else { trimmed };
    serde_json::from_str(source).map_err(|e| FieldDecodeError::Json { field: field.to_owned(), reason: e.to_string() })
}
