//! Shared recipe schema for the server and the Leptos client.
//!
//! This crate owns the one canonical representation of a recipe on the wire
//! and in the UI, along with the pure logic both sides must agree on:
//! serving scaling, add-recipe validation, multipart field names, and the
//! auth DTOs exchanged with `/api/auth/*`.

pub mod auth;
pub mod form;
pub mod model;
pub mod servings;
pub mod validate;

pub use auth::{ApiError, Credentials, EmailRequest, PasswordUpdate, SessionInfo, SignUpOutcome, User};
pub use model::{
    Alternative, Difficulty, Ingredient, Instruction, NewRecipe, NutritionInfo, Recipe, RecipeSummary, Substitution,
    Tip, TipCategory,
};
pub use servings::{format_amount, scale_amount};
pub use validate::{FieldErrors, FormField, IngredientDraft, RecipeDraft};
