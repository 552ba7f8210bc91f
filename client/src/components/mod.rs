//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render shared chrome (header, route guard) and recipe
//! presentation pieces, reading auth state from Leptos context.

pub mod recipe_card;
pub mod recipe_image;
pub mod require_auth;
pub mod site_header;
