//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Each page owns route-scoped fetching and form state and delegates shared
//! presentation to `components`.

pub mod add_recipe;
pub mod home;
pub mod login;
pub mod recipe_detail;
pub mod recipe_list;
