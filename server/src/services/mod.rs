//! Domain services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own persistence and provider-facing concerns so route
//! handlers can stay focused on protocol translation and auth plumbing.

pub mod recipe;
pub mod seed;
pub mod session;
pub mod upload;
