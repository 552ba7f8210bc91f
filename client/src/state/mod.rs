//! Client-side state containers.
//!
//! SYSTEM CONTEXT
//! ==============
//! `auth` holds the signed-in identity, `session` is its only writer, and
//! `fetch` models the load status of a recipe view.

pub mod auth;
pub mod fetch;
pub mod session;
