//! Utility helpers shared across client UI modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules keep redirect rules and display formatting out of page
//! components so they can be unit tested without a browser.

pub mod auth;
pub mod format;
