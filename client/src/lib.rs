//! # client
//!
//! Leptos + WASM frontend for the Pick Up Plants recipe browser.
//!
//! This crate contains the routing shell, the session manager that owns the
//! signed-in identity, recipe pages, and the REST helpers that talk to the
//! server's `/api` surface. Recipe schema, validation, and serving scaling
//! come from the shared `recipes` crate.

pub mod app;
pub mod components;
pub mod net;
pub mod pages;
pub mod state;
pub mod util;

/// WASM entry point: hydrate the server-rendered body.
#[cfg(feature = "hydrate")]
#[wasm_bindgen::prelude::wasm_bindgen]
pub fn hydrate() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    leptos::mount::hydrate_body(app::App);
}
