//! Networking modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` handles REST calls to the server's `/api` surface. Wire types come
//! from the shared `recipes` crate.

pub mod api;
