//! Progressive page hydration.
//!
//! Raw authored HTML is decorated into sections, wrappers and blocks
//! ([`decorate`]), blocks are loaded one at a time in document order
//! ([`loader`]) while sections are revealed strictly top to bottom
//! ([`status`]), and first paint waits on the priority block and the first
//! image ([`reveal`]). [`hydrate::Hydrator`] ties the steps together; the
//! `routes` module serves the result over HTTP.

pub mod components;
pub mod config;
pub mod content;
pub mod context;
pub mod decorate;
pub mod errors;
pub mod fetch;
pub mod hydrate;
pub mod loader;
pub mod markup;
pub mod page;
pub mod render;
pub mod reveal;
pub mod routes;
pub mod state;
pub mod status;

#[cfg(test)]
mod testing;

pub use context::AppContext;
pub use decorate::decorate_page;
pub use hydrate::{Hydrator, PageReport};
pub use loader::BlockLoader;
pub use page::Page;
pub use render::render_page;
