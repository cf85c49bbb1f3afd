//! # Catalog reading
//!
//! `specs` knows how to read the source document. Each spec covers one
//! document shape and turns it into the in-memory [`Catalog`](crate::data::Catalog).
//!
//! ## What lives here
//! - **Pure HTML reading** of a locally saved document.
//! - **Structural anchors**: which list is the tune list, which nested list
//!   holds a tune's links, where a link keeps its URL.
//! - **Label parsing** is delegated to `core::label`, which owns the grammar.
//!
//! ## What does **not** live here
//! - Sampling, export formatting, file naming. Specs only read.
//!
//! ## Conventions
//! - Missing structural anchors are errors (`MalformedCatalogError`);
//!   cosmetic noise (whitespace, extra inline markup, entities) is tolerated.
//! - Specs are testable offline against inline fixtures.
pub mod catalog;
