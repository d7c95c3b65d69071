//! Catalog domain model.
//!
//! # Invariants
//! - `Book` is the only entity; every view is a projection of it.
//! - Records are read-only inside the core.

pub mod book;
