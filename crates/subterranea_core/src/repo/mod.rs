//! Repository layer over the catalog store.
//!
//! # Responsibility
//! - Define the read-only data access contract used by the catalog loader.
//! - Isolate SQLite query details from loading and layout.

pub mod book_repo;
