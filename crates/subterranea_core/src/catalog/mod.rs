//! Catalog loading entry points.
//!
//! # Responsibility
//! - Connect to the configured store and read working sets from it.
//!
//! # See also
//! - `crate::session` for how loads are sequenced within a browsing session.

pub mod loader;
