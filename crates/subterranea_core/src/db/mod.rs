//! SQLite storage bootstrap and schema checks for the book catalog.
//!
//! # Responsibility
//! - Open and configure SQLite connections to a catalog store.
//! - Apply schema migrations when bootstrapping a catalog file.
//! - Register the SQL functions catalog queries rely on.
//! - Refuse read-only connections whose schema this build does not understand.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Catalog reads never happen before the schema version has been checked.

use thiserror::Error;

pub mod functions;
pub mod migrations;
mod open;

pub use functions::casefold;
pub use open::{open_db, open_db_in_memory, open_db_read_only};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug, Error)]
pub enum DbError {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error("database schema version {db_version} is newer than supported {latest_supported}")]
    UnsupportedSchemaVersion { db_version: u32, latest_supported: u32 },
    #[error("database schema version {db_version} is older than required {required}")]
    OutdatedSchemaVersion { db_version: u32, required: u32 },
}
