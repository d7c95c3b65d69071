//! Connection-scoped SQL functions.
//!
//! SQLite's built-in `lower()` and `LIKE` fold ASCII letters only; catalog
//! search needs full Unicode case folding.

use rusqlite::functions::FunctionFlags;
use rusqlite::types::ValueRef;
use rusqlite::Connection;

/// SQL name of the Unicode lowercase function.
pub const CASEFOLD_FN: &str = "casefold";

/// Registers every catalog SQL function on `conn`.
pub fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        CASEFOLD_FN,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            Ok(match ctx.get_raw(0) {
                ValueRef::Text(bytes) => Some(casefold(&String::from_utf8_lossy(bytes))),
                _ => None,
            })
        },
    )
}

/// Case-insensitive comparison key for catalog text.
pub fn casefold(value: &str) -> String {
    value.to_lowercase()
}
