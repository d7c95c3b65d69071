//! Connection bootstrap utilities for SQLite catalog stores.
//!
//! # Responsibility
//! - Open writable (bootstrap) or read-only (catalog) connections.
//! - Configure connection pragmas and SQL functions required by core behavior.
//!
//! # Invariants
//! - Writable connections have migrations fully applied.
//! - Read-only connections are returned only when the schema is current.

use super::functions::register_functions;
use super::migrations::{apply_migrations, ensure_current};
use super::DbResult;
use log::{error, info};
use rusqlite::{Connection, OpenFlags};
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (or creates) a catalog file and applies all pending migrations.
///
/// This is the bootstrap path used when provisioning a catalog; browsing code
/// goes through [`open_db_read_only`].
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_with("file", || Connection::open(path), bootstrap_connection)
}

/// Opens an in-memory catalog with all migrations applied.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_with("memory", Connection::open_in_memory, bootstrap_connection)
}

/// Opens an existing catalog file without write access.
///
/// # Errors
/// - Returns `DbError::Sqlite` when the file cannot be opened.
/// - Returns a schema version error when the file was not bootstrapped by a
///   compatible build.
pub fn open_db_read_only(path: impl AsRef<Path>) -> DbResult<Connection> {
    open_with(
        "read_only",
        || {
            Connection::open_with_flags(
                path,
                OpenFlags::SQLITE_OPEN_READ_ONLY
                    | OpenFlags::SQLITE_OPEN_NO_MUTEX
                    | OpenFlags::SQLITE_OPEN_URI,
            )
        },
        check_read_only_connection,
    )
}

fn open_with<O, B>(mode: &'static str, open: O, bootstrap: B) -> DbResult<Connection>
where
    O: FnOnce() -> rusqlite::Result<Connection>,
    B: FnOnce(&mut Connection) -> DbResult<()>,
{
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let mut conn = match open() {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    match bootstrap(&mut conn) {
        Ok(()) => {
            info!(
                "event=db_open module=db status=ok mode={mode} duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err(err) => {
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code=db_bootstrap_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(conn: &mut Connection) -> DbResult<()> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    register_functions(conn)?;
    apply_migrations(conn)?;
    Ok(())
}

fn check_read_only_connection(conn: &mut Connection) -> DbResult<()> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    register_functions(conn)?;
    ensure_current(conn)
}
