//! Catalog loader: one read per invocation, no retries.
//!
//! # Responsibility
//! - Resolve store settings and open a read-only catalog connection.
//! - Produce the ordered working set, optionally filtered.
//! - Translate every failure into `Configuration` or `Fetch`.
//!
//! # Invariants
//! - Missing settings are reported before any connection is attempted.
//! - A failed load returns no books; partial results are never surfaced.
//! - Nothing here writes to the store.

use crate::config::{MissingSetting, StoreConfig, StoreSettings, ENV_STORE_KEY, ENV_STORE_URL};
use crate::db::{open_db_read_only, DbError};
use crate::model::book::Book;
use crate::repo::book_repo::{BookQuery, BookSource, CatalogOrder, RepoError, SqliteBookSource};
use log::{error, info, warn};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;

/// Settings problems that only an operator can fix.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error(transparent)]
    Missing(#[from] MissingSetting),
    #[error("store endpoint `{}` does not exist", .0.display())]
    EndpointNotFound(PathBuf),
    #[error("store rejected the configured access key")]
    AccessKeyRejected,
    #[error("store schema is not readable by this build: {0}")]
    Schema(DbError),
}

/// Load failure taxonomy.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("catalog is not configured: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("catalog read failed: {0}")]
    Fetch(#[from] RepoError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadErrorKind {
    Configuration,
    Fetch,
}

impl LoadError {
    pub fn kind(&self) -> LoadErrorKind {
        match self {
            Self::Configuration(_) => LoadErrorKind::Configuration,
            Self::Fetch(_) => LoadErrorKind::Fetch,
        }
    }

    /// Message shown to the reader in place of results.
    pub fn user_message(&self) -> String {
        match self {
            Self::Configuration(_) => format!(
                "Catalog is not configured. Please set {ENV_STORE_URL} and {ENV_STORE_KEY}."
            ),
            Self::Fetch(_) => "Failed to load books".to_string(),
        }
    }
}

impl From<MissingSetting> for LoadError {
    fn from(value: MissingSetting) -> Self {
        Self::Configuration(ConfigurationError::Missing(value))
    }
}

/// Reads working sets from a [`BookSource`].
pub struct CatalogLoader<S: BookSource> {
    source: S,
    order: CatalogOrder,
}

impl<S: BookSource> CatalogLoader<S> {
    /// Creates a loader listing newest books first.
    pub fn new(source: S) -> Self {
        Self {
            source,
            order: CatalogOrder::NewestFirst,
        }
    }

    pub fn with_order(mut self, order: CatalogOrder) -> Self {
        self.order = order;
        self
    }

    pub fn order(&self) -> CatalogOrder {
        self.order
    }

    /// Loads every book, or the books matching `filter`.
    ///
    /// A blank filter is the same as no filter. An empty result is not an
    /// error.
    pub fn load(&self, filter: Option<&str>) -> Result<Vec<Book>, LoadError> {
        let query = match filter {
            Some(text) => BookQuery::matching(text, self.order),
            None => BookQuery::all(self.order),
        };
        let filtered = query.normalized_filter().is_some();
        let term_chars = query.normalized_filter().map_or(0, |term| term.chars().count());
        let started_at = Instant::now();

        match self.source.list_books(&query) {
            Ok(books) => {
                info!(
                    "event=catalog_load module=catalog status=ok filtered={} term_chars={} rows={} duration_ms={}",
                    filtered,
                    term_chars,
                    books.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(books)
            }
            Err(err) => {
                error!(
                    "event=catalog_load module=catalog status=error filtered={} term_chars={} duration_ms={} error={}",
                    filtered,
                    term_chars,
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(LoadError::Fetch(err))
            }
        }
    }

    /// Loads one book for the detail view; `None` means "not found".
    pub fn get_book(&self, id: &str) -> Result<Option<Book>, LoadError> {
        let id = id.trim();
        if id.is_empty() {
            return Ok(None);
        }
        self.source.get_book(id).map_err(|err| {
            error!("event=book_get module=catalog status=error error={err}");
            LoadError::Fetch(err)
        })
    }
}

/// Resolves `settings` and connects a loader to the catalog they name.
pub fn connect(settings: &StoreSettings) -> Result<CatalogLoader<SqliteBookSource>, LoadError> {
    let config = settings.resolve().inspect_err(|missing| {
        warn!("event=catalog_connect module=catalog status=error error_code=missing_setting setting={}", missing.0);
    })?;
    connect_with(&config)
}

/// Connects a loader using complete settings.
pub fn connect_with(config: &StoreConfig) -> Result<CatalogLoader<SqliteBookSource>, LoadError> {
    let path = Path::new(&config.endpoint);
    if !path.exists() {
        warn!("event=catalog_connect module=catalog status=error error_code=endpoint_not_found");
        return Err(ConfigurationError::EndpointNotFound(path.to_path_buf()).into());
    }

    let conn = open_db_read_only(path).map_err(|err| match err {
        DbError::UnsupportedSchemaVersion { .. } | DbError::OutdatedSchemaVersion { .. } => {
            LoadError::Configuration(ConfigurationError::Schema(err))
        }
        DbError::Sqlite(_) => LoadError::Fetch(RepoError::Db(err)),
    })?;

    let source = SqliteBookSource::new(conn);
    match source.read_key()? {
        Some(expected) if expected != config.access_key => {
            warn!("event=catalog_connect module=catalog status=error error_code=access_key_rejected");
            return Err(ConfigurationError::AccessKeyRejected.into());
        }
        expected => info!(
            "event=catalog_connect module=catalog status=ok key_checked={}",
            expected.is_some()
        ),
    }

    Ok(CatalogLoader::new(source))
}

#[cfg(test)]
mod tests {
    use super::{CatalogLoader, LoadError, LoadErrorKind};
    use crate::model::book::Book;
    use crate::repo::book_repo::{BookQuery, BookSource, RepoError, RepoResult};
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingSource {
        queries: RefCell<Vec<BookQuery>>,
    }

    impl BookSource for RecordingSource {
        fn list_books(&self, query: &BookQuery) -> RepoResult<Vec<Book>> {
            self.queries.borrow_mut().push(query.clone());
            Ok(vec![Book::new("b1", "Title", "Author")])
        }

        fn get_book(&self, _id: &str) -> RepoResult<Option<Book>> {
            Ok(None)
        }
    }

    struct BrokenSource;

    impl BookSource for BrokenSource {
        fn list_books(&self, _query: &BookQuery) -> RepoResult<Vec<Book>> {
            Err(RepoError::from(rusqlite::Error::InvalidQuery))
        }

        fn get_book(&self, _id: &str) -> RepoResult<Option<Book>> {
            Err(RepoError::from(rusqlite::Error::InvalidQuery))
        }
    }

    #[test]
    fn blank_filter_is_sent_as_full_listing() {
        let loader = CatalogLoader::new(RecordingSource::default());
        loader.load(Some("   ")).unwrap();
        loader.load(None).unwrap();

        let queries = loader.source.queries.borrow();
        assert!(queries.iter().all(|query| query.normalized_filter().is_none()));
    }

    #[test]
    fn source_failures_surface_as_fetch_errors() {
        let loader = CatalogLoader::new(BrokenSource);
        let err = loader.load(Some("poe")).unwrap_err();
        assert_eq!(err.kind(), LoadErrorKind::Fetch);
        assert_eq!(err.user_message(), "Failed to load books");

        let err = loader.get_book("b1").unwrap_err();
        assert!(matches!(err, LoadError::Fetch(_)));
    }

    #[test]
    fn blank_book_id_is_not_found_without_a_read() {
        let loader = CatalogLoader::new(BrokenSource);
        assert!(loader.get_book("  ").unwrap().is_none());
    }
}
