//! Core of the Subterranea catalog: loading, paging and laying out books.
//! Presentation layers (the CLI, a web front end) only render what this crate
//! computes.

pub mod catalog;
pub mod config;
pub mod db;
pub mod layout;
pub mod logging;
pub mod model;
pub mod repo;
pub mod route;
pub mod session;

pub use catalog::loader::{
    connect, connect_with, CatalogLoader, ConfigurationError, LoadError, LoadErrorKind,
};
pub use config::{AppConfig, ConfigError, StoreConfig, StoreSettings};
pub use layout::shelf::{build_shelf, Shelf, ShelfEntry, ShelfSection};
pub use layout::{
    compute_page, shuffle, shuffle_with_seed, LayoutConfig, LayoutConfigError, NumberingPolicy,
    PageView, PlacedBook, Zone,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::book::{Book, BookCategory, BookId};
pub use repo::book_repo::{BookQuery, BookSource, CatalogOrder, RepoError, SqliteBookSource};
pub use route::Route;
pub use session::{BrowseSession, LoadOutcome, LoadTicket, SessionError, SessionView};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
