//! Book read interface and SQLite implementation.
//!
//! # Responsibility
//! - Define the narrow read contract the catalog depends on.
//! - Keep SQL details (filtering, ordering, row decoding) inside this module.
//!
//! # Invariants
//! - The contract is read-only; no method mutates the store.
//! - Rows failing [`Book::validate`] are skipped with a warning; one bad row
//!   never hides the rest of the catalog.
//! - Filter matching is a Unicode case-insensitive substring OR across
//!   `title`, `author`, `description`, `genre`, `category`.

use crate::db::{casefold, DbError};
use crate::model::book::Book;
use log::warn;
use rusqlite::{params, Connection, Row};
use thiserror::Error;

const BOOK_SELECT_SQL: &str = "SELECT
    id,
    title,
    author,
    description,
    cover_image_url,
    external_link,
    isbn,
    published_year,
    genre,
    category,
    booknumber,
    created_at,
    updated_at
FROM books";

// `casefold` is registered by `crate::db` on every connection it opens.
const FILTER_SQL: &str = " WHERE casefold(title) LIKE ?1 ESCAPE '\\'
    OR casefold(author) LIKE ?1 ESCAPE '\\'
    OR casefold(description) LIKE ?1 ESCAPE '\\'
    OR casefold(genre) LIKE ?1 ESCAPE '\\'
    OR casefold(category) LIKE ?1 ESCAPE '\\'";

const READ_KEY_NAME: &str = "read_key";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for catalog reads.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Db(#[from] DbError),
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Ordering applied to a full listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CatalogOrder {
    /// `created_at DESC`, ties broken by `id ASC`.
    #[default]
    NewestFirst,
    /// Insertion order of the underlying store.
    StoreOrder,
}

/// Query options for listing books.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookQuery {
    /// Free-text filter; blank text is treated as no filter.
    pub filter: Option<String>,
    pub order: CatalogOrder,
}

impl BookQuery {
    /// Listing of every book in the given order.
    pub fn all(order: CatalogOrder) -> Self {
        Self {
            filter: None,
            order,
        }
    }

    /// Filtered listing in the given order.
    pub fn matching(filter: impl Into<String>, order: CatalogOrder) -> Self {
        Self {
            filter: Some(filter.into()),
            order,
        }
    }

    /// Trimmed filter text, `None` when absent or blank.
    pub fn normalized_filter(&self) -> Option<&str> {
        self.filter
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}

/// Read contract for a book catalog store.
pub trait BookSource {
    /// Lists books matching `query`.
    fn list_books(&self, query: &BookQuery) -> RepoResult<Vec<Book>>;
    /// Gets one book by id.
    fn get_book(&self, id: &str) -> RepoResult<Option<Book>>;
}

/// SQLite-backed book source.
pub struct SqliteBookSource {
    conn: Connection,
}

impl SqliteBookSource {
    /// Wraps a connection opened through [`crate::db`], which has its schema
    /// checked and its SQL functions registered.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Access key the store expects readers to present, if it declares one.
    pub fn read_key(&self) -> RepoResult<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT value FROM catalog_meta WHERE key = ?1;")?;
        let mut rows = stmt.query([READ_KEY_NAME])?;
        match rows.next()? {
            Some(row) => Ok(Some(row.get(0)?)),
            None => Ok(None),
        }
    }

    /// Gives the connection back, e.g. for fixtures that seed rows.
    pub fn into_inner(self) -> Connection {
        self.conn
    }
}

impl BookSource for SqliteBookSource {
    fn list_books(&self, query: &BookQuery) -> RepoResult<Vec<Book>> {
        let mut sql = String::from(BOOK_SELECT_SQL);
        let pattern = query
            .normalized_filter()
            .map(|filter| like_pattern(&casefold(filter)));
        if pattern.is_some() {
            sql.push_str(FILTER_SQL);
        }
        sql.push_str(match query.order {
            CatalogOrder::NewestFirst => " ORDER BY created_at DESC, id ASC;",
            CatalogOrder::StoreOrder => " ORDER BY rowid ASC;",
        });

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = match pattern.as_deref() {
            Some(pattern) => stmt.query(params![pattern])?,
            None => stmt.query([])?,
        };

        let mut books = Vec::new();
        while let Some(row) = rows.next()? {
            books.extend(valid_or_skipped(parse_book_row(row)?));
        }
        Ok(books)
    }

    fn get_book(&self, id: &str) -> RepoResult<Option<Book>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{BOOK_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(valid_or_skipped(parse_book_row(row)?)),
            None => Ok(None),
        }
    }
}

/// Keeps renderable rows; logs and drops the rest.
fn valid_or_skipped(book: Book) -> Option<Book> {
    match book.validate() {
        Ok(()) => Some(book),
        Err(err) => {
            warn!(
                "event=book_row_skipped module=repo status=skipped id={} reason={}",
                book.id, err
            );
            None
        }
    }
}

/// Builds a `LIKE` pattern matching `filter` anywhere, with wildcards escaped.
fn like_pattern(filter: &str) -> String {
    let mut pattern = String::with_capacity(filter.len() + 2);
    pattern.push('%');
    for ch in filter.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn parse_book_row(row: &Row<'_>) -> RepoResult<Book> {
    Ok(Book {
        id: row.get("id")?,
        title: row.get("title")?,
        author: row.get("author")?,
        description: row.get("description")?,
        cover_image_url: row.get("cover_image_url")?,
        external_link: row.get("external_link")?,
        isbn: row.get("isbn")?,
        published_year: row.get("published_year")?,
        genre: row.get("genre")?,
        category: row.get("category")?,
        booknumber: row.get("booknumber")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

#[cfg(test)]
mod tests {
    use super::{like_pattern, BookQuery, CatalogOrder};

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("fic"), "%fic%");
        assert_eq!(like_pattern("100%_a\\b"), "%100\\%\\_a\\\\b%");
    }

    #[test]
    fn blank_filter_normalizes_to_none() {
        let query = BookQuery::matching("   ", CatalogOrder::NewestFirst);
        assert_eq!(query.normalized_filter(), None);
        let query = BookQuery::matching("  poe ", CatalogOrder::NewestFirst);
        assert_eq!(query.normalized_filter(), Some("poe"));
    }
}
