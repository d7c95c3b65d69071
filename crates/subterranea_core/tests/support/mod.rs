#![allow(dead_code)]

use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use subterranea_core::db::open_db;
use subterranea_core::Book;

pub fn book(id: &str, title: &str, author: &str, created_at: i64) -> Book {
    let mut book = Book::new(id, title, author);
    book.created_at = created_at;
    book.updated_at = created_at;
    book
}

/// `b1..=bN`, with `b1` the newest.
pub fn numbered_books(count: usize) -> Vec<Book> {
    (1..=count)
        .map(|n| {
            book(
                &format!("b{n}"),
                &format!("Title {n}"),
                "Author",
                (count - n) as i64 * 1000,
            )
        })
        .collect()
}

pub fn insert_book(conn: &Connection, book: &Book) {
    conn.execute(
        "INSERT INTO books (
            id, title, author, description, cover_image_url, external_link,
            isbn, published_year, genre, category, booknumber, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13);",
        params![
            book.id,
            book.title,
            book.author,
            book.description,
            book.cover_image_url,
            book.external_link,
            book.isbn,
            book.published_year,
            book.genre,
            book.category,
            book.booknumber,
            book.created_at,
            book.updated_at,
        ],
    )
    .unwrap();
}

pub fn set_read_key(conn: &Connection, key: &str) {
    conn.execute(
        "INSERT OR REPLACE INTO catalog_meta (key, value) VALUES ('read_key', ?1);",
        [key],
    )
    .unwrap();
}

/// Creates a bootstrapped catalog file holding `books`.
pub fn catalog_file(dir: &Path, books: &[Book], read_key: Option<&str>) -> PathBuf {
    let path = dir.join("catalog.sqlite3");
    let conn = open_db(&path).unwrap();
    for book in books {
        insert_book(&conn, book);
    }
    if let Some(key) = read_key {
        set_read_key(&conn, key);
    }
    path
}
