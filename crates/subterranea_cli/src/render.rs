//! Plain-text rendering of catalog views.
//!
//! Every view is built as a list of lines and joined once, each line ending in
//! a newline.

use subterranea_core::{Book, PageView, PlacedBook, Route, SessionView, Shelf};

pub const NO_RESULTS: &str = "No Books Found";
pub const BOOK_NOT_FOUND: &str = "Book not found";

pub fn session_view(view: &SessionView<'_>) -> String {
    match view {
        SessionView::Loading => lines(vec!["Loading...".to_string()]),
        SessionView::Failed(err) => lines(vec![err.message.clone()]),
        SessionView::NoResults => lines(vec![NO_RESULTS.to_string()]),
        SessionView::Page(page) => page_view(page),
    }
}

fn page_view(page: &PageView<'_>) -> String {
    let mut out = vec![format!("Page {} of {}", page.current_page, page.total_pages)];
    out.extend(zone("Left", &page.left_zone));
    if !page.right_zone.is_empty() {
        out.extend(zone("Right", &page.right_zone));
    }

    let mut hints = Vec::new();
    if page.has_previous() {
        hints.push(format!("previous: --page {}", page.current_page - 1));
    }
    if page.has_next() {
        hints.push(format!("next: --page {}", page.current_page + 1));
    }
    if !hints.is_empty() {
        out.push(format!("({})", hints.join(", ")));
    }
    lines(out)
}

fn zone(heading: &str, placed: &[PlacedBook<'_>]) -> Vec<String> {
    std::iter::once(format!("[{heading}]"))
        .chain(
            placed
                .iter()
                .map(|entry| entry_line(entry.display_index, entry.book)),
        )
        .collect()
}

pub fn shelf(shelf: &Shelf<'_>) -> String {
    if shelf.is_empty() {
        return lines(vec![NO_RESULTS.to_string()]);
    }

    let mut out = Vec::new();
    if let Some(featured) = shelf.featured() {
        out.push(format!("Featured: {}", byline(featured)));
    }
    for section in &shelf.sections {
        out.push(String::new());
        out.push(format!("{} ({})", section.spec.heading, section.spec.label));
        if section.entries.is_empty() {
            out.push("     (empty)".to_string());
        }
        out.extend(
            section
                .entries
                .iter()
                .map(|entry| entry_line(entry.display_index, entry.book)),
        );
    }
    lines(out)
}

pub fn book_detail(book: &Book) -> String {
    let mut out = vec![book.title.clone(), format!("by {}", book.author)];
    if let Some(year) = book.published_year {
        out.push(format!("Published: {year}"));
    }
    if let Some(genre) = &book.genre {
        out.push(format!("Genre: {genre}"));
    }
    if let Some(category) = book.category.as_deref().filter(|_| !book.is_uncategorized()) {
        out.push(format!("Category: {category}"));
    }
    if let Some(isbn) = &book.isbn {
        out.push(format!("ISBN: {isbn}"));
    }
    if let Some(number) = book.booknumber {
        out.push(format!("No. {number}"));
    }
    if !book.description.is_empty() {
        out.push(String::new());
        out.push(book.description.clone());
        out.push(String::new());
    }
    let cover = book.cover_url();
    if !cover.is_empty() {
        out.push(format!("Cover: {cover}"));
    }
    if !book.external_link.is_empty() {
        out.push(format!("Link: {}", book.external_link));
    }
    out.push(format!(
        "Route: {}",
        Route::Book {
            id: book.id.clone()
        }
    ));
    lines(out)
}

fn lines(lines: Vec<String>) -> String {
    lines.into_iter().map(|line| line + "\n").collect()
}

fn entry_line(index: Option<u32>, book: &Book) -> String {
    format!("{:>4}  {}", index_label(index), byline(book))
}

fn byline(book: &Book) -> String {
    format!("{} by {}", book.title, book.author)
}

fn index_label(index: Option<u32>) -> String {
    index.map_or_else(|| "-".to_string(), |index| format!("{index}."))
}
