//! Category shelf for the "view all" listing.
//!
//! Sections come in a fixed order with a fixed cap each. Uncategorized books
//! are shelved with artist books; unrecognized categories are not shelved.

use crate::layout::NumberingPolicy;
use crate::model::book::{Book, BookCategory};
use serde::Serialize;

/// One fixed shelf section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SectionSpec {
    pub category: BookCategory,
    pub heading: &'static str,
    pub label: &'static str,
    pub cap: usize,
}

pub const SHELF_SECTIONS: [SectionSpec; 5] = [
    SectionSpec {
        category: BookCategory::ArtistBook,
        heading: "Artist Book",
        label: "AB",
        cap: 5,
    },
    SectionSpec {
        category: BookCategory::Magazine,
        heading: "Magazine",
        label: "M",
        cap: 4,
    },
    SectionSpec {
        category: BookCategory::Demo,
        heading: "Demo",
        label: "Demo",
        cap: 3,
    },
    SectionSpec {
        category: BookCategory::Digital,
        heading: "Digi Files",
        label: "Digi Files",
        cap: 2,
    },
    SectionSpec {
        category: BookCategory::Cargo,
        heading: "Cargo (Sample)",
        label: "Cargo",
        cap: 2,
    },
];

impl SectionSpec {
    fn admits(&self, book: &Book) -> bool {
        if book.is_uncategorized() {
            self.category == BookCategory::ArtistBook
        } else {
            book.known_category() == Some(self.category)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShelfEntry<'a> {
    pub book: &'a Book,
    pub display_index: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShelfSection<'a> {
    pub spec: SectionSpec,
    pub entries: Vec<ShelfEntry<'a>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Shelf<'a> {
    pub sections: Vec<ShelfSection<'a>>,
    featured: Option<&'a Book>,
}

impl<'a> Shelf<'a> {
    /// Book previewed before the reader hovers anything: the first loaded one.
    pub fn featured(&self) -> Option<&'a Book> {
        self.featured
    }

    pub fn is_empty(&self) -> bool {
        self.sections.iter().all(|section| section.entries.is_empty())
    }
}

/// Groups the working set into shelf sections, keeping working-set order.
pub fn build_shelf(all: &[Book], numbering: NumberingPolicy) -> Shelf<'_> {
    let sections = SHELF_SECTIONS
        .iter()
        .map(|spec| ShelfSection {
            spec: *spec,
            entries: all
                .iter()
                .filter(|book| spec.admits(book))
                .take(spec.cap)
                .enumerate()
                .map(|(position, book)| ShelfEntry {
                    book,
                    display_index: numbering.index_for(book, position),
                })
                .collect(),
        })
        .collect();

    Shelf {
        sections,
        featured: all.first(),
    }
}
