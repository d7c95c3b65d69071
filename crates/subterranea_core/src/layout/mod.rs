//! Pagination and two-page spread layout.
//!
//! # Responsibility
//! - Slice a loaded working set into pages of a fixed size.
//! - Split each page into a left and a right zone.
//! - Assign every placed book one display index under a single policy.
//!
//! # Invariants
//! - `compute_page` is pure and total for any validated [`LayoutConfig`].
//! - Out-of-range pages are clamped, never rejected.
//! - One view never mixes zone positions with catalog numbers.
//! - Shuffling is a permutation, applied by the caller once per load.

use crate::model::book::Book;
use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod shelf;

/// Books per inventory page.
pub const INVENTORY_RECORDS_PER_PAGE: usize = 27;
/// Books placed on the left page of an inventory spread.
pub const INVENTORY_LEFT_ZONE_CAPACITY: usize = 15;

/// How placed books are numbered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberingPolicy {
    /// `position within zone + 1`.
    #[default]
    ZonePosition,
    /// The book's stable `booknumber`; unnumbered books get no index.
    CatalogNumber,
}

impl NumberingPolicy {
    pub(crate) fn index_for(self, book: &Book, position: usize) -> Option<u32> {
        match self {
            Self::ZonePosition => u32::try_from(position + 1).ok(),
            Self::CatalogNumber => book.booknumber,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutConfigError {
    #[error("records_per_page must be greater than zero")]
    ZeroRecordsPerPage,
    #[error("left_zone_capacity {left_zone_capacity} exceeds records_per_page {records_per_page}")]
    LeftZoneTooLarge {
        left_zone_capacity: usize,
        records_per_page: usize,
    },
}

/// Validated layout constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutConfig {
    records_per_page: usize,
    left_zone_capacity: usize,
    numbering: NumberingPolicy,
}

impl LayoutConfig {
    /// Validates layout constants.
    ///
    /// # Errors
    /// - `ZeroRecordsPerPage` when `records_per_page == 0`.
    /// - `LeftZoneTooLarge` when the left zone cannot fit on a page.
    pub fn new(
        records_per_page: usize,
        left_zone_capacity: usize,
    ) -> Result<Self, LayoutConfigError> {
        if records_per_page == 0 {
            return Err(LayoutConfigError::ZeroRecordsPerPage);
        }
        if left_zone_capacity > records_per_page {
            return Err(LayoutConfigError::LeftZoneTooLarge {
                left_zone_capacity,
                records_per_page,
            });
        }
        Ok(Self {
            records_per_page,
            left_zone_capacity,
            numbering: NumberingPolicy::default(),
        })
    }

    pub fn with_numbering(mut self, numbering: NumberingPolicy) -> Self {
        self.numbering = numbering;
        self
    }

    pub fn records_per_page(&self) -> usize {
        self.records_per_page
    }

    pub fn left_zone_capacity(&self) -> usize {
        self.left_zone_capacity
    }

    pub fn numbering(&self) -> NumberingPolicy {
        self.numbering
    }

    /// Number of pages needed for `record_count` books; zero for none.
    pub fn total_pages(&self, record_count: usize) -> u32 {
        u32::try_from(record_count.div_ceil(self.records_per_page)).unwrap_or(u32::MAX)
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            records_per_page: INVENTORY_RECORDS_PER_PAGE,
            left_zone_capacity: INVENTORY_LEFT_ZONE_CAPACITY,
            numbering: NumberingPolicy::ZonePosition,
        }
    }
}

/// Side of the spread a book is placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    Left,
    Right,
}

/// A book placed on the current spread.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedBook<'a> {
    pub book: &'a Book,
    pub zone: Zone,
    pub display_index: Option<u32>,
    pub tilt_degrees: f64,
}

/// Visible slice of the working set for one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageView<'a> {
    pub left_zone: Vec<PlacedBook<'a>>,
    pub right_zone: Vec<PlacedBook<'a>>,
    pub current_page: u32,
    pub total_pages: u32,
    pub full_page_slice: &'a [Book],
}

impl<'a> PageView<'a> {
    /// Whole page in slice order, numbered exactly like the zones.
    pub fn listing(&self) -> impl Iterator<Item = &PlacedBook<'a>> + '_ {
        self.left_zone.iter().chain(self.right_zone.iter())
    }

    pub fn is_empty(&self) -> bool {
        self.full_page_slice.is_empty()
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}

/// Computes the spread for `page`.
///
/// `page` is clamped into `[1, max(total_pages, 1)]`. An empty working set
/// yields empty zones with `total_pages == 0`.
pub fn compute_page<'a>(all: &'a [Book], page: u32, config: &LayoutConfig) -> PageView<'a> {
    let total_pages = config.total_pages(all.len());
    let current_page = page.clamp(1, total_pages.max(1));

    let start = (current_page as usize - 1)
        .saturating_mul(config.records_per_page)
        .min(all.len());
    let end = start.saturating_add(config.records_per_page).min(all.len());
    let page_slice = &all[start..end];

    let split = config.left_zone_capacity.min(page_slice.len());
    let (left, right) = page_slice.split_at(split);

    PageView {
        left_zone: place(left, Zone::Left, config.numbering),
        right_zone: place(right, Zone::Right, config.numbering),
        current_page,
        total_pages,
        full_page_slice: page_slice,
    }
}

fn place(books: &[Book], zone: Zone, numbering: NumberingPolicy) -> Vec<PlacedBook<'_>> {
    books
        .iter()
        .enumerate()
        .map(|(position, book)| PlacedBook {
            book,
            zone,
            display_index: numbering.index_for(book, position),
            tilt_degrees: book.tilt_degrees(),
        })
        .collect()
}

/// Fisher–Yates shuffle: for `i` from the last index down to 1, swap `i` with
/// a uniformly drawn `j` in `[0, i]`.
pub fn shuffle<T>(items: &mut [T], rng: &mut impl RngCore) {
    for i in (1..items.len()).rev() {
        let j = uniform_index(rng, i);
        items.swap(i, j);
    }
}

/// Shuffles `items` with a ChaCha8 stream seeded from `seed`.
pub fn shuffle_with_seed<T>(items: &mut [T], seed: u64) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    shuffle(items, &mut rng);
}

/// Draws uniformly from `[0, max_inclusive]` by rejection sampling.
fn uniform_index(rng: &mut impl RngCore, max_inclusive: usize) -> usize {
    let range = max_inclusive as u64 + 1;
    let limit = u64::MAX - u64::MAX % range;
    loop {
        let draw = rng.next_u64();
        if draw < limit {
            return (draw % range) as usize;
        }
    }
}
