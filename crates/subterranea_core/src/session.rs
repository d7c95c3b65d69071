//! Browsing session state.
//!
//! # Responsibility
//! - Hold the per-session state explicitly: search term, current page, load
//!   state and working set.
//! - Sequence loads so that only the newest request is applied.
//! - Gate layout computation on a completed load.
//!
//! # Invariants
//! - A load result is applied only if its ticket is the latest issued.
//! - The working set is shuffled at most once per applied load.
//! - A failed load leaves no books behind.
//! - Page navigation outside `[1, total_pages]` is ignored.

use crate::catalog::loader::{CatalogLoader, LoadError, LoadErrorKind};
use crate::layout::shelf::{build_shelf, Shelf};
use crate::layout::{compute_page, shuffle_with_seed, LayoutConfig, NumberingPolicy, PageView};
use crate::model::book::Book;
use crate::repo::book_repo::BookSource;
use log::{debug, warn};
use serde::Serialize;

/// Proof that a load was started; handed back on completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    sequence: u64,
}

impl LoadTicket {
    pub fn sequence(&self) -> u64 {
        self.sequence
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// A newer load was started after this one; its result was dropped.
    Stale,
}

/// Error state shown in place of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionError {
    pub kind: LoadErrorKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum LoadState {
    Idle,
    Loading,
    Ready(Vec<Book>),
    Failed(SessionError),
}

/// What the presentation layer should render right now.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionView<'a> {
    Loading,
    Failed(&'a SessionError),
    /// A completed load with zero matching books.
    NoResults,
    Page(PageView<'a>),
}

/// Session-scoped browsing state.
#[derive(Debug, Clone)]
pub struct BrowseSession {
    sequence: u64,
    search_term: Option<String>,
    current_page: u32,
    state: LoadState,
    shuffle_seed: Option<u64>,
}

impl Default for BrowseSession {
    fn default() -> Self {
        Self::new()
    }
}

impl BrowseSession {
    pub fn new() -> Self {
        Self {
            sequence: 0,
            search_term: None,
            current_page: 1,
            state: LoadState::Idle,
            shuffle_seed: None,
        }
    }

    /// Shuffles each applied working set once, with a ChaCha8 stream seeded
    /// from `seed`.
    pub fn with_shuffle_seed(mut self, seed: u64) -> Self {
        self.shuffle_seed = Some(seed);
        self
    }

    pub fn search_term(&self) -> Option<&str> {
        self.search_term.as_deref()
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, LoadState::Loading)
    }

    /// Working set of the last applied load; empty otherwise.
    pub fn books(&self) -> &[Book] {
        match &self.state {
            LoadState::Ready(books) => books,
            _ => &[],
        }
    }

    /// Starts a load for `term`, superseding any load still outstanding.
    pub fn begin_load(&mut self, term: Option<&str>) -> LoadTicket {
        self.sequence += 1;
        self.search_term = term
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        self.current_page = 1;
        self.state = LoadState::Loading;
        debug!(
            "event=session_load module=session status=start sequence={} filtered={}",
            self.sequence,
            self.search_term.is_some()
        );
        LoadTicket {
            sequence: self.sequence,
        }
    }

    /// Applies a finished load unless a newer one has been started since.
    pub fn complete_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<Book>, LoadError>,
    ) -> LoadOutcome {
        if ticket.sequence != self.sequence {
            warn!(
                "event=session_load module=session status=stale sequence={} latest={}",
                ticket.sequence, self.sequence
            );
            return LoadOutcome::Stale;
        }

        self.state = match result {
            Ok(mut books) => {
                if let Some(seed) = self.shuffle_seed {
                    shuffle_with_seed(&mut books, seed);
                }
                LoadState::Ready(books)
            }
            Err(err) => LoadState::Failed(SessionError {
                kind: err.kind(),
                message: self.failure_message(&err),
            }),
        };
        LoadOutcome::Applied
    }

    /// Runs a whole load against `loader` for `term`.
    pub fn load_from<S: BookSource>(
        &mut self,
        loader: &CatalogLoader<S>,
        term: Option<&str>,
    ) -> LoadOutcome {
        let ticket = self.begin_load(term);
        let result = loader.load(self.search_term.as_deref());
        self.complete_load(ticket, result)
    }

    /// Moves to `page` if it exists for the current working set.
    pub fn go_to_page(&mut self, page: u32, config: &LayoutConfig) -> bool {
        let total_pages = config.total_pages(self.books().len());
        if page >= 1 && page <= total_pages {
            self.current_page = page;
            true
        } else {
            false
        }
    }

    pub fn next_page(&mut self, config: &LayoutConfig) -> bool {
        self.go_to_page(self.current_page.saturating_add(1), config)
    }

    pub fn previous_page(&mut self, config: &LayoutConfig) -> bool {
        self.go_to_page(self.current_page.saturating_sub(1), config)
    }

    /// Current view; layout is computed only for a completed load.
    pub fn view(&self, config: &LayoutConfig) -> SessionView<'_> {
        match &self.state {
            LoadState::Idle | LoadState::Loading => SessionView::Loading,
            LoadState::Failed(err) => SessionView::Failed(err),
            LoadState::Ready(books) if books.is_empty() => SessionView::NoResults,
            LoadState::Ready(books) => {
                SessionView::Page(compute_page(books, self.current_page, config))
            }
        }
    }

    /// Category shelf over the loaded working set, once a load has completed.
    pub fn shelf(&self, numbering: NumberingPolicy) -> Option<Shelf<'_>> {
        match &self.state {
            LoadState::Ready(books) => Some(build_shelf(books, numbering)),
            _ => None,
        }
    }

    fn failure_message(&self, err: &LoadError) -> String {
        match (err.kind(), self.search_term.is_some()) {
            (LoadErrorKind::Fetch, true) => "Failed to search books".to_string(),
            _ => err.user_message(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BrowseSession, LoadOutcome, SessionView};
    use crate::catalog::loader::{LoadError, LoadErrorKind};
    use crate::config::MissingSetting;
    use crate::layout::LayoutConfig;
    use crate::model::book::Book;
    use crate::repo::book_repo::RepoError;

    fn books(count: usize) -> Vec<Book> {
        (1..=count)
            .map(|n| Book::new(format!("b{n}"), format!("Title {n}"), "Author"))
            .collect()
    }

    #[test]
    fn view_is_loading_until_a_load_completes() {
        let mut session = BrowseSession::new();
        let config = LayoutConfig::default();
        assert_eq!(session.view(&config), SessionView::Loading);

        let ticket = session.begin_load(None);
        assert!(session.is_loading());
        assert_eq!(session.view(&config), SessionView::Loading);

        session.complete_load(ticket, Ok(books(3)));
        assert!(matches!(session.view(&config), SessionView::Page(_)));
    }

    #[test]
    fn stale_results_are_discarded() {
        let mut session = BrowseSession::new();
        let first = session.begin_load(Some("poe"));
        let second = session.begin_load(Some("angelou"));

        assert_eq!(session.complete_load(second, Ok(books(2))), LoadOutcome::Applied);
        assert_eq!(session.complete_load(first, Ok(books(40))), LoadOutcome::Stale);
        assert_eq!(session.books().len(), 2);
        assert_eq!(session.search_term(), Some("angelou"));
    }

    #[test]
    fn empty_load_is_no_results_not_loading() {
        let mut session = BrowseSession::new();
        let ticket = session.begin_load(None);
        session.complete_load(ticket, Ok(Vec::new()));
        assert_eq!(session.view(&LayoutConfig::default()), SessionView::NoResults);
    }

    #[test]
    fn failed_search_clears_books_and_reports_search_message() {
        let mut session = BrowseSession::new();
        let ticket = session.begin_load(None);
        session.complete_load(ticket, Ok(books(5)));

        let ticket = session.begin_load(Some("fic"));
        let err = LoadError::Fetch(RepoError::from(rusqlite::Error::InvalidQuery));
        session.complete_load(ticket, Err(err));

        assert!(session.books().is_empty());
        match session.view(&LayoutConfig::default()) {
            SessionView::Failed(err) => {
                assert_eq!(err.kind, LoadErrorKind::Fetch);
                assert_eq!(err.message, "Failed to search books");
            }
            other => panic!("unexpected view: {other:?}"),
        }
    }

    #[test]
    fn configuration_failure_keeps_configuration_message() {
        let mut session = BrowseSession::new();
        let ticket = session.begin_load(Some("fic"));
        session.complete_load(ticket, Err(MissingSetting("endpoint").into()));
        match session.view(&LayoutConfig::default()) {
            SessionView::Failed(err) => {
                assert_eq!(err.kind, LoadErrorKind::Configuration);
                assert!(err.message.starts_with("Catalog is not configured"));
            }
            other => panic!("unexpected view: {other:?}"),
        }
    }

    #[test]
    fn navigation_stays_within_loaded_pages() {
        let config = LayoutConfig::default();
        let mut session = BrowseSession::new();
        let ticket = session.begin_load(None);
        session.complete_load(ticket, Ok(books(56)));

        assert!(!session.previous_page(&config));
        assert!(session.next_page(&config));
        assert!(session.next_page(&config));
        assert!(!session.next_page(&config));
        assert_eq!(session.current_page(), 3);
        assert!(!session.go_to_page(0, &config));
        assert!(session.go_to_page(2, &config));

        session.begin_load(Some("new term"));
        assert_eq!(session.current_page(), 1);
    }

    #[test]
    fn paging_does_not_reshuffle() {
        let config = LayoutConfig::new(5, 3).unwrap();
        let mut session = BrowseSession::new().with_shuffle_seed(11);
        let ticket = session.begin_load(None);
        session.complete_load(ticket, Ok(books(20)));
        let shuffled: Vec<_> = session.books().iter().map(|book| book.id.clone()).collect();

        session.next_page(&config);
        session.previous_page(&config);
        let after: Vec<_> = session.books().iter().map(|book| book.id.clone()).collect();
        assert_eq!(shuffled, after);
    }
}
