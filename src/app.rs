//! App state and core application logic
//!
//! Headless view-model for a DevFlix front-end: per-screen loading state with a
//! stale-response guard, the "my list" screen, and the favorites store they
//! share. A renderer reads this state and forwards user events to it.

use chrono::Utc;
use std::fmt::Display;

use crate::favorites::FavoritesStore;
use crate::models::*;
use crate::projection::{self, SortKey, TypeFilter};
use crate::storage::Storage;

// =============================================================================
// Loading State
// =============================================================================

/// idle -> loading -> ready | error
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState<T> {
    #[default]
    Idle,
    Loading,
    Ready(T),
    Error(String),
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, LoadState::Error(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            LoadState::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

// =============================================================================
// Screen
// =============================================================================

/// Proof that a request was issued; only the latest one may land
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// A screen showing one remote resource identified by `K`.
///
/// Requests can finish in any order. [`Screen::resolve`] applies a result only
/// when its ticket is the most recent one issued, so a slow response for a
/// title the user already navigated away from is dropped.
#[derive(Debug, Clone)]
pub struct Screen<K, T> {
    key: Option<K>,
    state: LoadState<T>,
    issued: u64,
}

impl<K, T> Default for Screen<K, T> {
    fn default() -> Self {
        Self {
            key: None,
            state: LoadState::Idle,
            issued: 0,
        }
    }
}

impl<K: Clone + PartialEq, T> Screen<K, T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start loading `key`, superseding any request in flight
    pub fn request(&mut self, key: K) -> Ticket {
        self.issued += 1;
        self.key = Some(key);
        self.state = LoadState::Loading;
        Ticket(self.issued)
    }

    /// Re-issue the request for the current key. No-op unless in error.
    pub fn retry(&mut self) -> Option<(K, Ticket)> {
        if !self.state.is_error() {
            return None;
        }
        let key = self.key.clone()?;
        let ticket = self.request(key.clone());
        Some((key, ticket))
    }

    /// Apply a finished request. Returns false when the result was stale.
    pub fn resolve<E: Display>(&mut self, ticket: Ticket, result: Result<T, E>) -> bool {
        if ticket.0 != self.issued {
            tracing::debug!(ticket = ticket.0, latest = self.issued, "dropping stale response");
            return false;
        }
        self.state = match result {
            Ok(data) => LoadState::Ready(data),
            Err(e) => LoadState::Error(e.to_string()),
        };
        true
    }

    /// Leave the screen; any in-flight result becomes stale
    pub fn reset(&mut self) {
        self.issued += 1;
        self.key = None;
        self.state = LoadState::Idle;
    }

    pub fn key(&self) -> Option<&K> {
        self.key.as_ref()
    }

    pub fn state(&self) -> &LoadState<T> {
        &self.state
    }

    pub fn data(&self) -> Option<&T> {
        self.state.data()
    }
}

// =============================================================================
// Selection State
// =============================================================================

/// Selection state for list views
#[derive(Debug, Clone, Default)]
pub struct ListState {
    /// Currently selected index
    pub selected: usize,
    /// Total number of items
    pub len: usize,
}

impl ListState {
    pub fn new(len: usize) -> Self {
        Self { selected: 0, len }
    }

    /// Move selection up
    pub fn up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Move selection down
    pub fn down(&mut self) {
        if self.len > 0 && self.selected < self.len - 1 {
            self.selected += 1;
        }
    }

    /// Update length (e.g., after the list changed)
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        // Clamp selected to valid range
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}

// =============================================================================
// My List Screen
// =============================================================================

/// Filter and sort chosen on the favorites screen
#[derive(Debug, Clone, Default)]
pub struct MyListState {
    pub filter: TypeFilter,
    pub sort: SortKey,
    pub list: ListState,
}

/// One card on the favorites screen, with display defaults applied
#[derive(Debug, Clone, PartialEq)]
pub struct MyListRow {
    pub id: u64,
    pub media_type: MediaType,
    pub title: String,
    pub year: String,
    pub rating: String,
    pub overview: Option<String>,
    pub added: String,
    pub poster_url: Option<String>,
    pub link: String,
}

impl MyListRow {
    fn from_entry(entry: &FavoriteEntry, now: chrono::DateTime<Utc>) -> Self {
        Self {
            id: entry.id,
            media_type: entry.media_type,
            title: entry.title.clone(),
            year: projection::year_label(entry),
            rating: projection::rating_label(entry),
            overview: projection::overview_excerpt(entry),
            added: projection::added_label(entry.added_at, now),
            poster_url: crate::api::image_url(entry.poster_path.as_deref()),
            link: format!("/{}/{}", entry.media_type.as_str(), entry.id),
        }
    }
}

// =============================================================================
// Main Application State
// =============================================================================

pub struct App<S: Storage> {
    pub favorites: FavoritesStore<S>,
    pub movie_detail: Screen<u64, MovieDetail>,
    pub tv_detail: Screen<u64, TvDetail>,
    pub search: Screen<String, Page<SearchResult>>,
    pub my_list: MyListState,
}

impl<S: Storage> App<S> {
    pub fn new(storage: S) -> Self {
        let favorites = FavoritesStore::open(storage);
        let mut my_list = MyListState::default();
        my_list.list.set_len(favorites.count());
        Self {
            favorites,
            movie_detail: Screen::new(),
            tv_detail: Screen::new(),
            search: Screen::new(),
            my_list,
        }
    }

    /// Heart icon on the open movie or show. Returns the new membership.
    pub fn toggle_current(&mut self, media_type: MediaType) -> Option<bool> {
        let candidate = match media_type {
            MediaType::Movie => Candidate::from(self.movie_detail.data()?),
            MediaType::Tv => Candidate::from(self.tv_detail.data()?),
        };
        let now_favorite = self.favorites.toggle(candidate);
        self.refresh_my_list();
        Some(now_favorite)
    }

    /// Heart icon on a search result
    pub fn toggle_search_result(&mut self, index: usize) -> Option<bool> {
        let candidate = Candidate::from(self.search.data()?.results.get(index)?);
        let now_favorite = self.favorites.toggle(candidate);
        self.refresh_my_list();
        Some(now_favorite)
    }

    pub fn remove_favorite(&mut self, id: u64, media_type: MediaType) -> bool {
        let removed = self.favorites.remove(id, media_type);
        self.refresh_my_list();
        removed
    }

    pub fn clear_favorites(&mut self) {
        self.favorites.clear();
        self.refresh_my_list();
    }

    pub fn set_filter(&mut self, filter: TypeFilter) {
        self.my_list.filter = filter;
        self.refresh_my_list();
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.my_list.sort = sort;
    }

    /// Rows for the favorites screen, in display order
    pub fn my_list_rows(&self) -> Vec<MyListRow> {
        let now = Utc::now();
        projection::project(self.favorites.entries(), self.my_list.filter, self.my_list.sort)
            .into_iter()
            .map(|e| MyListRow::from_entry(e, now))
            .collect()
    }

    /// Counts for the "All / Movies / Shows" filter buttons
    pub fn filter_counts(&self) -> (usize, usize, usize) {
        (
            self.favorites.count(),
            self.favorites.list_by_type(MediaType::Movie).len(),
            self.favorites.list_by_type(MediaType::Tv).len(),
        )
    }

    fn refresh_my_list(&mut self) {
        let filter = self.my_list.filter;
        let len = self
            .favorites
            .entries()
            .iter()
            .filter(|e| filter.matches(e))
            .count();
        self.my_list.list.set_len(len);
    }
}
