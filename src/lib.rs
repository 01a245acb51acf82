//! DevFlix - browse movies and shows, keep a favorites list
//!
//! Catalog data comes from TMDB. Favorites live in a small store that keeps
//! one entry per `(id, media type)` and mirrors itself to durable storage.
//!
//! # Modules
//!
//! - `models` - Catalog and favorites data structures
//! - `api` - TMDB client plus image and trailer URL helpers
//! - `storage` - Key-value storage backends
//! - `favorites` - The favorites store
//! - `projection` - Sorting, filtering and display defaults for list screens
//! - `app` - Screen state for a front-end
//! - `config` - Config file and API key lookup
//! - `cli` / `commands` - Command line surface

pub mod api;
pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod favorites;
pub mod models;
pub mod projection;
pub mod storage;

// Re-export commonly used types
pub use models::{
    Candidate, FavoriteEntry, MediaType, MovieDetail, MovieSummary, Page, SearchResult, TvDetail,
    TvSummary, Video,
};

pub use api::{TmdbClient, TmdbError};
pub use app::{App, LoadState, Screen};
pub use favorites::{FavoritesStore, FAVORITES_KEY};
pub use projection::{SortKey, TypeFilter};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
