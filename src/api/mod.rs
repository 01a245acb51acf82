//! API clients for external services
//!
//! - TMDB: Movie/TV listings, details and search
//! - images: poster, backdrop and trailer URL helpers

pub mod images;
pub mod tmdb;

pub use images::{backdrop_url, image_url, trailer_key, trailer_url};
pub use tmdb::{TmdbClient, TmdbError};
