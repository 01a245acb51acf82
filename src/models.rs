//! Data structures and types for DevFlix
//!
//! Contains all shared models used across the application organized by domain:
//! - **Catalog**: TMDB listings, search results and title details
//! - **Favorites**: saved entries and the loosely-typed candidates they are built from

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Media Type
// =============================================================================

/// Media type discriminator. A movie and a show may share the same numeric id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[default]
    Movie,
    Tv,
}

impl MediaType {
    /// Path segment used by the catalog API and in detail links
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MediaType::Movie => write!(f, "Movie"),
            MediaType::Tv => write!(f, "TV Show"),
        }
    }
}

// =============================================================================
// Catalog Models (TMDB)
// =============================================================================

/// One page of a paginated catalog listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub page: u32,
    pub results: Vec<T>,
    pub total_pages: u32,
    pub total_results: u32,
}

impl<T> Page<T> {
    /// Map every result, keeping the pagination counters
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            page: self.page,
            results: self.results.into_iter().map(f).collect(),
            total_pages: self.total_pages,
            total_results: self.total_results,
        }
    }
}

/// Movie as it appears in listings (popular, top rated, upcoming, search)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: u64,
    pub title: String,
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub vote_average: Option<f32>,
    pub release_date: Option<String>,
}

impl fmt::Display for MovieSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.release_date.as_deref().and_then(extract_year) {
            Some(year) => write!(f, "{} ({})", self.title, year),
            None => write!(f, "{}", self.title),
        }
    }
}

/// Show as it appears in listings (popular, top rated, on the air)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TvSummary {
    pub id: u64,
    pub name: String,
    pub overview: String,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub vote_average: Option<f32>,
    pub first_air_date: Option<String>,
}

impl fmt::Display for TvSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.first_air_date.as_deref().and_then(extract_year) {
            Some(year) => write!(f, "{} ({})", self.name, year),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Search result from TMDB multi-search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: u64,
    pub media_type: MediaType,
    pub title: String,
    pub year: Option<u16>,
    pub overview: String,
    pub poster_path: Option<String>,
    pub vote_average: Option<f32>,
    pub release_date: Option<String>,
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let year_str = self.year.map(|y| format!(" ({})", y)).unwrap_or_default();
        write!(f, "{}{} [{}]", self.title, year_str, self.media_type)
    }
}

/// A video attached to a title (trailers, teasers, featurettes)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub key: String,
    pub site: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: String,
}

/// Cast credit, in billing order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CastMember {
    pub name: String,
    pub character: Option<String>,
    pub profile_path: Option<String>,
}

/// Detailed movie information from TMDB
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieDetail {
    pub id: u64,
    pub title: String,
    pub tagline: Option<String>,
    pub release_date: Option<String>,
    pub runtime: Option<u32>,
    pub genres: Vec<String>,
    pub overview: String,
    pub vote_average: Option<f32>,
    pub vote_count: u32,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub videos: Vec<Video>,
    pub cast: Vec<CastMember>,
}

impl fmt::Display for MovieDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)?;
        if let Some(year) = self.release_date.as_deref().and_then(extract_year) {
            write!(f, " ({})", year)?;
        }
        if let Some(runtime) = self.runtime.filter(|r| *r > 0) {
            write!(f, " - {}h {}m", runtime / 60, runtime % 60)?;
        }
        match self.vote_average {
            Some(rating) => write!(f, " - ⭐ {:.1}", rating),
            None => write!(f, " - ⭐ N/A"),
        }
    }
}

/// Detailed TV show information from TMDB
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TvDetail {
    pub id: u64,
    pub name: String,
    pub tagline: Option<String>,
    pub first_air_date: Option<String>,
    pub last_air_date: Option<String>,
    pub number_of_seasons: u32,
    pub number_of_episodes: u32,
    pub status: Option<String>,
    pub genres: Vec<String>,
    pub overview: String,
    pub vote_average: Option<f32>,
    pub vote_count: u32,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub videos: Vec<Video>,
    pub cast: Vec<CastMember>,
}

impl TvDetail {
    /// Year span such as "2008 - 2013", or a single year while the show is running
    pub fn years(&self) -> Option<String> {
        let first = self.first_air_date.as_deref().and_then(extract_year)?;
        match self.last_air_date.as_deref().and_then(extract_year) {
            Some(last) if last != first => Some(format!("{} - {}", first, last)),
            _ => Some(first.to_string()),
        }
    }
}

impl fmt::Display for TvDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(years) = self.years() {
            write!(f, " ({})", years)?;
        }
        write!(f, " - {} seasons", self.number_of_seasons)?;
        match self.vote_average {
            Some(rating) => write!(f, " - ⭐ {:.1}", rating),
            None => write!(f, " - ⭐ N/A"),
        }
    }
}

// =============================================================================
// Favorites
// =============================================================================

/// A title the user saved. Display fields are captured when the entry is
/// created and never refreshed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredFavorite")]
pub struct FavoriteEntry {
    pub id: u64,
    pub media_type: MediaType,
    pub title: String,
    pub poster_path: Option<String>,
    pub overview: Option<String>,
    pub vote_average: Option<f32>,
    pub release_date: Option<String>,
    pub added_at: Option<DateTime<Utc>>,
}

impl FavoriteEntry {
    /// Identity of the entry within the collection
    pub fn key(&self) -> (u64, MediaType) {
        (self.id, self.media_type)
    }

    /// Release (or first air) year, if the date parses
    pub fn year(&self) -> Option<u16> {
        self.release_date.as_deref().and_then(extract_year)
    }
}

impl fmt::Display for FavoriteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let year_str = self.year().map(|y| format!(" ({})", y)).unwrap_or_default();
        write!(f, "{}{} [{}]", self.title, year_str, self.media_type)
    }
}

/// Lenient on-disk shape of a favorite.
///
/// Older data may lack `media_type` (defaults to movie), carry `name` instead
/// of `title`, `first_air_date` instead of `release_date`, or `dateAdded`
/// instead of `added_at`. Unknown fields, including the retired `type`
/// discriminator, are ignored.
#[derive(Debug, Deserialize)]
struct StoredFavorite {
    id: u64,
    media_type: Option<MediaType>,
    title: Option<String>,
    name: Option<String>,
    poster_path: Option<String>,
    overview: Option<String>,
    vote_average: Option<f32>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    added_at: Option<String>,
    #[serde(rename = "dateAdded")]
    date_added: Option<String>,
}

impl From<StoredFavorite> for FavoriteEntry {
    fn from(raw: StoredFavorite) -> Self {
        let added_at = raw
            .added_at
            .or(raw.date_added)
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|d| d.with_timezone(&Utc));

        FavoriteEntry {
            id: raw.id,
            media_type: raw.media_type.unwrap_or_default(),
            title: filled(raw.title).or(filled(raw.name)).unwrap_or_default(),
            poster_path: raw.poster_path,
            overview: raw.overview,
            vote_average: raw.vote_average,
            release_date: filled(raw.release_date).or(filled(raw.first_air_date)),
            added_at,
        }
    }
}

/// Loosely-typed content offered to the favorites store.
///
/// Catalog types convert into a candidate with an explicit media type. The
/// title/name inference in [`Candidate::media_type`] only exists for untagged
/// input.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Candidate {
    pub id: u64,
    pub media_type: Option<MediaType>,
    pub title: Option<String>,
    pub name: Option<String>,
    pub poster_path: Option<String>,
    pub overview: Option<String>,
    pub vote_average: Option<f32>,
    pub release_date: Option<String>,
    pub first_air_date: Option<String>,
}

impl Candidate {
    /// Explicit tag if present, else movie when a non-empty movie-style title
    /// exists, else tv
    pub fn media_type(&self) -> MediaType {
        let has_title = self.title.as_deref().is_some_and(|t| !t.is_empty());
        match (self.media_type, has_title) {
            (Some(media_type), _) => media_type,
            (None, true) => MediaType::Movie,
            (None, false) => MediaType::Tv,
        }
    }

    /// Build the stored entry, stamped with `added_at`
    pub fn into_entry(self, added_at: DateTime<Utc>) -> FavoriteEntry {
        let media_type = self.media_type();
        FavoriteEntry {
            id: self.id,
            media_type,
            title: filled(self.title).or(filled(self.name)).unwrap_or_default(),
            poster_path: self.poster_path,
            overview: self.overview,
            vote_average: self.vote_average,
            release_date: filled(self.release_date).or(filled(self.first_air_date)),
            added_at: Some(added_at),
        }
    }
}

impl From<&SearchResult> for Candidate {
    fn from(r: &SearchResult) -> Self {
        let (title, name) = match r.media_type {
            MediaType::Movie => (Some(r.title.clone()), None),
            MediaType::Tv => (None, Some(r.title.clone())),
        };
        Candidate {
            id: r.id,
            media_type: Some(r.media_type),
            title,
            name,
            poster_path: r.poster_path.clone(),
            overview: non_empty(&r.overview),
            vote_average: r.vote_average,
            release_date: r.release_date.clone(),
            first_air_date: None,
        }
    }
}

impl From<&MovieSummary> for Candidate {
    fn from(m: &MovieSummary) -> Self {
        Candidate {
            id: m.id,
            media_type: Some(MediaType::Movie),
            title: Some(m.title.clone()),
            poster_path: m.poster_path.clone(),
            overview: non_empty(&m.overview),
            vote_average: m.vote_average,
            release_date: m.release_date.clone(),
            ..Candidate::default()
        }
    }
}

impl From<&TvSummary> for Candidate {
    fn from(t: &TvSummary) -> Self {
        Candidate {
            id: t.id,
            media_type: Some(MediaType::Tv),
            name: Some(t.name.clone()),
            poster_path: t.poster_path.clone(),
            overview: non_empty(&t.overview),
            vote_average: t.vote_average,
            first_air_date: t.first_air_date.clone(),
            ..Candidate::default()
        }
    }
}

impl From<&MovieDetail> for Candidate {
    fn from(m: &MovieDetail) -> Self {
        Candidate {
            id: m.id,
            media_type: Some(MediaType::Movie),
            title: Some(m.title.clone()),
            poster_path: m.poster_path.clone(),
            overview: non_empty(&m.overview),
            vote_average: m.vote_average,
            release_date: m.release_date.clone(),
            ..Candidate::default()
        }
    }
}

impl From<&TvDetail> for Candidate {
    fn from(t: &TvDetail) -> Self {
        Candidate {
            id: t.id,
            media_type: Some(MediaType::Tv),
            name: Some(t.name.clone()),
            poster_path: t.poster_path.clone(),
            overview: non_empty(&t.overview),
            vote_average: t.vote_average,
            first_air_date: t.first_air_date.clone(),
            ..Candidate::default()
        }
    }
}

/// Empty strings count as absent in loosely-typed input
fn filled(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.is_empty())
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Extract year from a date string like "2022-03-04"
pub fn extract_year(date: &str) -> Option<u16> {
    date.get(..4).and_then(|y| y.parse().ok())
}
