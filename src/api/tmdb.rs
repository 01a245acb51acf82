//! TMDB (The Movie Database) API client
//!
//! Provides listings, details and search for movies and TV shows.
//! API docs: https://developer.themoviedb.org/docs

use anyhow::Result;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::models::{
    extract_year, CastMember, MediaType, MovieDetail, MovieSummary, Page, SearchResult,
    TvDetail, TvSummary, Video,
};

/// Default catalog language
pub const DEFAULT_LANGUAGE: &str = "pt-BR";

/// Keys at least this long are sent as bearer tokens
const BEARER_TOKEN_MIN_LEN: usize = 64;

/// Cast members kept on detail views
const CAST_LIMIT: usize = 10;

/// TMDB API error types
#[derive(Error, Debug)]
pub enum TmdbError {
    #[error("Resource not found (404)")]
    NotFound,

    #[error("Rate limited (429)")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
}

/// TMDB API client.
///
/// Failures are returned to the caller as-is; retrying is left to whoever
/// shows the error.
pub struct TmdbClient {
    api_key: String,
    base_url: String,
    language: String,
    client: reqwest::Client,
}

impl TmdbClient {
    /// Create a new TMDB client with the given API key
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, "https://api.themoviedb.org/3")
    }

    /// Create a client with a custom base URL (for testing)
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            language: DEFAULT_LANGUAGE.to_string(),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
        }
    }

    /// Use a different response language (e.g. "en-US")
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Make a GET request with credentials and language added to `params`
    async fn get<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, endpoint);
        tracing::debug!(endpoint, "TMDB request");

        let mut request = self
            .client
            .get(&url)
            .query(&[("language", self.language.as_str())])
            .query(params)
            .header("Accept", "application/json");

        // v4 read access tokens are long JWTs; v3 keys are 32 hex chars
        request = if self.api_key.len() >= BEARER_TOKEN_MIN_LEN {
            request.header("Authorization", format!("Bearer {}", self.api_key))
        } else {
            request.query(&[("api_key", self.api_key.as_str())])
        };

        let response = request.send().await.map_err(TmdbError::from)?;

        match response.status() {
            StatusCode::OK => {
                let body = response.text().await.map_err(TmdbError::from)?;
                let parsed: T = serde_json::from_str(&body).map_err(|e| {
                    TmdbError::InvalidResponse(format!("JSON parse error: {}", e))
                })?;
                Ok(parsed)
            }
            StatusCode::NOT_FOUND => Err(TmdbError::NotFound.into()),
            StatusCode::TOO_MANY_REQUESTS => Err(TmdbError::RateLimited.into()),
            status => {
                tracing::warn!(endpoint, status = status.as_u16(), "TMDB request failed");
                Err(TmdbError::ServerError(status.as_u16()).into())
            }
        }
    }

    async fn movie_list(&self, endpoint: &str, page: u32) -> Result<Page<MovieSummary>> {
        let response: PageRaw<MovieRaw> =
            self.get(endpoint, &[("page", page.to_string())]).await?;
        Ok(response.into_page().map(MovieRaw::into_summary))
    }

    async fn tv_list(&self, endpoint: &str, page: u32) -> Result<Page<TvSummary>> {
        let response: PageRaw<TvRaw> = self.get(endpoint, &[("page", page.to_string())]).await?;
        Ok(response.into_page().map(TvRaw::into_summary))
    }

    /// Listing that mixes movies, shows and people
    async fn mixed_list(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<Page<SearchResult>> {
        let response: PageRaw<SearchResultRaw> = self.get(endpoint, params).await?;
        let page = response.into_page();
        Ok(Page {
            page: page.page,
            results: page
                .results
                .into_iter()
                .filter_map(SearchResultRaw::into_search_result)
                .collect(),
            total_pages: page.total_pages,
            total_results: page.total_results,
        })
    }

    // -------------------------------------------------------------------------
    // Movies
    // -------------------------------------------------------------------------

    pub async fn popular_movies(&self, page: u32) -> Result<Page<MovieSummary>> {
        self.movie_list("/movie/popular", page).await
    }

    pub async fn top_rated_movies(&self, page: u32) -> Result<Page<MovieSummary>> {
        self.movie_list("/movie/top_rated", page).await
    }

    pub async fn upcoming_movies(&self, page: u32) -> Result<Page<MovieSummary>> {
        self.movie_list("/movie/upcoming", page).await
    }

    /// Get movie details by ID, including videos and credits
    pub async fn movie_detail(&self, id: u64) -> Result<MovieDetail> {
        let endpoint = format!("/movie/{}", id);
        let response: MovieDetailRaw = self
            .get(&endpoint, &[("append_to_response", "videos,credits".to_string())])
            .await?;
        Ok(response.into_detail())
    }

    // -------------------------------------------------------------------------
    // TV
    // -------------------------------------------------------------------------

    pub async fn popular_tv(&self, page: u32) -> Result<Page<TvSummary>> {
        self.tv_list("/tv/popular", page).await
    }

    pub async fn top_rated_tv(&self, page: u32) -> Result<Page<TvSummary>> {
        self.tv_list("/tv/top_rated", page).await
    }

    pub async fn on_the_air_tv(&self, page: u32) -> Result<Page<TvSummary>> {
        self.tv_list("/tv/on_the_air", page).await
    }

    /// Get TV show details by ID, including videos and credits
    pub async fn tv_detail(&self, id: u64) -> Result<TvDetail> {
        let endpoint = format!("/tv/{}", id);
        let response: TvDetailRaw = self
            .get(&endpoint, &[("append_to_response", "videos,credits".to_string())])
            .await?;
        Ok(response.into_detail())
    }

    // -------------------------------------------------------------------------
    // Trending
    // -------------------------------------------------------------------------

    /// Movies and shows trending this week (people are dropped)
    pub async fn trending_all(&self, page: u32) -> Result<Page<SearchResult>> {
        self.mixed_list("/trending/all/week", &[("page", page.to_string())])
            .await
    }

    // -------------------------------------------------------------------------
    // Search
    // -------------------------------------------------------------------------

    /// Search movies and TV shows together (people are dropped)
    pub async fn search_multi(&self, query: &str, page: u32) -> Result<Page<SearchResult>> {
        self.mixed_list(
            "/search/multi",
            &[("query", query.to_string()), ("page", page.to_string())],
        )
        .await
    }

    /// Search movies only
    pub async fn search_movies(&self, query: &str, page: u32) -> Result<Page<MovieSummary>> {
        let response: PageRaw<MovieRaw> = self
            .get(
                "/search/movie",
                &[("query", query.to_string()), ("page", page.to_string())],
            )
            .await?;
        Ok(response.into_page().map(MovieRaw::into_summary))
    }
}

// =============================================================================
// Response Structures (internal deserialization)
// =============================================================================

#[derive(Debug, Deserialize)]
struct PageRaw<T> {
    #[serde(default = "first_page")]
    page: u32,
    #[serde(default = "Vec::new")]
    results: Vec<T>,
    #[serde(default)]
    total_pages: u32,
    #[serde(default)]
    total_results: u32,
}

fn first_page() -> u32 {
    1
}

impl<T> PageRaw<T> {
    fn into_page(self) -> Page<T> {
        Page {
            page: self.page,
            results: self.results,
            total_pages: self.total_pages,
            total_results: self.total_results,
        }
    }
}

#[derive(Debug, Deserialize)]
struct MovieRaw {
    id: u64,
    title: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    vote_average: Option<f32>,
    release_date: Option<String>,
}

impl MovieRaw {
    fn into_summary(self) -> MovieSummary {
        MovieSummary {
            id: self.id,
            title: self.title.unwrap_or_default(),
            overview: self.overview.unwrap_or_default(),
            poster_path: self.poster_path,
            backdrop_path: self.backdrop_path,
            vote_average: self.vote_average,
            release_date: non_empty(self.release_date),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TvRaw {
    id: u64,
    name: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    vote_average: Option<f32>,
    first_air_date: Option<String>,
}

impl TvRaw {
    fn into_summary(self) -> TvSummary {
        TvSummary {
            id: self.id,
            name: self.name.unwrap_or_default(),
            overview: self.overview.unwrap_or_default(),
            poster_path: self.poster_path,
            backdrop_path: self.backdrop_path,
            vote_average: self.vote_average,
            first_air_date: non_empty(self.first_air_date),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResultRaw {
    id: u64,
    media_type: String,
    // Movies use "title", TV uses "name"
    title: Option<String>,
    name: Option<String>,
    // Movies use "release_date", TV uses "first_air_date"
    release_date: Option<String>,
    first_air_date: Option<String>,
    overview: Option<String>,
    poster_path: Option<String>,
    vote_average: Option<f32>,
}

impl SearchResultRaw {
    fn into_search_result(self) -> Option<SearchResult> {
        let media_type = match self.media_type.as_str() {
            "movie" => MediaType::Movie,
            "tv" => MediaType::Tv,
            _ => return None, // Filter out "person" and other types
        };

        let title = self.title.or(self.name).unwrap_or_default();
        let date = non_empty(self.release_date).or(non_empty(self.first_air_date));
        let year = date.as_deref().and_then(extract_year);

        Some(SearchResult {
            id: self.id,
            media_type,
            title,
            year,
            overview: self.overview.unwrap_or_default(),
            poster_path: self.poster_path,
            vote_average: self.vote_average,
            release_date: date,
        })
    }
}

#[derive(Debug, Deserialize)]
struct GenreRaw {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct VideosRaw {
    #[serde(default)]
    results: Vec<Video>,
}

#[derive(Debug, Default, Deserialize)]
struct CreditsRaw {
    #[serde(default)]
    cast: Vec<CastMember>,
}

impl CreditsRaw {
    fn top_billed(self) -> Vec<CastMember> {
        self.cast.into_iter().take(CAST_LIMIT).collect()
    }
}

#[derive(Debug, Deserialize)]
struct MovieDetailRaw {
    id: u64,
    title: String,
    tagline: Option<String>,
    release_date: Option<String>,
    runtime: Option<u32>,
    #[serde(default)]
    genres: Vec<GenreRaw>,
    overview: Option<String>,
    vote_average: Option<f32>,
    #[serde(default)]
    vote_count: u32,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    #[serde(default)]
    videos: VideosRaw,
    #[serde(default)]
    credits: CreditsRaw,
}

impl MovieDetailRaw {
    fn into_detail(self) -> MovieDetail {
        MovieDetail {
            id: self.id,
            title: self.title,
            tagline: non_empty(self.tagline),
            release_date: non_empty(self.release_date),
            runtime: self.runtime,
            genres: self.genres.into_iter().map(|g| g.name).collect(),
            overview: self.overview.unwrap_or_default(),
            vote_average: self.vote_average,
            vote_count: self.vote_count,
            poster_path: self.poster_path,
            backdrop_path: self.backdrop_path,
            videos: self.videos.results,
            cast: self.credits.top_billed(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TvDetailRaw {
    id: u64,
    name: String,
    tagline: Option<String>,
    first_air_date: Option<String>,
    last_air_date: Option<String>,
    #[serde(default)]
    number_of_seasons: u32,
    #[serde(default)]
    number_of_episodes: u32,
    status: Option<String>,
    #[serde(default)]
    genres: Vec<GenreRaw>,
    overview: Option<String>,
    vote_average: Option<f32>,
    #[serde(default)]
    vote_count: u32,
    poster_path: Option<String>,
    backdrop_path: Option<String>,
    #[serde(default)]
    videos: VideosRaw,
    #[serde(default)]
    credits: CreditsRaw,
}

impl TvDetailRaw {
    fn into_detail(self) -> TvDetail {
        TvDetail {
            id: self.id,
            name: self.name,
            tagline: non_empty(self.tagline),
            first_air_date: non_empty(self.first_air_date),
            last_air_date: non_empty(self.last_air_date),
            number_of_seasons: self.number_of_seasons,
            number_of_episodes: self.number_of_episodes,
            status: self.status,
            genres: self.genres.into_iter().map(|g| g.name).collect(),
            overview: self.overview.unwrap_or_default(),
            vote_average: self.vote_average,
            vote_count: self.vote_count,
            poster_path: self.poster_path,
            backdrop_path: self.backdrop_path,
            videos: self.videos.results,
            cast: self.credits.top_billed(),
        }
    }
}

/// TMDB sends "" for unknown dates and taglines
fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.is_empty())
}
