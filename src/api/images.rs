//! URL helpers for TMDB images and trailers

use crate::models::Video;

const IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";
const BACKDROP_BASE_URL: &str = "https://image.tmdb.org/t/p/w1280";
const YOUTUBE_WATCH_URL: &str = "https://www.youtube.com/watch?v=";

/// Absolute poster URL for a relative image path
pub fn image_url(path: Option<&str>) -> Option<String> {
    path.filter(|p| !p.is_empty())
        .map(|p| format!("{}{}", IMAGE_BASE_URL, p))
}

/// Absolute backdrop URL for a relative image path
pub fn backdrop_url(path: Option<&str>) -> Option<String> {
    path.filter(|p| !p.is_empty())
        .map(|p| format!("{}{}", BACKDROP_BASE_URL, p))
}

/// Key of the first YouTube trailer in a video list
pub fn trailer_key(videos: &[Video]) -> Option<&str> {
    videos
        .iter()
        .find(|v| v.kind == "Trailer" && v.site == "YouTube")
        .map(|v| v.key.as_str())
}

/// Watch URL for the first YouTube trailer
pub fn trailer_url(videos: &[Video]) -> Option<String> {
    trailer_key(videos).map(|key| format!("{}{}", YOUTUBE_WATCH_URL, key))
}
