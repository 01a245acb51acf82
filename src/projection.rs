//! Sorted and filtered views over the favorites collection, plus the
//! display defaults used when a saved entry lacks a field.

use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::models::{FavoriteEntry, MediaType};

/// Year assumed for entries without a usable release date
const MISSING_YEAR: u16 = 1900;

/// Characters of overview shown on list cards
const OVERVIEW_EXCERPT_LEN: usize = 100;

// =============================================================================
// Filter
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Movie,
    Tv,
}

impl TypeFilter {
    pub fn matches(&self, entry: &FavoriteEntry) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Movie => entry.media_type == MediaType::Movie,
            TypeFilter::Tv => entry.media_type == MediaType::Tv,
        }
    }
}

impl From<MediaType> for TypeFilter {
    fn from(media_type: MediaType) -> Self {
        match media_type {
            MediaType::Movie => TypeFilter::Movie,
            MediaType::Tv => TypeFilter::Tv,
        }
    }
}

impl FromStr for TypeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(TypeFilter::All),
            "movie" | "movies" => Ok(TypeFilter::Movie),
            "tv" => Ok(TypeFilter::Tv),
            other => Err(format!("unknown filter: {}", other)),
        }
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeFilter::All => write!(f, "all"),
            TypeFilter::Movie => write!(f, "movie"),
            TypeFilter::Tv => write!(f, "tv"),
        }
    }
}

// =============================================================================
// Sort
// =============================================================================

/// Sort order for list screens. Every order is stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Most recently added first; entries without a timestamp last
    #[default]
    DateAdded,
    /// A to Z, ignoring case
    Title,
    /// Highest rated first; unrated counts as 0
    Rating,
    /// Newest release first; undated counts as 1900
    Year,
}

impl SortKey {
    pub fn compare(&self, a: &FavoriteEntry, b: &FavoriteEntry) -> Ordering {
        match self {
            SortKey::DateAdded => b.added_at.cmp(&a.added_at),
            SortKey::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            SortKey::Rating => rating_of(b).total_cmp(&rating_of(a)),
            SortKey::Year => year_of(b).cmp(&year_of(a)),
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dateAdded" | "date-added" => Ok(SortKey::DateAdded),
            "title" => Ok(SortKey::Title),
            "rating" => Ok(SortKey::Rating),
            "year" => Ok(SortKey::Year),
            other => Err(format!("unknown sort key: {}", other)),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortKey::DateAdded => write!(f, "dateAdded"),
            SortKey::Title => write!(f, "title"),
            SortKey::Rating => write!(f, "rating"),
            SortKey::Year => write!(f, "year"),
        }
    }
}

fn rating_of(entry: &FavoriteEntry) -> f32 {
    entry.vote_average.filter(|r| !r.is_nan()).unwrap_or(0.0)
}

fn year_of(entry: &FavoriteEntry) -> u16 {
    entry.year().unwrap_or(MISSING_YEAR)
}

/// Filter then sort, leaving `entries` untouched
pub fn project(entries: &[FavoriteEntry], filter: TypeFilter, sort: SortKey) -> Vec<&FavoriteEntry> {
    let mut view: Vec<&FavoriteEntry> = entries.iter().filter(|e| filter.matches(e)).collect();
    view.sort_by(|a, b| sort.compare(a, b));
    view
}

// =============================================================================
// Display Defaults
// =============================================================================

pub fn year_label(entry: &FavoriteEntry) -> String {
    entry
        .year()
        .map(|y| y.to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

pub fn rating_label(entry: &FavoriteEntry) -> String {
    entry
        .vote_average
        .map(|r| format!("{:.1}", r))
        .unwrap_or_else(|| "N/A".to_string())
}

/// First 100 characters of the overview, with "..." when cut
pub fn overview_excerpt(entry: &FavoriteEntry) -> Option<String> {
    let overview = entry.overview.as_deref().filter(|o| !o.is_empty())?;
    if overview.chars().count() > OVERVIEW_EXCERPT_LEN {
        let cut: String = overview.chars().take(OVERVIEW_EXCERPT_LEN).collect();
        Some(format!("{}...", cut))
    } else {
        Some(overview.to_string())
    }
}

/// Relative "added" phrase for list cards
pub fn added_label(added_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(added_at) = added_at else {
        return "Date not available".to_string();
    };

    // Whole days, rounded up, in either direction
    let secs = (now - added_at).num_seconds().unsigned_abs();
    let days = secs.div_ceil(86_400);

    match days {
        0 => "Added today".to_string(),
        1 => "Added yesterday".to_string(),
        2..=7 => format!("Added {} days ago", days),
        8..=30 => format!("Added {} weeks ago", days.div_ceil(7)),
        _ => format!("Added on {}", added_at.format("%Y-%m-%d")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn entry(id: u64, title: &str) -> FavoriteEntry {
        FavoriteEntry {
            id,
            media_type: MediaType::Movie,
            title: title.to_string(),
            poster_path: None,
            overview: None,
            vote_average: None,
            release_date: None,
            added_at: None,
        }
    }

    fn ids(view: &[&FavoriteEntry]) -> Vec<u64> {
        view.iter().map(|e| e.id).collect()
    }

    #[test]
    fn test_rating_sort_missing_last() {
        let mut entries = vec![entry(1, "a"), entry(2, "b"), entry(3, "c"), entry(4, "d")];
        entries[0].vote_average = Some(8.4);
        entries[1].vote_average = Some(9.2);
        entries[2].vote_average = None;
        entries[3].vote_average = Some(6.0);

        let view = project(&entries, TypeFilter::All, SortKey::Rating);
        assert_eq!(ids(&view), vec![2, 1, 4, 3]);
    }

    #[test]
    fn test_date_added_sort_is_stable() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let mut entries = vec![entry(1, "a"), entry(2, "b"), entry(3, "c"), entry(4, "d"), entry(5, "e")];
        entries[0].added_at = Some(t0);
        entries[1].added_at = None;
        entries[2].added_at = Some(t0 + Duration::days(1));
        entries[3].added_at = Some(t0);
        entries[4].added_at = None;

        let view = project(&entries, TypeFilter::All, SortKey::DateAdded);
        assert_eq!(ids(&view), vec![3, 1, 4, 2, 5]);
    }

    #[test]
    fn test_title_sort_ignores_case() {
        let entries = vec![entry(1, "zodiac"), entry(2, "Alien"), entry(3, "batman"), entry(4, "ALIEN")];
        let view = project(&entries, TypeFilter::All, SortKey::Title);
        assert_eq!(ids(&view), vec![2, 4, 3, 1]);
    }

    #[test]
    fn test_year_sort_missing_is_1900() {
        let mut entries = vec![entry(1, "a"), entry(2, "b"), entry(3, "c"), entry(4, "d")];
        entries[0].release_date = Some("1999-10-15".into());
        entries[1].release_date = None;
        entries[2].release_date = Some("2022-03-01".into());
        entries[3].release_date = Some("1895-12-28".into());

        let view = project(&entries, TypeFilter::All, SortKey::Year);
        assert_eq!(ids(&view), vec![3, 1, 2, 4]);
    }

    #[test]
    fn test_filter_keeps_order_and_source() {
        let mut entries = vec![entry(1, "a"), entry(2, "b"), entry(3, "c")];
        entries[1].media_type = MediaType::Tv;
        let before = entries.clone();

        let movies = project(&entries, TypeFilter::Movie, SortKey::Title);
        assert_eq!(ids(&movies), vec![1, 3]);
        let shows = project(&entries, TypeFilter::from(MediaType::Tv), SortKey::Title);
        assert_eq!(ids(&shows), vec![2]);
        assert_eq!(entries, before);
    }

    #[test]
    fn test_parse_keys() {
        assert_eq!("dateAdded".parse::<SortKey>(), Ok(SortKey::DateAdded));
        assert_eq!("rating".parse::<SortKey>(), Ok(SortKey::Rating));
        assert!("popularity".parse::<SortKey>().is_err());
        assert_eq!("all".parse::<TypeFilter>(), Ok(TypeFilter::All));
        assert_eq!("tv".parse::<TypeFilter>(), Ok(TypeFilter::Tv));
        assert!("person".parse::<TypeFilter>().is_err());
    }

    #[test]
    fn test_labels() {
        let mut e = entry(1, "a");
        assert_eq!(year_label(&e), "N/A");
        assert_eq!(rating_label(&e), "N/A");
        assert_eq!(overview_excerpt(&e), None);

        e.release_date = Some("2014-11-05".into());
        e.vote_average = Some(8.44);
        e.overview = Some("x".repeat(120));
        assert_eq!(year_label(&e), "2014");
        assert_eq!(rating_label(&e), "8.4");
        let excerpt = overview_excerpt(&e).unwrap();
        assert_eq!(excerpt.len(), 103);
        assert!(excerpt.ends_with("..."));
    }

    #[test]
    fn test_added_label() {
        let now = Utc.with_ymd_and_hms(2024, 6, 30, 12, 0, 0).unwrap();
        assert_eq!(added_label(None, now), "Date not available");
        assert_eq!(added_label(Some(now), now), "Added today");
        assert_eq!(added_label(Some(now - Duration::hours(20)), now), "Added yesterday");
        assert_eq!(added_label(Some(now - Duration::days(3)), now), "Added 3 days ago");
        assert_eq!(added_label(Some(now - Duration::days(10)), now), "Added 2 weeks ago");
        assert_eq!(
            added_label(Some(now - Duration::days(45)), now),
            "Added on 2024-05-16"
        );
    }
}
