//! CLI Command Handlers
//!
//! Implements all CLI commands by calling the TMDB client and the favorites
//! store. Each handler takes CLI args and Output, returns ExitCode.

use serde::Serialize;
use std::path::Path;

use crate::api::{trailer_key, trailer_url, TmdbClient, TmdbError};
use crate::cli::{
    ConfigCmd, ExitCode, FavAction, FavListCmd, FavoriteStatus, MovieList, MoviesCmd, Output,
    SearchCmd, TitleArgs, TrailerResponse, TrendingCmd, TvCmd, TvList,
};
use crate::config::Config;
use crate::favorites::FavoritesStore;
use crate::models::{Candidate, FavoriteEntry, MediaType, Video};
use crate::projection;
use crate::storage::FileStorage;

// =============================================================================
// Setup Helpers
// =============================================================================

fn load_config(config_path: Option<&Path>, output: &Output) -> Result<Config, ExitCode> {
    Config::load(config_path).map_err(|e| output.error(e.to_string(), ExitCode::InvalidArgs))
}

fn tmdb_client(config: &Config, output: &Output) -> Result<TmdbClient, ExitCode> {
    let api_key = config
        .tmdb_api_key()
        .map_err(|e| output.error(e.to_string(), ExitCode::InvalidArgs))?;
    Ok(TmdbClient::new(api_key).with_language(config.language()))
}

fn open_favorites(config: &Config, output: &Output) -> Result<FavoritesStore<FileStorage>, ExitCode> {
    let storage = config
        .storage()
        .map_err(|e| output.error(e.to_string(), ExitCode::Error))?;
    Ok(FavoritesStore::open(storage))
}

/// Map a client failure to an exit code, distinguishing unknown titles
fn fetch_error(output: &Output, what: &str, e: anyhow::Error) -> ExitCode {
    let code = match e.downcast_ref::<TmdbError>() {
        Some(TmdbError::NotFound) => ExitCode::NotFound,
        _ => ExitCode::NetworkError,
    };
    output.error(format!("{} failed: {}", what, e), code)
}

fn emit<T: Serialize>(output: &Output, data: T) -> ExitCode {
    match output.print(data) {
        Ok(()) => ExitCode::Success,
        Err(e) => output.error(format!("Failed to serialize: {}", e), ExitCode::Error),
    }
}

// =============================================================================
// Listing Commands
// =============================================================================

pub async fn movies_cmd(cmd: MoviesCmd, config_path: Option<&Path>, output: &Output) -> ExitCode {
    let config = match load_config(config_path, output) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let client = match tmdb_client(&config, output) {
        Ok(c) => c,
        Err(code) => return code,
    };

    output.info(format!("Fetching {:?} movies (page {})...", cmd.list, cmd.page));

    let result = match cmd.list {
        MovieList::Popular => client.popular_movies(cmd.page).await,
        MovieList::TopRated => client.top_rated_movies(cmd.page).await,
        MovieList::Upcoming => client.upcoming_movies(cmd.page).await,
    };

    match result {
        Ok(page) => emit(output, page),
        Err(e) => fetch_error(output, "Movie listing", e),
    }
}

pub async fn tv_cmd(cmd: TvCmd, config_path: Option<&Path>, output: &Output) -> ExitCode {
    let config = match load_config(config_path, output) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let client = match tmdb_client(&config, output) {
        Ok(c) => c,
        Err(code) => return code,
    };

    output.info(format!("Fetching {:?} shows (page {})...", cmd.list, cmd.page));

    let result = match cmd.list {
        TvList::Popular => client.popular_tv(cmd.page).await,
        TvList::TopRated => client.top_rated_tv(cmd.page).await,
        TvList::OnTheAir => client.on_the_air_tv(cmd.page).await,
    };

    match result {
        Ok(page) => emit(output, page),
        Err(e) => fetch_error(output, "TV listing", e),
    }
}

pub async fn trending_cmd(cmd: TrendingCmd, config_path: Option<&Path>, output: &Output) -> ExitCode {
    let config = match load_config(config_path, output) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let client = match tmdb_client(&config, output) {
        Ok(c) => c,
        Err(code) => return code,
    };

    match client.trending_all(cmd.page).await {
        Ok(page) => emit(output, page),
        Err(e) => fetch_error(output, "Trending listing", e),
    }
}

// =============================================================================
// Search Command
// =============================================================================

pub async fn search_cmd(cmd: SearchCmd, config_path: Option<&Path>, output: &Output) -> ExitCode {
    let query = cmd.query.trim();
    if query.is_empty() {
        return output.error("Search query is empty", ExitCode::InvalidArgs);
    }

    let config = match load_config(config_path, output) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let client = match tmdb_client(&config, output) {
        Ok(c) => c,
        Err(code) => return code,
    };

    output.info(format!("Searching for: {}", query));

    if cmd.movies_only {
        match client.search_movies(query, cmd.page).await {
            Ok(page) => emit(output, page),
            Err(e) => fetch_error(output, "Search", e),
        }
    } else {
        match client.search_multi(query, cmd.page).await {
            Ok(page) => emit(output, page),
            Err(e) => fetch_error(output, "Search", e),
        }
    }
}

// =============================================================================
// Info / Trailer Commands
// =============================================================================

pub async fn info_cmd(args: TitleArgs, config_path: Option<&Path>, output: &Output) -> ExitCode {
    let config = match load_config(config_path, output) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let client = match tmdb_client(&config, output) {
        Ok(c) => c,
        Err(code) => return code,
    };

    output.info(format!("Getting info for: {}", args.id));

    match MediaType::from(args.media_type) {
        MediaType::Movie => match client.movie_detail(args.id).await {
            Ok(detail) => emit(output, detail),
            Err(e) => fetch_error(output, "Movie info", e),
        },
        MediaType::Tv => match client.tv_detail(args.id).await {
            Ok(detail) => emit(output, detail),
            Err(e) => fetch_error(output, "TV info", e),
        },
    }
}

pub async fn trailer_cmd(args: TitleArgs, config_path: Option<&Path>, output: &Output) -> ExitCode {
    let config = match load_config(config_path, output) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let client = match tmdb_client(&config, output) {
        Ok(c) => c,
        Err(code) => return code,
    };

    let media_type = MediaType::from(args.media_type);
    let fetched: anyhow::Result<(String, Vec<Video>)> = match media_type {
        MediaType::Movie => client.movie_detail(args.id).await.map(|d| (d.title, d.videos)),
        MediaType::Tv => client.tv_detail(args.id).await.map(|d| (d.name, d.videos)),
    };

    let (title, videos) = match fetched {
        Ok(found) => found,
        Err(e) => return fetch_error(output, "Trailer lookup", e),
    };

    match (trailer_key(&videos), trailer_url(&videos)) {
        (Some(key), Some(url)) => {
            let response = TrailerResponse {
                id: args.id,
                media_type,
                title,
                key: key.to_string(),
                url: url.clone(),
            };
            match output.print_lines(&response, &[url]) {
                Ok(()) => ExitCode::Success,
                Err(e) => output.error(format!("Failed to serialize: {}", e), ExitCode::Error),
            }
        }
        _ => output.error(format!("No trailer available for {}", title), ExitCode::NotFound),
    }
}

// =============================================================================
// Favorites Commands
// =============================================================================

pub async fn fav_cmd(action: FavAction, config_path: Option<&Path>, output: &Output) -> ExitCode {
    let config = match load_config(config_path, output) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let mut store = match open_favorites(&config, output) {
        Ok(s) => s,
        Err(code) => return code,
    };

    match action {
        FavAction::Add(args) => {
            let media_type = MediaType::from(args.media_type);
            if store.is_favorite(args.id, media_type) {
                return emit(output, status(&store, args.id, media_type, false));
            }
            let candidate = match fetch_candidate(&config, &args, output).await {
                Ok(c) => c,
                Err(code) => return code,
            };
            let changed = store.add(candidate);
            emit(output, status(&store, args.id, media_type, changed))
        }
        FavAction::Remove(args) => {
            let media_type = MediaType::from(args.media_type);
            let changed = store.remove(args.id, media_type);
            emit(output, status(&store, args.id, media_type, changed))
        }
        FavAction::Toggle(args) => {
            let media_type = MediaType::from(args.media_type);
            // Removing needs no catalog lookup
            if store.is_favorite(args.id, media_type) {
                store.remove(args.id, media_type);
                return emit(output, status(&store, args.id, media_type, true));
            }
            let candidate = match fetch_candidate(&config, &args, output).await {
                Ok(c) => c,
                Err(code) => return code,
            };
            store.toggle(candidate);
            emit(output, status(&store, args.id, media_type, true))
        }
        FavAction::Has(args) => {
            let media_type = MediaType::from(args.media_type);
            emit(output, status(&store, args.id, media_type, false))
        }
        FavAction::List(cmd) => fav_list(&store, cmd, output),
        FavAction::Clear => {
            let removed = store.count();
            store.clear();
            output.info(format!("Removed {} favorites", removed));
            emit(output, store.count())
        }
        FavAction::Count => emit(output, store.count()),
    }
}

fn status(
    store: &FavoritesStore<FileStorage>,
    id: u64,
    media_type: MediaType,
    changed: bool,
) -> FavoriteStatus {
    FavoriteStatus {
        id,
        media_type,
        favorite: store.is_favorite(id, media_type),
        changed,
        count: store.count(),
    }
}

/// Fetch the title so the entry captures its display fields
async fn fetch_candidate(
    config: &Config,
    args: &TitleArgs,
    output: &Output,
) -> Result<Candidate, ExitCode> {
    let client = tmdb_client(config, output)?;
    match MediaType::from(args.media_type) {
        MediaType::Movie => client
            .movie_detail(args.id)
            .await
            .map(|d| Candidate::from(&d))
            .map_err(|e| fetch_error(output, "Movie lookup", e)),
        MediaType::Tv => client
            .tv_detail(args.id)
            .await
            .map(|d| Candidate::from(&d))
            .map_err(|e| fetch_error(output, "TV lookup", e)),
    }
}

fn fav_list(store: &FavoritesStore<FileStorage>, cmd: FavListCmd, output: &Output) -> ExitCode {
    let view: Vec<&FavoriteEntry> =
        projection::project(store.entries(), cmd.filter, cmd.sort);

    let lines: Vec<String> = view
        .iter()
        .map(|e| {
            format!(
                "{:>8}  {:<5}  ⭐ {:<4} {}",
                e.id,
                e.media_type.as_str(),
                projection::rating_label(e),
                e
            )
        })
        .collect();

    if view.is_empty() {
        output.info("No favorites yet");
    }

    match output.print_lines(&view, &lines) {
        Ok(()) => ExitCode::Success,
        Err(e) => output.error(format!("Failed to serialize: {}", e), ExitCode::Error),
    }
}

// =============================================================================
// Config Command
// =============================================================================

pub fn config_cmd(cmd: ConfigCmd, config_path: Option<&Path>, output: &Output) -> ExitCode {
    // An explicit path that does not exist yet is created on save
    let loaded = match config_path {
        Some(path) if !path.exists() => Ok(Config::default()),
        _ => Config::load(config_path),
    };
    let mut config = match loaded {
        Ok(c) => c,
        Err(e) => return output.error(e.to_string(), ExitCode::InvalidArgs),
    };

    if let Some(key) = cmd.api_key {
        config.tmdb_api_key = Some(key);
    }
    if let Some(language) = cmd.language {
        config.language = Some(language);
    }
    if let Some(dir) = cmd.data_dir {
        config.data_dir = Some(dir);
    }

    match config.save(config_path) {
        Ok(path) => output.info(format!("Saved {}", path.display())),
        Err(e) => return output.error(format!("Failed to save config: {}", e), ExitCode::Error),
    }

    // Never echo the key back
    let mut shown = config;
    shown.tmdb_api_key = shown.tmdb_api_key.map(|_| "********".to_string());
    emit(output, shown)
}
