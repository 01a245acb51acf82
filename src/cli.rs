//! CLI - Command Line Interface for DevFlix
//!
//! Every screen of the app is scriptable. All output is JSON-parseable.
//!
//! # Examples
//!
//! ```bash
//! # Browse the catalog
//! devflix movies popular --page 2
//! devflix tv on-the-air
//! devflix trending
//! devflix search "clube da luta"
//!
//! # Details and trailers
//! devflix info 550 -t movie
//! devflix trailer 1396 -t tv
//!
//! # Favorites
//! devflix fav toggle 550 -t movie
//! devflix fav list --sort rating -t tv
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::PathBuf;

use crate::models::MediaType;
use crate::projection::{SortKey, TypeFilter};

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    Error = 1,
    /// Invalid arguments or configuration
    InvalidArgs = 2,
    /// Network error
    NetworkError = 3,
    /// Title not found in the catalog
    NotFound = 4,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// DevFlix - browse movies and shows, keep a favorites list
#[derive(Parser, Debug)]
#[command(
    name = "devflix",
    version,
    about = "Browse TMDB movies and shows, watch trailers, keep a favorites list",
    after_help = "EXAMPLES:\n\
                  devflix movies popular              Popular movies\n\
                  devflix search \"dark\"               Search movies and shows\n\
                  devflix fav toggle 550 -t movie     Add or remove a favorite\n\
                  devflix fav list --sort rating      Favorites, best rated first"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Movie listings
    #[command(visible_alias = "m")]
    Movies(MoviesCmd),

    /// TV show listings
    Tv(TvCmd),

    /// Movies and shows trending this week
    Trending(TrendingCmd),

    /// Search for movies and TV shows
    #[command(visible_alias = "s")]
    Search(SearchCmd),

    /// Get details for a movie or show
    #[command(visible_alias = "i")]
    Info(TitleArgs),

    /// Print the YouTube trailer URL for a movie or show
    #[command(visible_alias = "tr")]
    Trailer(TitleArgs),

    /// Manage favorites
    #[command(visible_alias = "f")]
    Fav(FavCmd),

    /// Save settings to the config file
    Config(ConfigCmd),
}

/// Which media type a TMDB id refers to
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaTypeArg {
    /// Movie
    Movie,
    /// TV show
    Tv,
}

impl From<MediaTypeArg> for MediaType {
    fn from(arg: MediaTypeArg) -> Self {
        match arg {
            MediaTypeArg::Movie => MediaType::Movie,
            MediaTypeArg::Tv => MediaType::Tv,
        }
    }
}

/// A TMDB id plus its media type
#[derive(Args, Debug, Clone)]
pub struct TitleArgs {
    /// TMDB ID
    #[arg(required = true)]
    pub id: u64,

    /// Media type of the ID
    #[arg(long, short = 't', value_enum)]
    pub media_type: MediaTypeArg,
}

// =============================================================================
// Listing Commands
// =============================================================================

#[derive(Args, Debug)]
pub struct MoviesCmd {
    /// Which list to fetch
    #[arg(value_enum, default_value = "popular")]
    pub list: MovieList,

    /// Page number
    #[arg(long, short = 'p', default_value = "1")]
    pub page: u32,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MovieList {
    #[default]
    Popular,
    TopRated,
    Upcoming,
}

#[derive(Args, Debug)]
pub struct TvCmd {
    /// Which list to fetch
    #[arg(value_enum, default_value = "popular")]
    pub list: TvList,

    /// Page number
    #[arg(long, short = 'p', default_value = "1")]
    pub page: u32,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TvList {
    #[default]
    Popular,
    TopRated,
    OnTheAir,
}

#[derive(Args, Debug)]
pub struct TrendingCmd {
    /// Page number
    #[arg(long, short = 'p', default_value = "1")]
    pub page: u32,
}

// =============================================================================
// Search Command
// =============================================================================

/// Search for movies and TV shows by query
#[derive(Args, Debug)]
pub struct SearchCmd {
    /// Search query (title, keywords)
    #[arg(required = true)]
    pub query: String,

    /// Page number
    #[arg(long, short = 'p', default_value = "1")]
    pub page: u32,

    /// Search movies only
    #[arg(long)]
    pub movies_only: bool,
}

// =============================================================================
// Favorites Commands
// =============================================================================

#[derive(Args, Debug)]
pub struct FavCmd {
    #[command(subcommand)]
    pub action: FavAction,
}

#[derive(Subcommand, Debug)]
pub enum FavAction {
    /// Add a title (details are fetched from TMDB)
    Add(TitleArgs),

    /// Remove a title
    #[command(visible_alias = "rm")]
    Remove(TitleArgs),

    /// Add the title if absent, remove it if present
    Toggle(TitleArgs),

    /// Check whether a title is a favorite
    Has(TitleArgs),

    /// List favorites
    #[command(visible_alias = "ls")]
    List(FavListCmd),

    /// Remove every favorite
    Clear,

    /// Number of favorites
    Count,
}

#[derive(Args, Debug)]
pub struct FavListCmd {
    /// Filter by media type: all, movie, tv
    #[arg(long, short = 't', default_value = "all")]
    pub filter: TypeFilter,

    /// Sort order: date-added, title, rating, year
    #[arg(long, short = 's', default_value = "date-added")]
    pub sort: SortKey,
}

// =============================================================================
// Config Command
// =============================================================================

#[derive(Args, Debug)]
pub struct ConfigCmd {
    /// TMDB v3 API key to store
    #[arg(long)]
    pub api_key: Option<String>,

    /// Catalog language (e.g. pt-BR, en-US)
    #[arg(long)]
    pub language: Option<String>,

    /// Directory for favorites
    #[arg(long)]
    pub data_dir: Option<PathBuf>,
}

// =============================================================================
// JSON Output Types
// =============================================================================

/// Generic JSON output wrapper with status
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    /// Create success output with data
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }

    /// Create error output (no data)
    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

/// Result of a favorites mutation or membership check
#[derive(Debug, Serialize, Deserialize)]
pub struct FavoriteStatus {
    pub id: u64,
    pub media_type: MediaType,
    pub favorite: bool,
    pub changed: bool,
    pub count: usize,
}

/// Trailer lookup response
#[derive(Debug, Serialize, Deserialize)]
pub struct TrailerResponse {
    pub id: u64,
    pub media_type: MediaType,
    pub title: String,
    pub key: String,
    pub url: String,
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Output handler for consistent formatting
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print success data
    pub fn print<T: Serialize>(&self, data: T) -> anyhow::Result<()> {
        if self.json {
            let output = JsonOutput::success(data);
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            // For non-JSON, caller should handle formatting
            println!("{}", serde_json::to_string_pretty(&data)?);
        }
        Ok(())
    }

    /// Print human-readable lines, or `data` as JSON in JSON mode
    pub fn print_lines<T: Serialize>(&self, data: T, lines: &[String]) -> anyhow::Result<()> {
        if self.json {
            return self.print(data);
        }
        for line in lines {
            println!("{}", line);
        }
        Ok(())
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet mode)
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        // Verify CLI structure is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn test_search_command() {
        let cli = Cli::parse_from(["devflix", "search", "batman"]);
        if let Command::Search(cmd) = cli.command {
            assert_eq!(cmd.query, "batman");
            assert_eq!(cmd.page, 1);
            assert!(!cmd.movies_only);
        } else {
            panic!("Expected Search command");
        }
    }

    #[test]
    fn test_fav_list_defaults() {
        let cli = Cli::parse_from(["devflix", "fav", "list"]);
        if let Command::Fav(FavCmd {
            action: FavAction::List(cmd),
        }) = cli.command
        {
            assert_eq!(cmd.filter, TypeFilter::All);
            assert_eq!(cmd.sort, SortKey::DateAdded);
        } else {
            panic!("Expected Fav List command");
        }
    }

    #[test]
    fn test_sort_accepts_camel_case_alias() {
        let cli = Cli::parse_from(["devflix", "fav", "ls", "--sort", "dateAdded"]);
        if let Command::Fav(FavCmd {
            action: FavAction::List(cmd),
        }) = cli.command
        {
            assert_eq!(cmd.sort, SortKey::DateAdded);
        } else {
            panic!("Expected Fav List command");
        }
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(i32::from(ExitCode::Success), 0);
        assert_eq!(i32::from(ExitCode::Error), 1);
        assert_eq!(i32::from(ExitCode::InvalidArgs), 2);
        assert_eq!(i32::from(ExitCode::NetworkError), 3);
        assert_eq!(i32::from(ExitCode::NotFound), 4);
    }

    #[test]
    fn test_json_output_skips_empty_fields() {
        let json = serde_json::to_string(&JsonOutput::success(3)).unwrap();
        assert_eq!(json, r#"{"data":3}"#);

        let json = serde_json::to_string(&JsonOutput::<()>::error_msg("nope", ExitCode::NotFound))
            .unwrap();
        assert_eq!(json, r#"{"error":"nope","exit_code":4}"#);
    }
}
