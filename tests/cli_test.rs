//! CLI argument parsing tests

use clap::Parser;
use devflix::cli::*;
use devflix::models::MediaType;
use devflix::projection::{SortKey, TypeFilter};

fn fav_action(args: &[&str]) -> FavAction {
    let cli = Cli::try_parse_from(args).unwrap();
    match cli.command {
        Command::Fav(cmd) => cmd.action,
        other => panic!("Expected Fav command, got {:?}", other),
    }
}

#[test]
fn test_movies_defaults_to_popular() {
    let cli = Cli::try_parse_from(["devflix", "movies"]).unwrap();
    match cli.command {
        Command::Movies(cmd) => {
            assert_eq!(cmd.list, MovieList::Popular);
            assert_eq!(cmd.page, 1);
        }
        other => panic!("Expected Movies command, got {:?}", other),
    }
}

#[test]
fn test_tv_list_and_page() {
    let cli = Cli::try_parse_from(["devflix", "tv", "on-the-air", "-p", "3"]).unwrap();
    match cli.command {
        Command::Tv(cmd) => {
            assert_eq!(cmd.list, TvList::OnTheAir);
            assert_eq!(cmd.page, 3);
        }
        other => panic!("Expected Tv command, got {:?}", other),
    }
}

#[test]
fn test_trending_page() {
    let cli = Cli::try_parse_from(["devflix", "trending", "--page", "2"]).unwrap();
    assert!(matches!(cli.command, Command::Trending(TrendingCmd { page: 2 })));
}

#[test]
fn test_info_requires_media_type() {
    assert!(Cli::try_parse_from(["devflix", "info", "550"]).is_err());

    let cli = Cli::try_parse_from(["devflix", "info", "550", "-t", "movie"]).unwrap();
    match cli.command {
        Command::Info(args) => {
            assert_eq!(args.id, 550);
            assert_eq!(MediaType::from(args.media_type), MediaType::Movie);
        }
        other => panic!("Expected Info command, got {:?}", other),
    }
}

#[test]
fn test_trailer_alias() {
    let cli = Cli::try_parse_from(["devflix", "tr", "1396", "--media-type", "tv"]).unwrap();
    assert!(matches!(
        cli.command,
        Command::Trailer(TitleArgs {
            id: 1396,
            media_type: MediaTypeArg::Tv
        })
    ));
}

#[test]
fn test_rejects_non_numeric_id() {
    assert!(Cli::try_parse_from(["devflix", "fav", "add", "abc", "-t", "movie"]).is_err());
}

#[test]
fn test_fav_mutations() {
    assert!(matches!(
        fav_action(&["devflix", "fav", "add", "550", "-t", "movie"]),
        FavAction::Add(TitleArgs { id: 550, .. })
    ));
    assert!(matches!(
        fav_action(&["devflix", "fav", "rm", "550", "-t", "movie"]),
        FavAction::Remove(TitleArgs { id: 550, .. })
    ));
    assert!(matches!(
        fav_action(&["devflix", "f", "toggle", "1396", "-t", "tv"]),
        FavAction::Toggle(TitleArgs {
            media_type: MediaTypeArg::Tv,
            ..
        })
    ));
    assert!(matches!(
        fav_action(&["devflix", "fav", "clear"]),
        FavAction::Clear
    ));
    assert!(matches!(
        fav_action(&["devflix", "fav", "count"]),
        FavAction::Count
    ));
}

#[test]
fn test_fav_list_filter_and_sort() {
    match fav_action(&["devflix", "fav", "list", "-t", "tv", "--sort", "rating"]) {
        FavAction::List(cmd) => {
            assert_eq!(cmd.filter, TypeFilter::Tv);
            assert_eq!(cmd.sort, SortKey::Rating);
        }
        other => panic!("Expected List action, got {:?}", other),
    }
}

#[test]
fn test_fav_list_parses_through_projection_keys() {
    match fav_action(&["devflix", "fav", "ls", "-t", "movies", "-s", "dateAdded"]) {
        FavAction::List(cmd) => {
            assert_eq!(cmd.filter, TypeFilter::Movie);
            assert_eq!(cmd.sort, SortKey::DateAdded);
            assert_eq!(cmd.sort.to_string().parse::<SortKey>(), Ok(SortKey::DateAdded));
        }
        other => panic!("Expected List action, got {:?}", other),
    }
}

#[test]
fn test_fav_list_rejects_unknown_sort() {
    assert!(Cli::try_parse_from(["devflix", "fav", "list", "--sort", "popularity"]).is_err());
}

#[test]
fn test_global_flags_after_subcommand() {
    let cli = Cli::try_parse_from([
        "devflix",
        "search",
        "dark",
        "--json",
        "-c",
        "/tmp/devflix.toml",
    ])
    .unwrap();
    assert!(cli.json);
    assert!(cli.should_json());
    assert_eq!(
        cli.config.as_deref(),
        Some(std::path::Path::new("/tmp/devflix.toml"))
    );
}

#[test]
fn test_config_command() {
    let cli = Cli::try_parse_from(["devflix", "config", "--language", "en-US"]).unwrap();
    match cli.command {
        Command::Config(cmd) => {
            assert_eq!(cmd.language.as_deref(), Some("en-US"));
            assert!(cmd.api_key.is_none());
        }
        other => panic!("Expected Config command, got {:?}", other),
    }
}

#[test]
fn test_favorite_status_json_shape() {
    let status = FavoriteStatus {
        id: 550,
        media_type: MediaType::Movie,
        favorite: true,
        changed: true,
        count: 1,
    };
    let value = serde_json::to_value(JsonOutput::success(status)).unwrap();
    assert_eq!(value["data"]["media_type"], "movie");
    assert_eq!(value["data"]["favorite"], true);
    assert!(value.get("error").is_none());
}

#[test]
fn test_config_command_writes_explicit_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("devflix.toml");
    let output = Output {
        json: true,
        quiet: true,
    };

    let cmd = ConfigCmd {
        api_key: Some("abc123".into()),
        language: Some("en-US".into()),
        data_dir: None,
    };
    assert_eq!(
        devflix::commands::config_cmd(cmd, Some(&path), &output),
        ExitCode::Success
    );

    // A second run merges into the same file
    let cmd = ConfigCmd {
        api_key: None,
        language: None,
        data_dir: Some(dir.path().join("data")),
    };
    assert_eq!(
        devflix::commands::config_cmd(cmd, Some(&path), &output),
        ExitCode::Success
    );

    let saved = devflix::config::Config::load(Some(&path)).unwrap();
    assert_eq!(saved.tmdb_api_key.as_deref(), Some("abc123"));
    assert_eq!(saved.language(), "en-US");
    assert_eq!(saved.data_dir, Some(dir.path().join("data")));
}
