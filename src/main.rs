//! DevFlix - browse movies and shows, keep a favorites list
//!
//! # Usage
//!
//! ```bash
//! devflix movies top-rated
//! devflix info 550 -t movie
//! devflix fav toggle 550 -t movie
//! devflix fav list --sort rating --json
//! ```
//!
//! Logging goes to stderr and is controlled with `RUST_LOG` (default `warn`).

use clap::Parser;

use devflix::cli::{Cli, Command};
use devflix::commands;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output = devflix::cli::Output::new(&cli);
    let config = cli.config.as_deref();

    let code = match cli.command {
        Command::Movies(cmd) => commands::movies_cmd(cmd, config, &output).await,
        Command::Tv(cmd) => commands::tv_cmd(cmd, config, &output).await,
        Command::Trending(cmd) => commands::trending_cmd(cmd, config, &output).await,
        Command::Search(cmd) => commands::search_cmd(cmd, config, &output).await,
        Command::Info(args) => commands::info_cmd(args, config, &output).await,
        Command::Trailer(args) => commands::trailer_cmd(args, config, &output).await,
        Command::Fav(cmd) => commands::fav_cmd(cmd.action, config, &output).await,
        Command::Config(cmd) => commands::config_cmd(cmd, config, &output),
    };

    code.into()
}
