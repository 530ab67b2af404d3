//! Long multiplication tutor CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use tracing::level_filters::LevelFilter;
use tutor_cli::config::TutorConfig;
use tutor_cli::logging::{LogConfig, init_logging};

mod cli;
mod commands;
mod summary;
mod types;

use crate::cli::{Cli, Command};
use crate::commands::{run_config, run_decompose, run_fetch, run_play};
use crate::summary::print_session_summary;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let config = TutorConfig::load(cli.config.as_deref());
    let result = match &cli.command {
        Command::Play(args) => {
            run_play(args, &config).map(|outcome| print_session_summary(&outcome))
        }
        Command::Decompose(args) => run_decompose(args),
        Command::Fetch(args) => run_fetch(args, &config),
        Command::Config { action } => run_config(action, cli.config.as_deref(), &config),
    };
    let exit_code = match result {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

/// Explicit level flags switch off `RUST_LOG`; `play` always logs to a file.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let log_file = match (&cli.log_file, &cli.command) {
        (Some(path), _) => Some(path.clone()),
        (None, Command::Play(_)) => Some(TutorConfig::default_log_path()),
        (None, _) => None,
    };
    let with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => log_file.is_none() && io::stderr().is_terminal(),
    };
    LogConfig {
        level_filter: cli
            .log_level
            .map_or_else(|| cli.verbosity.tracing_level_filter(), LevelFilter::from),
        use_env_filter: cli.log_level.is_none() && !cli.verbosity.is_present(),
        with_timestamps: log_file.is_some(),
        with_ansi,
        format: cli.log_format.into(),
        log_file,
        ..LogConfig::default()
    }
}
