//! CLI argument definitions for the long multiplication tutor.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use tracing::level_filters::LevelFilter;
use tutor_cli::logging::LogFormat;

#[derive(Parser)]
#[command(
    name = "long-multiplication",
    version,
    about = "Practice long multiplication one digit at a time",
    long_about = "Practice long multiplication one digit at a time.\n\n\
                  Fill in carries, partial products and the product, then submit.\n\
                  Sets of ten questions move you up or down a difficulty level."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// -v shows info, -vv debug; -q keeps only errors.
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// When to color terminal output.
    #[command(flatten)]
    pub color: Color,

    /// Log level for tutor crates; wins over -v/-q and RUST_LOG.
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Shape of each log record.
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Append logs here instead of stderr (`play` defaults to the data directory).
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Configuration file (default: the platform config directory).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start an interactive practice session.
    Play(PlayArgs),

    /// Show how a multiplication breaks down into rows.
    Decompose(DecomposeArgs),

    /// Download the question bank once and summarize it.
    Fetch(FetchArgs),

    /// Inspect or create the configuration file.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Parser)]
pub struct PlayArgs {
    /// Question bank JSON to use instead of the question server.
    #[arg(long = "questions", value_name = "FILE")]
    pub questions: Option<PathBuf>,

    /// Never contact the question server.
    #[arg(long = "offline")]
    pub offline: bool,

    /// Level to start at (default from config).
    #[arg(long = "start-level", value_name = "N")]
    pub start_level: Option<u32>,

    /// Highest level to reach (default from config or the question source).
    #[arg(long = "max-level", value_name = "N")]
    pub max_level: Option<u32>,

    /// Seed for generated questions, for reproducible sessions.
    #[arg(long = "seed", value_name = "N")]
    pub seed: Option<u64>,
}

#[derive(Parser)]
pub struct DecomposeArgs {
    #[arg(value_name = "MULTIPLICAND")]
    pub multiplicand: u64,

    #[arg(value_name = "MULTIPLIER")]
    pub multiplier: u64,
}

#[derive(Parser)]
pub struct FetchArgs {
    /// Save the downloaded bank for later `play --questions`.
    #[arg(long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the configuration file location.
    Path,

    /// Print the effective configuration.
    Show,

    /// Write the default configuration file.
    Init {
        /// Overwrite an existing file.
        #[arg(long = "force")]
        force: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => Self::ERROR,
            LogLevelArg::Warn => Self::WARN,
            LogLevelArg::Info => Self::INFO,
            LogLevelArg::Debug => Self::DEBUG,
            LogLevelArg::Trace => Self::TRACE,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Compact => Self::Compact,
            LogFormatArg::Json => Self::Json,
        }
    }
}
