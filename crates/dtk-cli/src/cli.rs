//! CLI argument definitions for the dev toolkit.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use dtk_panels::PanelKind;

#[derive(Parser)]
#[command(
    name = "dev-toolkit",
    version,
    about = "Developer's Toolkit - search books, movies, music, coding problems and memes",
    long_about = "Search panels for books, movies, music, coding problems and meme templates.\n\n\
                  Every line typed into `search` is the full content of the search box;\n\
                  requests are debounced and superseded answers are discarded."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Settings file (default: the platform config directory).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the available panels.
    Panels,

    /// Interactive search: each stdin line replaces the search box content.
    ///
    /// Lines `:refresh`, `:clear` and `:quit` are commands. End of input waits
    /// for outstanding searches before exiting.
    Search(SearchArgs),

    /// Search once and print the results.
    Lookup(LookupArgs),

    /// Compose a meme from the simulated template catalog.
    Meme(MemeArgs),

    /// Inspect the settings file.
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Settings overrides shared by the searching commands.
#[derive(Args, Clone, Default)]
pub struct SearchOverrides {
    /// Quiet period before a typed query is sent, in milliseconds.
    #[arg(long = "debounce-ms", value_name = "MS")]
    pub debounce_ms: Option<u64>,

    /// Per-request timeout in milliseconds (0 disables it).
    #[arg(long = "timeout-ms", value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Abort superseded requests instead of letting them finish.
    #[arg(long = "cancel-in-flight")]
    pub cancel_in_flight: bool,

    /// Seed for the simulated catalogs.
    #[arg(long = "seed", value_name = "N")]
    pub seed: Option<u64>,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Panel to search.
    #[arg(value_name = "PANEL")]
    pub panel: PanelKind,

    #[command(flatten)]
    pub overrides: SearchOverrides,
}

#[derive(Args)]
pub struct LookupArgs {
    /// Panel to search.
    #[arg(value_name = "PANEL")]
    pub panel: PanelKind,

    /// Search text.
    #[arg(value_name = "QUERY", required = true, num_args = 1..)]
    pub query: Vec<String>,

    #[command(flatten)]
    pub overrides: SearchOverrides,
}

#[derive(Args)]
pub struct MemeArgs {
    /// Template number, as listed by `lookup memes meme`.
    #[arg(long = "template", value_name = "N")]
    pub template: usize,

    /// Caption text, once per caption box.
    #[arg(long = "caption", value_name = "TEXT")]
    pub captions: Vec<String>,

    /// Seed for the simulated catalog.
    #[arg(long = "seed", value_name = "N")]
    pub seed: Option<u64>,
}

#[derive(Subcommand, Clone, Copy)]
pub enum ConfigAction {
    /// Print the settings file path.
    Path,
    /// Print the effective settings as TOML.
    Show,
    /// Write the effective settings to the settings file.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
