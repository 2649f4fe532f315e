//! Developer's Toolkit CLI.

use std::io::{self, IsTerminal};
use std::sync::Arc;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use dtk_cli::logging::{LogConfig, LogFormat, init_logging};
use dtk_cli::render::TerminalSink;
use dtk_cli::settings::Settings;
use dtk_core::{NotificationSink, TracingSink};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{run_config, run_lookup, run_meme, run_panels, run_search};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }

    let exit_code = match run(cli) {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: Cli) -> Result<i32> {
    let config_path = cli.config.clone().unwrap_or_else(Settings::config_path);
    let settings = match Settings::load_from(&config_path) {
        Ok(settings) => settings,
        Err(error) => {
            tracing::error!(%error, "failed to load settings");
            eprintln!("error: {}", error.user_message());
            return Ok(1);
        }
    };

    let sink: Arc<dyn NotificationSink> = match cli.log_format {
        LogFormatArg::Json => Arc::new(TracingSink),
        LogFormatArg::Pretty | LogFormatArg::Compact => Arc::new(TerminalSink),
    };

    match cli.command {
        Command::Panels => run_panels().map(|()| 0),
        Command::Config { action } => run_config(action, &config_path, &settings).map(|()| 0),
        Command::Meme(args) => run_meme(&args, &settings, sink.as_ref()),
        Command::Search(args) => {
            runtime()?.block_on(run_search(&args, &settings, sink))?;
            Ok(0)
        }
        Command::Lookup(args) => runtime()?.block_on(run_lookup(&args, &settings, sink)),
    }
}

/// Single-threaded runtime; every panel runs on one task.
fn runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
