//! DataZen CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use dz_cli::config::{load_config, resolve_import_options};
use dz_cli::logging::{LogConfig, LogFormat, init_logging};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{
    Session, run_concat, run_correlate, run_describe, run_inspect, run_merge, run_view,
};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match run(&cli) {
        Ok(()) => 0,
        Err(error) => {
            eprintln!("error: {error:#}");
            1
        }
    };
    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let session = Session::new(config.display.clone());
    let options = |overrides: &crate::cli::ImportArgs| {
        resolve_import_options(&overrides.overrides(), &config.import)
    };
    match &cli.command {
        Command::Inspect(args) => run_inspect(&session, args, &options(&args.import)?),
        Command::View(args) => run_view(&session, args, &options(&args.import)?),
        Command::Describe(args) => run_describe(&session, args, &options(&args.import)?),
        Command::Correlate(args) => run_correlate(&session, args, &options(&args.import)?),
        Command::Concat(args) => run_concat(&session, args, &options(&args.import)?),
        Command::Merge(args) => run_merge(&session, args, &options(&args.import)?),
    }
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
