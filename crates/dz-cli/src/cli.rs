//! CLI argument definitions for DataZen.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use dz_cli::config::ImportOverrides;
use dz_transform::{Axis, JoinKind};

#[derive(Parser)]
#[command(
    name = "datazen",
    version,
    about = "DataZen - filter, sort, combine and summarize tabular data",
    long_about = "Load CSV or spreadsheet files, apply filter and sort pipelines,\n\
                  concatenate or merge datasets, and print summary statistics."
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

    /// Configuration file (default: the platform config directory).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Import a file and print its key, counts and a preview.
    Inspect(InspectArgs),

    /// Apply a filter/sort pipeline and print the resulting view.
    View(ViewArgs),

    /// Describe one column: statistics for numbers, frequencies otherwise.
    Describe(DescribeArgs),

    /// Print the correlation matrix of the numeric columns.
    Correlate(CorrelateArgs),

    /// Concatenate two files by rows or by columns.
    Concat(ConcatArgs),

    /// Join two files on key columns.
    Merge(MergeArgs),
}

/// Format parameters shared by every command that reads files.
#[derive(Args, Clone, Default)]
pub struct ImportArgs {
    /// Field separator for delimited text (e.g. ",", ";", "tab").
    #[arg(long = "sep", value_name = "CHAR")]
    pub separator: Option<String>,

    /// Decimal mark, "." or ",".
    #[arg(long = "decimal", value_name = "CHAR")]
    pub decimal: Option<String>,

    /// Zero-based header row.
    #[arg(long = "header", value_name = "ROW", conflicts_with = "no_header")]
    pub header: Option<usize>,

    /// The data has no header row.
    #[arg(long = "no-header")]
    pub no_header: bool,

    /// Worksheet name or zero-based index for spreadsheets.
    #[arg(long = "sheet", value_name = "SHEET")]
    pub sheet: Option<String>,
}

impl ImportArgs {
    pub fn overrides(&self) -> ImportOverrides {
        ImportOverrides {
            separator: self.separator.clone(),
            decimal: self.decimal.clone(),
            header: self.header,
            no_header: self.no_header,
            sheet: self.sheet.clone(),
        }
    }
}

#[derive(Args)]
pub struct InspectArgs {
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[command(flatten)]
    pub import: ImportArgs,

    /// Rows to preview (overrides the configured default).
    #[arg(long = "rows", value_name = "N")]
    pub rows: Option<usize>,
}

#[derive(Args)]
pub struct ViewArgs {
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Pipeline JSON `{"filters": {...}, "sort": [...]}`, inline or `@path`.
    #[arg(long = "pipeline", value_name = "JSON")]
    pub pipeline: Option<String>,

    /// Write the resulting view as CSV.
    #[arg(long = "output", value_name = "CSV")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub import: ImportArgs,

    /// Rows to preview (overrides the configured default).
    #[arg(long = "rows", value_name = "N")]
    pub rows: Option<usize>,
}

#[derive(Args)]
pub struct DescribeArgs {
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Column to describe.
    #[arg(long = "column", value_name = "NAME")]
    pub column: String,

    /// Pipeline JSON applied before describing, inline or `@path`.
    #[arg(long = "pipeline", value_name = "JSON")]
    pub pipeline: Option<String>,

    #[command(flatten)]
    pub import: ImportArgs,
}

#[derive(Args)]
pub struct CorrelateArgs {
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Pipeline JSON applied before correlating, inline or `@path`.
    #[arg(long = "pipeline", value_name = "JSON")]
    pub pipeline: Option<String>,

    #[command(flatten)]
    pub import: ImportArgs,
}

#[derive(Args)]
pub struct ConcatArgs {
    #[arg(value_name = "MAIN")]
    pub main: PathBuf,

    #[arg(value_name = "OTHER")]
    pub other: PathBuf,

    #[arg(long = "axis", value_enum, default_value = "rows")]
    pub axis: AxisArg,

    /// Write the combined table as CSV.
    #[arg(long = "output", value_name = "CSV")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub import: ImportArgs,
}

#[derive(Args)]
pub struct MergeArgs {
    #[arg(value_name = "MAIN")]
    pub main: PathBuf,

    #[arg(value_name = "OTHER")]
    pub other: PathBuf,

    /// Key column in MAIN.
    #[arg(long = "left-key", value_name = "COLUMN")]
    pub left_key: String,

    /// Key column in OTHER.
    #[arg(long = "right-key", value_name = "COLUMN")]
    pub right_key: String,

    #[arg(long = "how", value_enum, default_value = "inner")]
    pub how: JoinArg,

    /// Write the merged table as CSV.
    #[arg(long = "output", value_name = "CSV")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub import: ImportArgs,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum AxisArg {
    Rows,
    Columns,
}

impl From<AxisArg> for Axis {
    fn from(value: AxisArg) -> Self {
        match value {
            AxisArg::Rows => Axis::Rows,
            AxisArg::Columns => Axis::Columns,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum JoinArg {
    Inner,
    Left,
    Right,
    Outer,
}

impl From<JoinArg> for JoinKind {
    fn from(value: JoinArg) -> Self {
        match value {
            JoinArg::Inner => JoinKind::Inner,
            JoinArg::Left => JoinKind::Left,
            JoinArg::Right => JoinKind::Right,
            JoinArg::Outer => JoinKind::Outer,
        }
    }
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
