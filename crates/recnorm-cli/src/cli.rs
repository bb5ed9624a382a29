//! CLI argument definitions for the record normalizer.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "normalize-records",
    version,
    about = "Apply functions to normalize records to the first normal form",
    long_about = "Merge duplicate, denormalized records into one record per primary key.\n\n\
                  Each output field is computed by a configured source, zero or more\n\
                  mappers, and a reducer."
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

    /// Allow record values to appear in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Normalize a JSON array of records.
    Normalize(NormalizeArgs),

    /// List the registered sources, mappers, and reducers.
    Functions,
}

#[derive(Parser)]
pub struct NormalizeArgs {
    /// The data to normalize, a JSON array of objects.
    #[arg(long = "input", value_name = "FILE")]
    pub input: PathBuf,

    /// The normalization configuration (JSON, or TOML with a .toml extension).
    #[arg(long = "config", value_name = "FILE")]
    pub config: PathBuf,

    /// File to write the normalized records to (default: standard output).
    #[arg(long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Pretty-print the JSON output.
    #[arg(long = "pretty")]
    pub pretty: bool,

    /// Print a summary table of record counts to standard error.
    #[arg(long = "summary")]
    pub summary: bool,
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
