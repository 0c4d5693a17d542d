//! CLI argument definitions for the ticdat driver.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "ticdat",
    version,
    about = "Validate and convert tabular data sets against a schema",
    long_about = "Validate and convert tabular data sets against a schema.\n\n\
                  Data sets are read from a .json file or a directory of CSV files.\n\
                  Schemas are JSON description files."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
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
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the tables and foreign keys of a schema.
    Schema(SchemaArgs),

    /// Check a data set for duplicates, foreign keys, data types and row predicates.
    Validate(ValidateArgs),

    /// Read a data set and write it in another format.
    Convert(ConvertArgs),
}

#[derive(Parser)]
pub struct SchemaArgs {
    /// Schema description file.
    #[arg(long = "schema", value_name = "FILE")]
    pub schema: PathBuf,
}

#[derive(Parser)]
pub struct ValidateArgs {
    /// Schema description file.
    #[arg(long = "schema", value_name = "FILE")]
    pub schema: PathBuf,

    /// Data set: a .json file or a directory of CSV files.
    #[arg(long = "input", value_name = "PATH")]
    pub input: PathBuf,

    /// Report format.
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: ReportFormatArg,
}

#[derive(Parser)]
pub struct ConvertArgs {
    /// Schema description file.
    #[arg(long = "schema", value_name = "FILE")]
    pub schema: PathBuf,

    /// Data set to read: a .json file or a directory of CSV files.
    #[arg(long = "input", value_name = "PATH")]
    pub input: PathBuf,

    /// Destination; a .json extension writes JSON, anything else a CSV directory.
    #[arg(long = "output", value_name = "PATH")]
    pub output: PathBuf,

    /// Replace existing output files.
    #[arg(long = "force")]
    pub force: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ReportFormatArg {
    Text,
    Json,
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
