//! ticdat CLI.

use std::io::{self, IsTerminal};

use clap::{ColorChoice, Parser};
use ticdat_cli::commands::{load_schema, run_convert, run_validate};
use ticdat_cli::logging::{LogConfig, LogFormat, init_logging};
use ticdat_cli::summary::{print_conversion, print_schema, print_validation};
use tracing::level_filters::LevelFilter;

mod cli;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg, ReportFormatArg};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(1);
    }
    let exit_code = match cli.command {
        Command::Schema(args) => match load_schema(&args.schema) {
            Ok(schema) => {
                print_schema(&schema);
                0
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
        Command::Validate(args) => match run_validate(&args.schema, &args.input) {
            Ok(run) => {
                match args.format {
                    ReportFormatArg::Text => print_validation(&run),
                    ReportFormatArg::Json => match serde_json::to_string_pretty(&run.report) {
                        Ok(json) => println!("{json}"),
                        Err(error) => eprintln!("error: {error}"),
                    },
                }
                i32::from(run.has_failures())
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
        Command::Convert(args) => {
            match run_convert(&args.schema, &args.input, &args.output, args.force) {
                Ok(run) => {
                    print_conversion(&run);
                    0
                }
                Err(error) => {
                    eprintln!("error: {error:#}");
                    1
                }
            }
        }
    };
    std::process::exit(exit_code);
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
