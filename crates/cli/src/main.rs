// shelfcheck CLI - duplicate detection before catalog import

mod exit_codes;
mod recon;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use shelfcheck_recon::{InputFormat, ReconError};

use exit_codes::{recon_exit_code, EXIT_IO, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "shelfcheck")]
#[command(about = "Find duplicate products before importing a scraped catalog")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare an import file against existing products
    #[command(after_help = "\
Examples:
  shelfcheck run engwe_products.json store_export.csv
  shelfcheck run scrape.json existing.json --threshold 0.9
  shelfcheck run import.csv existing.csv --output-filtered clean.csv
  shelfcheck run import.json existing.csv --config engwe.toml --json")]
    Run {
        /// Products to import (JSON or CSV)
        import: PathBuf,

        /// Products already in the store (JSON or CSV)
        existing: PathBuf,

        /// Import file format (default: from file extension)
        #[arg(long, short = 'f')]
        format: Option<Format>,

        /// Existing-products file format (default: from file extension)
        #[arg(long)]
        existing_format: Option<Format>,

        /// TOML config with threshold, normalization words and model patterns
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Name similarity threshold in [0, 1] (overrides config)
        #[arg(long)]
        threshold: Option<f64>,

        /// Report path (default: duplicate_detection_report.txt next to the import file)
        #[arg(long)]
        output_report: Option<PathBuf>,

        /// Filtered import path (default: <import>_filtered.<ext>)
        #[arg(long)]
        output_filtered: Option<PathBuf>,

        /// Print the full outcome as JSON to stdout
        #[arg(long)]
        json: bool,

        /// Exit with code 6 when any duplicate is found
        #[arg(long)]
        fail_on_duplicates: bool,
    },

    /// Validate a config file without running
    #[command(after_help = "\
Examples:
  shelfcheck validate engwe.toml")]
    Validate {
        /// Path to the TOML config file
        config: PathBuf,
    },

    /// Print the effective configuration as TOML
    #[command(after_help = "\
Examples:
  shelfcheck config > shelfcheck.toml
  shelfcheck config --config engwe.toml")]
    Config {
        /// Config file to merge over the defaults
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Json,
    Csv,
}

impl From<Format> for InputFormat {
    fn from(f: Format) -> Self {
        match f {
            Format::Json => InputFormat::Json,
            Format::Csv => InputFormat::Csv,
        }
    }
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        "\nengine:  shelfcheck-recon ",
        env!("CARGO_PKG_VERSION"),
    )
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run {
            import,
            existing,
            format,
            existing_format,
            config,
            threshold,
            output_report,
            output_filtered,
            json,
            fail_on_duplicates,
        } => recon::cmd_run(recon::RunArgs {
            import,
            existing,
            format: format.map(Into::into),
            existing_format: existing_format.map(Into::into),
            config,
            threshold,
            output_report,
            output_filtered,
            json,
            fail_on_duplicates,
        }),
        Commands::Validate { config } => recon::cmd_validate(config),
        Commands::Config { config } => recon::cmd_config(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn args(msg: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, msg)
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self::new(EXIT_IO, msg)
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<ReconError> for CliError {
    fn from(err: ReconError) -> Self {
        let code = recon_exit_code(&err);
        let hint = match &err {
            ReconError::DataFormat { .. } => {
                Some("pass --format/--existing-format if the extension is misleading".to_string())
            }
            ReconError::InvalidPattern { .. } => {
                Some("model patterns need a capture group, e.g. '\\b(M[0-9]+)\\b'".to_string())
            }
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }
}
