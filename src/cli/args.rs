//! Command-line argument parsing for kyccheck
//!
//! Provides clap-based CLI with subcommands and verbosity control.

use crate::validation::ValidationConfig;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// kyccheck - Validate identity documents read by a vision model
#[derive(Parser, Debug)]
#[command(name = "kyccheck")]
#[command(version)]
#[command(about = "Validate identity documents read by a hosted vision-language model", long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level: -q (quiet), default (normal), -v (verbose), -vv (very verbose)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress everything except the JSON output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate an extraction result JSON file ("-" reads stdin)
    Validate {
        /// Extraction result file
        #[arg(value_name = "FILE")]
        input: String,

        #[command(flatten)]
        options: ValidationArgs,

        /// Pretty-print the report
        #[arg(long)]
        pretty: bool,
    },

    /// Read a document image, or every image in a folder, through the vision model
    Process {
        /// Image file or folder of images
        #[arg(value_name = "PATH")]
        path: PathBuf,

        #[command(flatten)]
        options: ValidationArgs,

        /// Pretty-print each outcome
        #[arg(long)]
        pretty: bool,
    },

    /// Display current configuration
    Config,
}

/// Flags that override validation settings for one run
#[derive(clap::Args, Debug, Clone, Default, PartialEq)]
pub struct ValidationArgs {
    /// Date to validate against, YYYY-MM-DD (defaults to the local date)
    #[arg(long, value_name = "DATE", value_parser = parse_today)]
    pub today: Option<NaiveDate>,

    /// Minimum confidence for every extracted field
    #[arg(long, value_name = "SCORE")]
    pub min_confidence: Option<f64>,
}

impl ValidationArgs {
    /// Apply overrides on top of the loaded configuration
    pub fn apply(&self, config: &mut ValidationConfig) {
        if let Some(min_confidence) = self.min_confidence {
            config.min_confidence = min_confidence;
        }
    }

    /// Date used for expiry and age checks
    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }
}

fn parse_today(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD, got '{}': {}", raw, e))
}

/// Verbosity level enum
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    Quiet,
    Normal,
    Verbose,
    VeryVerbose,
}

impl Args {
    /// Get verbosity level based on flags
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::VeryVerbose,
            }
        }
    }

    /// Check flag values clap cannot check on its own
    pub fn validate(&self) -> Result<(), String> {
        let options = match &self.command {
            Commands::Validate { options, .. } | Commands::Process { options, .. } => options,
            Commands::Config => return Ok(()),
        };

        if let Some(score) = options.min_confidence {
            if !(0.0..=1.0).contains(&score) {
                return Err(format!("--min-confidence must be between 0.0 and 1.0, got {}", score));
            }
        }

        Ok(())
    }
}

impl Verbosity {
    /// Default log filter for this verbosity
    pub fn log_filter(&self) -> &'static str {
        match self {
            Verbosity::Quiet => "error",
            Verbosity::Normal => "warn",
            Verbosity::Verbose => "info",
            Verbosity::VeryVerbose => "debug",
        }
    }

    /// Check if should show progress bars and summaries
    pub fn show_progress(&self) -> bool {
        !matches!(self, Verbosity::Quiet)
    }

    /// Check if should show detailed events
    pub fn show_events(&self) -> bool {
        matches!(self, Verbosity::Verbose | Verbosity::VeryVerbose)
    }
}
