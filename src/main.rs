//! kyccheck - Main CLI Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use kyccheck::{
    cli::{Args, Commands, ValidationArgs, Verbosity},
    config::Config,
    extraction::{collect_images, VisionModelClient},
    pipeline::{KycPipeline, ProcessingOutcome},
    telemetry::{TelemetryCollector, TelemetryDisplay},
    types::ExtractionResult,
    validation::{ValidationEngine, ValidationReport},
};
use std::io::Read;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Exit code when a document failed validation or processing
const EXIT_FAILED: i32 = 1;

/// Exit code when the run itself could not complete: bad flags, malformed
/// input, unreadable config or files
const EXIT_ERROR: i32 = 2;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(message) = args.validate() {
        eprintln!("{}: {}", "Error".red().bold(), message);
        std::process::exit(EXIT_ERROR);
    }

    init_logging(args.verbosity());

    let code = exit_code(&run(&args).await);
    if code != 0 {
        std::process::exit(code);
    }
}

async fn run(args: &Args) -> Result<bool> {
    let config = Config::load(args.config.as_deref()).context("Failed to load configuration")?;

    match &args.command {
        Commands::Validate {
            input,
            options,
            pretty,
        } => run_validate(args, &config, input, options, *pretty),
        Commands::Process {
            path,
            options,
            pretty,
        } => run_process(args, &config, path, options, *pretty).await,
        Commands::Config => {
            show_config(args, &config)?;
            Ok(true)
        }
    }
}

/// Map a run result to the process exit code, reporting any error on stderr
fn exit_code(result: &Result<bool>) -> i32 {
    match result {
        Ok(true) => 0,
        Ok(false) => EXIT_FAILED,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            EXIT_ERROR
        }
    }
}

/// Logs go to stderr; RUST_LOG overrides the verbosity flags
fn init_logging(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.log_filter()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn engine_for(config: &Config, options: &ValidationArgs) -> ValidationEngine {
    let mut validation = config.validation.clone();
    options.apply(&mut validation);
    ValidationEngine::with_config(validation)
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

fn run_validate(
    args: &Args,
    config: &Config,
    input: &str,
    options: &ValidationArgs,
    pretty: bool,
) -> Result<bool> {
    let raw = if input == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read stdin")?;
        buffer
    } else {
        std::fs::read_to_string(input).with_context(|| format!("Failed to read {}", input))?
    };

    let extraction = ExtractionResult::from_json_str(&raw)?;
    let report = engine_for(config, options).validate(&extraction, options.today());

    println!("{}", to_json(&report, pretty)?);

    let verbosity = args.verbosity();
    if verbosity.show_progress() {
        print_verdict(input, &report, verbosity.show_events());
    }

    Ok(report.is_passed())
}

async fn run_process(
    args: &Args,
    config: &Config,
    path: &Path,
    options: &ValidationArgs,
    pretty: bool,
) -> Result<bool> {
    let verbosity = args.verbosity();
    let client = VisionModelClient::from_config(&config.extraction)?;

    let images = if path.is_dir() {
        collect_images(path).with_context(|| format!("Failed to list {}", path.display()))?
    } else {
        vec![path.to_path_buf()]
    };

    if images.is_empty() {
        eprintln!("{}: no images found in {}", "Warning".yellow(), path.display());
        return Ok(true);
    }

    let telemetry = TelemetryCollector::new();
    let pipeline = KycPipeline::new(
        client,
        engine_for(config, options),
        config.extraction.max_image_bytes,
    )
    .with_telemetry(telemetry.clone());

    let pb = if verbosity.show_progress() && images.len() > 1 {
        let pb = ProgressBar::new(images.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} | {msg}")?
                .progress_chars("=>-"),
        );
        Some(pb)
    } else {
        None
    };

    let today = options.today();
    let mut all_passed = true;

    for image in &images {
        if let Some(pb) = &pb {
            pb.set_message(file_label(image));
        }

        let outcome = pipeline.process(image, today).await;
        all_passed &= outcome.is_passed();

        let json = to_json(&outcome, pretty)?;
        let show = || {
            println!("{}", json);
            if verbosity.show_events() {
                print_outcome(&outcome);
            }
        };
        match &pb {
            Some(pb) => {
                pb.suspend(show);
                pb.inc(1);
            }
            None => show(),
        }
    }

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    TelemetryDisplay::new(telemetry, verbosity).display_summary();

    Ok(all_passed)
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn print_verdict(source: &str, report: &ValidationReport, detailed: bool) {
    if report.is_passed() {
        eprintln!("{} {} ({})", "✓".green(), source, report.document_type());
    } else {
        eprintln!("{} {} ({})", "✗".red(), source, report.document_type());
        for failure in report.failures() {
            if detailed {
                eprintln!(
                    "    {} {}",
                    failure.to_string().red(),
                    format!("({})", failure.kind.description()).dimmed()
                );
            } else {
                eprintln!("    {}", failure.to_string().red());
            }
        }
    }
}

fn print_outcome(outcome: &ProcessingOutcome) {
    match outcome {
        ProcessingOutcome::Success { source, report, .. } => print_verdict(source, report, true),
        ProcessingOutcome::QualityRejected {
            source,
            quality_issues,
            ..
        } => {
            eprintln!(
                "{} {} image quality check failed: {}",
                "!".yellow(),
                source,
                quality_issues.join(", ")
            );
        }
        ProcessingOutcome::Error {
            source,
            error_message,
            ..
        } => {
            eprintln!("{} {} {}", "✗".red(), source, error_message.red());
        }
    }
    eprintln!(
        "    processed in {:.2}s",
        outcome.processing_time_seconds()
    );
}

fn show_config(args: &Args, config: &Config) -> Result<()> {
    if args.verbosity().show_progress() {
        let source = match &args.config {
            Some(path) => path.display().to_string(),
            None => Config::default_path()
                .filter(|p| p.exists())
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "built-in defaults".to_string()),
        };
        eprintln!("{} {}", "Configuration from".bold(), source);
    }

    print!("{}", config.to_toml()?);
    Ok(())
}
