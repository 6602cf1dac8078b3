mod ingest;
mod render;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ledgercheck_core::{Config, RawRow};
use ledgercheck_engine::{infer, BatchProcessor};

use crate::ingest::{delimiter_for, CsvLoader};
use crate::render::{generate_markdown_report, print_report_summary, print_schema};

/// LedgerCheck - data quality checks for audit ledgers
#[derive(Parser)]
#[command(name = "ledgercheck")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: ledgercheck.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a batch and write a processing report
    Check {
        /// CSV (or .tsv) file to check
        input: PathBuf,

        /// Output file for report.json
        #[arg(short, long, default_value = "report.json")]
        output: PathBuf,

        /// Also output markdown report
        #[arg(short, long)]
        markdown: Option<PathBuf>,

        /// Fields deciding row equivalence (overrides the config)
        #[arg(short, long, value_delimiter = ',')]
        key_fields: Vec<String>,
    },

    /// Show the inferred column types of a batch
    Infer {
        /// CSV (or .tsv) file to inspect
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    let config = load_config(cli.config.as_deref(), cli.verbose)?;

    match cli.command {
        Commands::Check { input, output, markdown, key_fields } => {
            check_command(config, &input, &output, markdown.as_deref(), key_fields, cli.verbose)
        }
        Commands::Infer { input } => infer_command(&config, &input),
    }
}

/// Load config from an explicit path, ./ledgercheck.toml, or defaults
fn load_config(path: Option<&Path>, verbose: bool) -> Result<Config> {
    if let Some(path) = path {
        return Config::from_file(path).with_context(|| format!("loading config {}", path.display()));
    }

    let default_path = Path::new("ledgercheck.toml");
    if default_path.exists() {
        return Config::from_file(default_path).context("loading ledgercheck.toml");
    }

    if verbose {
        eprintln!("{}", "No config file found, using defaults".yellow());
    }
    Ok(Config::default())
}

fn load_rows(input: &Path, verbose: bool) -> Result<Vec<RawRow>> {
    if verbose {
        eprintln!("{} {}", "Loading batch from:".cyan(), input.display());
    }

    let rows = CsvLoader::new()
        .with_delimiter(delimiter_for(input))
        .load_file(input)?;

    tracing::info!(rows = rows.len(), input = %input.display(), "batch loaded");
    Ok(rows)
}

/// Check command - run the full processing pass
fn check_command(
    mut config: Config,
    input: &Path,
    output: &Path,
    markdown: Option<&Path>,
    key_fields: Vec<String>,
    verbose: bool,
) -> Result<()> {
    if !key_fields.is_empty() {
        config.duplicates.key_fields = key_fields;
    }

    let rows = load_rows(input, verbose)?;

    if verbose {
        eprintln!("{}", "Processing batch...".cyan());
    }

    let outcome = BatchProcessor::new(config).process(&rows);
    let report = outcome.into_report(input.display().to_string(), &rows);

    report
        .save_to_file(output)
        .with_context(|| format!("writing {}", output.display()))?;

    if verbose {
        eprintln!("{} {}", "Report saved to:".green(), output.display());
    }

    if let Some(md_path) = markdown {
        std::fs::write(md_path, generate_markdown_report(&report))
            .with_context(|| format!("writing {}", md_path.display()))?;
        if verbose {
            eprintln!("{} {}", "Markdown report saved to:".green(), md_path.display());
        }
    }

    print_report_summary(&report);

    // Exit with error code if any record is invalid
    if report.has_invalid_records() {
        std::process::exit(1);
    }

    Ok(())
}

/// Infer command - print the column detection table
fn infer_command(config: &Config, input: &Path) -> Result<()> {
    let rows = load_rows(input, false)?;
    let schema = infer(&rows, config);
    print_schema(&schema);
    Ok(())
}
