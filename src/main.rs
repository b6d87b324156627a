//! COSMIC Inventory - snapshot standardizer CLI
//!
//! Reads the Inventory sheet of a technology inventory snapshot, standardizes
//! it and writes the cleaned rows as CSV, JSON or an xlsx workbook.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use cosmic_inventory::inventory::{load_inventory, write, LoadOptions, OutputFormat, DEFAULT_SHEET};
use cosmic_inventory::Standardizer;
use std::path::{Path, PathBuf};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "cosmic-inventory")]
#[command(version, about = "Standardize a COSMIC Technology Inventory snapshot", long_about = None)]
struct Cli {
    /// Snapshot file (.xlsx workbook or .csv export of the Inventory sheet)
    input: PathBuf,

    /// Output file (defaults to <input stem>_standardized.csv next to the input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Worksheet holding the inventory
    #[arg(long, default_value = DEFAULT_SHEET)]
    sheet: String,

    /// Output format (inferred from the output extension when omitted)
    #[arg(short, long, value_enum)]
    format: Option<Format>,

    /// Print the run report as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Json,
    Xlsx,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Csv => OutputFormat::Csv,
            Format::Json => OutputFormat::Json,
            Format::Xlsx => OutputFormat::Xlsx,
        }
    }
}

fn default_output(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "inventory".to_string());
    input.with_file_name(format!("{stem}_standardized.csv"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_ansi(!cli.json)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let options = LoadOptions { sheet: cli.sheet };
    let rows = load_inventory(&cli.input, &options)
        .with_context(|| format!("Failed to load inventory from {}", cli.input.display()))?;

    let (rows, report) = Standardizer::standardize(rows);

    let output = cli.output.unwrap_or_else(|| default_output(&cli.input));
    let format = match cli.format {
        Some(format) => format.into(),
        None => OutputFormat::from_path(&output)
            .with_context(|| format!("Cannot infer output format for {}", output.display()))?,
    };
    write(&rows, &output, format)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        info!(output = %output.display(), "Done");
    }

    Ok(())
}
