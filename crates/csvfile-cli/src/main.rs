//! csvfile CLI - inspect and validate typed CSV files

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use csvfile::prelude::*;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "csvfile")]
#[command(author, version, about = "Typed CSV inspection and validation tool")]
struct Cli {
    /// Field delimiter (default: comma)
    #[arg(short, long, global = true, default_value = ",")]
    delimiter: char,

    /// Use the tab-separated dialect
    #[arg(long, global = true, conflicts_with = "delimiter")]
    tab: bool,

    /// Text encoding label, e.g. "windows-1252" (default: UTF-8)
    #[arg(short, long, global = true)]
    encoding: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the columns declared by the header
    Header {
        /// Input CSV file
        input: PathBuf,
    },

    /// Convert every row and report the ones that fail
    Check {
        /// Input CSV file
        input: PathBuf,
    },

    /// Print rows as JSON lines
    Show {
        /// Input CSV file
        input: PathBuf,

        /// Stop after this many rows
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let options = csv_options(cli.delimiter, cli.tab, cli.encoding.as_deref())?;

    match cli.command {
        Commands::Header { input } => show_header(&input, &options),
        Commands::Check { input } => check(&input, &options),
        Commands::Show { input, limit } => show_rows(&input, &options, limit),
    }
}

fn csv_options(delimiter: char, tab: bool, encoding: Option<&str>) -> Result<CsvOptions> {
    let options = if tab {
        CsvOptions::excel_tab()
    } else if delimiter.is_ascii() {
        CsvOptions::excel().with_delimiter(delimiter as u8)
    } else {
        bail!("Delimiter must be a single ASCII character, got '{delimiter}'");
    };
    match encoding {
        Some(label) => options
            .with_encoding_label(label)
            .with_context(|| format!("Can't read files as '{label}'")),
        None => Ok(options),
    }
}

fn open(input: &Path, options: &CsvOptions) -> Result<DictReader<std::fs::File>> {
    DictReader::from_path(input, options)
        .with_context(|| format!("Failed to open '{}'", input.display()))
}

fn show_header(input: &Path, options: &CsvOptions) -> Result<()> {
    let reader = open(input, options)?;

    for (i, cell) in reader.header().iter().enumerate() {
        println!("{}\t{}\t{}\t{:?}", i, cell.name, cell.cell_type, cell.raw);
    }

    Ok(())
}

fn check(input: &Path, options: &CsvOptions) -> Result<()> {
    let mut reader = open(input, options)?;
    let mut failures = 0usize;

    // keep going past bad rows so every failure is reported
    for result in reader.by_ref() {
        if let Err(e) = result {
            match e {
                CsvError::Io(_) | CsvError::Csv(_) => {
                    return Err(e).with_context(|| format!("Failed to read '{}'", input.display()))
                }
                e => {
                    failures += 1;
                    println!("{e}");
                }
            }
        }
    }

    let rows = reader.rows_read();
    tracing::debug!(rows, failures, "checked file");
    if failures > 0 {
        bail!("{failures} of {rows} rows failed in '{}'", input.display());
    }
    eprintln!("{} rows OK in '{}'", rows, input.display());
    Ok(())
}

fn show_rows(input: &Path, options: &CsvOptions, limit: Option<usize>) -> Result<()> {
    let reader = open(input, options)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for (i, record) in reader.take(limit.unwrap_or(usize::MAX)).enumerate() {
        let record = record.with_context(|| format!("Failed to read row {}", i))?;
        serde_json::to_writer(&mut out, &record).context("Failed to encode row")?;
        out.write_all(b"\n").context("Failed to write to stdout")?;
    }

    Ok(())
}
