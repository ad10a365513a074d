// salesqc CLI - headless UNIFY/EXTRACT reconciliation

mod check;
mod exit_codes;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use salesqc_engine::matcher::match_filename;
use salesqc_engine::DEFAULT_THRESHOLD;

use exit_codes::{EXIT_QC_UNMAPPED, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "sqc")]
#[command(about = "Reconcile UNIFY/EXTRACT retail sales exports")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare a UNIFY export against an EXTRACT export
    #[command(after_help = "\
Examples:
  sqc check IT_2393_APROTEICI_D156.xlsx '1. Check_Model_Custom_APROTEICI (33).xlsx'
  sqc check unify.xlsx extract.xlsx --json
  sqc check unify.xlsx extract.xlsx --output report.json --mismatch-csv diffs.csv
  sqc check unify.xlsx extract.xlsx --threshold 0.05 --catalog custom.toml")]
    Check {
        /// The UNIFY export (first sheet, 7-row preamble)
        unify: PathBuf,

        /// The EXTRACT export (second tab)
        extract: PathBuf,

        /// Numeric discrepancy tolerance (strict greater-than)
        #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
        threshold: f64,

        /// Catalog TOML (defaults to the built-in retail catalog)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Output the JSON report to stdout instead of just the summary
        #[arg(long)]
        json: bool,

        /// Write the JSON report to a file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Write the mismatch table as CSV
        #[arg(long)]
        mismatch_csv: Option<PathBuf>,
    },

    /// Show which catalog entry each filename resolves to
    #[command(after_help = "\
Examples:
  sqc match IT_2393_APROTEICI_D156.xlsx weekly_salse.csv")]
    Match {
        /// Filenames to resolve
        #[arg(required = true)]
        files: Vec<String>,

        /// Catalog TOML (defaults to the built-in retail catalog)
        #[arg(long)]
        catalog: Option<PathBuf>,
    },

    /// Validate a catalog TOML without running a comparison
    #[command(after_help = "\
Examples:
  sqc validate custom-catalog.toml")]
    Validate {
        /// Path to the catalog TOML
        catalog: PathBuf,
    },
}

pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }
}

fn cmd_match(files: Vec<String>, catalog_path: Option<PathBuf>) -> Result<(), CliError> {
    let catalog = check::load_catalog(catalog_path.as_deref())?;

    let mut unmapped = 0usize;
    for file in &files {
        match match_filename(&catalog, file) {
            Some(entry) => println!("{file} -> {}", entry.name),
            None => {
                println!("{file} -> (no match)");
                unmapped += 1;
            }
        }
    }

    if unmapped > 0 {
        return Err(CliError {
            code: EXIT_QC_UNMAPPED,
            message: format!("{unmapped} file(s) match no catalog entry"),
            hint: Some(format!("available patterns: {}", catalog.pattern_names().join(", "))),
        });
    }
    Ok(())
}

fn cmd_validate(catalog_path: PathBuf) -> Result<(), CliError> {
    let catalog = check::load_catalog(Some(&catalog_path))?;

    for warning in catalog.ambiguity_warnings() {
        eprintln!("warning: {warning}");
    }

    eprintln!(
        "{}: {} entries, filter column '{}'",
        catalog_path.display(),
        catalog.entries.len(),
        catalog.filter_column,
    );
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Check {
            unify,
            extract,
            threshold,
            catalog,
            json,
            output,
            mismatch_csv,
        } => check::cmd_check(unify, extract, threshold, catalog, json, output, mismatch_csv),
        Commands::Match { files, catalog } => cmd_match(files, catalog),
        Commands::Validate { catalog } => cmd_validate(catalog),
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
