//! `sqc check` — compare a UNIFY/EXTRACT export pair.

use std::path::{Path, PathBuf};

use salesqc_engine::engine::ComparisonRequest;
use salesqc_engine::{assemble, Catalog, Report};

use crate::exit_codes::{exit_code_for, EXIT_QC_MISMATCH, EXIT_USAGE};
use crate::CliError;

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

pub fn load_catalog(path: Option<&Path>) -> Result<Catalog, CliError> {
    match path {
        None => Ok(Catalog::built_in()),
        Some(path) => {
            let toml = std::fs::read_to_string(path).map_err(|e| {
                CliError::usage(format!("cannot read {}: {e}", path.display()))
            })?;
            Catalog::from_toml(&toml)
                .map_err(|e| CliError { code: exit_code_for(&e), message: e.to_string(), hint: None })
        }
    }
}

pub fn cmd_check(
    unify: PathBuf,
    extract: PathBuf,
    threshold: f64,
    catalog_path: Option<PathBuf>,
    json_output: bool,
    output_file: Option<PathBuf>,
    mismatch_csv: Option<PathBuf>,
) -> Result<(), CliError> {
    let catalog = load_catalog(catalog_path.as_deref())?;

    let table_a = salesqc_io::load_unify(&unify)
        .map_err(|e| CliError::usage(format!("cannot load {}: {e}", unify.display())))?;
    let table_b = salesqc_io::load_extract(&extract)
        .map_err(|e| CliError::usage(format!("cannot load {}: {e}", extract.display())))?;

    let request = ComparisonRequest::new(file_name(&unify), file_name(&extract), table_a, table_b)
        .with_threshold(threshold);

    let result = salesqc_engine::run(&catalog, request).map_err(|e| CliError {
        code: exit_code_for(&e),
        message: e.to_string(),
        hint: None,
    })?;

    for warning in &result.warnings {
        eprintln!("warning: {warning}");
    }

    let report = assemble(&result);

    let json_str = serde_json::to_string_pretty(&report)
        .map_err(|e| CliError { code: EXIT_USAGE, message: format!("JSON serialization error: {e}"), hint: None })?;

    if let Some(ref path) = output_file {
        std::fs::write(path, &json_str)
            .map_err(|e| CliError::usage(format!("cannot write output: {e}")))?;
        eprintln!("wrote {}", path.display());
    }

    if let Some(ref path) = mismatch_csv {
        write_mismatch_csv(path, &report)?;
        eprintln!("wrote {}", path.display());
    }

    if json_output {
        println!("{json_str}");
    }

    // Human summary to stderr
    let s = &report.summary;
    eprintln!(
        "{}: {} comparisons over {}..{} — {} significant difference(s), {} new date(s), success rate {}%",
        s.matched_pattern,
        s.total_comparisons,
        s.first_date,
        s.last_date,
        s.significant_differences,
        s.new_dates_count,
        s.success_rate,
    );

    if s.significant_differences > 0 {
        return Err(CliError {
            code: EXIT_QC_MISMATCH,
            message: "significant differences found".into(),
            hint: None,
        });
    }

    Ok(())
}

fn write_mismatch_csv(path: &Path, report: &Report) -> Result<(), CliError> {
    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| CliError::usage(format!("cannot create {}: {e}", path.display())))?;

    writer
        .write_record([
            "Date",
            "Column File 1",
            "Value File 1",
            "Column File 2",
            "Value File 2",
            "Difference",
            "Above Threshold",
        ])
        .map_err(|e| CliError::usage(format!("write error: {e}")))?;

    for m in &report.mismatches {
        writer
            .write_record([
                m.date.format("%Y-%m-%d").to_string(),
                m.column_a.clone(),
                m.value_a.to_string(),
                m.column_b.clone(),
                m.value_b.to_string(),
                format!("{}", m.difference),
                m.exceeds_threshold.to_string(),
            ])
            .map_err(|e| CliError::usage(format!("write error: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| CliError::usage(format!("write error: {e}")))
}
