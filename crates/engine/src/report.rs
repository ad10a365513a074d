use serde::Serialize;

use crate::model::{MismatchRecord, QcRun};

/// Summary metrics of one comparison run, in presentation-ready form.
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub first_date: String,
    pub last_date: String,
    pub matched_pattern: String,
    pub category_filter: String,
    pub file_a: String,
    pub file_b: String,
    pub total_comparisons: usize,
    pub significant_differences: usize,
    pub new_dates_count: usize,
    pub threshold: f64,
    pub success_rate: f64,
}

/// The full report artifact: summary + mismatch table + new-date list.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub summary: ReportSummary,
    pub mismatches: Vec<MismatchRecord>,
    pub new_dates: Vec<String>,
    pub warnings: Vec<String>,
}

/// `(total − significant) / total × 100`, rounded to 2 decimals.
/// An empty comparison counts as fully successful.
pub fn success_rate(total: usize, significant: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    let rate = (total - significant) as f64 / total as f64 * 100.0;
    (rate * 100.0).round() / 100.0
}

/// Assemble the report from a finished run. The engine guarantees a
/// non-empty date intersection, so first/last dates always exist.
pub fn assemble(run: &QcRun) -> Report {
    let outcome = &run.outcome;
    let first_date = outcome
        .common_dates
        .iter()
        .next()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default();
    let last_date = outcome
        .common_dates
        .iter()
        .next_back()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default();

    Report {
        summary: ReportSummary {
            first_date,
            last_date,
            matched_pattern: outcome.matched_pattern.clone(),
            category_filter: outcome.category_filter.clone(),
            file_a: run.meta.file_a.clone(),
            file_b: run.meta.file_b.clone(),
            total_comparisons: outcome.total_comparisons,
            significant_differences: outcome.significant_count,
            new_dates_count: outcome.new_dates.len(),
            threshold: run.meta.threshold,
            success_rate: success_rate(outcome.total_comparisons, outcome.significant_count),
        },
        mismatches: outcome.mismatches.clone(),
        new_dates: outcome
            .new_dates
            .iter()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .collect(),
        warnings: run.warnings.iter().map(|w| w.to_string()).collect(),
    }
}
