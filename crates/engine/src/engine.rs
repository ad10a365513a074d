use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::align::align_columns;
use crate::catalog::Catalog;
use crate::dates::{build_date_index, find_date_column};
use crate::error::QcError;
use crate::filter::filter_by_category;
use crate::matcher::validate_pair;
use crate::model::{
    ColumnMap, ComparisonOutcome, DatedTable, MismatchRecord, QcMeta, QcRun, Scalar, Table,
};

/// Default numeric discrepancy tolerance.
pub const DEFAULT_THRESHOLD: f64 = 0.01;

/// One comparison request: two named, already-loaded tables.
/// `source_a` is the UNIFY export, `source_b` the EXTRACT export.
#[derive(Debug)]
pub struct ComparisonRequest {
    pub file_a: String,
    pub file_b: String,
    pub table_a: Table,
    pub table_b: Table,
    pub threshold: f64,
}

impl ComparisonRequest {
    pub fn new(
        file_a: impl Into<String>,
        file_b: impl Into<String>,
        table_a: Table,
        table_b: Table,
    ) -> Self {
        Self {
            file_a: file_a.into(),
            file_b: file_b.into(),
            table_a,
            table_b,
            threshold: DEFAULT_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }
}

/// Run one full comparison: pattern validation, category filter, date
/// resolution, column alignment, cell reconciliation.
pub fn run(catalog: &Catalog, request: ComparisonRequest) -> Result<QcRun, QcError> {
    if request.table_a.columns.is_empty() {
        return Err(QcError::MalformedInput(format!(
            "'{}' has no columns",
            request.file_a
        )));
    }
    if request.table_b.columns.is_empty() {
        return Err(QcError::MalformedInput(format!(
            "'{}' has no columns",
            request.file_b
        )));
    }

    let entry = validate_pair(catalog, &request.file_a, &request.file_b)?;
    let mut warnings = Vec::new();

    // Only the EXTRACT side carries the category column.
    let (table_b, filter_warning) = filter_by_category(
        request.table_b,
        &catalog.filter_column,
        &entry.category_filter,
    );
    // The filter's empty-result signal is advisory; at this level it means
    // the pairing is wrong, so it hardens into a failure.
    if filter_warning.is_some() {
        return Err(QcError::EmptyAfterFilter {
            filter: entry.category_filter.clone(),
        });
    }

    let date_col_a = find_date_column(&request.table_a)
        .ok_or_else(|| QcError::DateColumnNotFound { source: request.file_a.clone() })?;
    let date_col_b = find_date_column(&table_b)
        .ok_or_else(|| QcError::DateColumnNotFound { source: request.file_b.clone() })?;

    let dated_a = build_date_index(request.table_a, date_col_a, &request.file_a)?;
    let dated_b = build_date_index(table_b, date_col_b, &request.file_b)?;

    let (map, align_warnings) =
        align_columns(entry, &dated_a.table.columns, &dated_b.table.columns);
    warnings.extend(align_warnings);
    if map.is_empty() {
        return Err(QcError::NoColumnsMatched);
    }

    let mut outcome = reconcile(&dated_a, &dated_b, &map, request.threshold)?;
    outcome.matched_pattern = entry.name.clone();
    outcome.category_filter = entry.category_filter.clone();

    Ok(QcRun {
        meta: QcMeta {
            file_a: request.file_a,
            file_b: request.file_b,
            threshold: request.threshold,
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        outcome,
        warnings,
    })
}

/// Cell-by-cell reconciliation over the date intersection.
///
/// Iteration is columns outer (correspondence order), dates inner
/// (ascending); this fixes the mismatch list's order, so re-running over
/// the same inputs reproduces it exactly.
pub fn reconcile(
    source_a: &DatedTable,
    source_b: &DatedTable,
    map: &ColumnMap,
    threshold: f64,
) -> Result<ComparisonOutcome, QcError> {
    let dates_a = source_a.dates();
    let dates_b = source_b.dates();

    let common_dates: BTreeSet<NaiveDate> = dates_a.intersection(&dates_b).copied().collect();
    let new_dates: BTreeSet<NaiveDate> = dates_b.difference(&dates_a).copied().collect();

    if common_dates.is_empty() {
        return Err(QcError::NoCommonDates);
    }

    let mut mismatches = Vec::new();
    let mut total_comparisons = 0usize;
    let mut significant_count = 0usize;

    for (col_a, col_b) in map {
        for &date in &common_dates {
            let value_a = source_a.value_at(date, col_a);
            let value_b = source_b.value_at(date, col_b);
            total_comparisons += 1;

            let (is_different, difference) = compare_values(value_a, value_b, threshold);

            if is_different && difference > threshold {
                significant_count += 1;
                mismatches.push(MismatchRecord {
                    date,
                    column_a: col_a.clone(),
                    value_a: value_a.clone(),
                    column_b: col_b.clone(),
                    value_b: value_b.clone(),
                    difference,
                    exceeds_threshold: true,
                });
            }
        }
    }

    Ok(ComparisonOutcome {
        mismatches,
        total_comparisons,
        significant_count,
        common_dates,
        new_dates,
        matched_pattern: String::new(),
        category_filter: String::new(),
    })
}

/// Compare one cell pair. Returns (is_different, magnitude).
///
/// - both missing: equal
/// - exactly one missing: different; magnitude is the present side coerced
///   to a number (or 0) — the zero stands in for the magnitude only, never
///   for the equality decision
/// - both numeric: different iff |a−b| strictly exceeds the threshold
/// - non-numeric: different iff raw values differ; magnitude 0
pub fn compare_values(a: &Scalar, b: &Scalar, threshold: f64) -> (bool, f64) {
    if a.is_missing() && b.is_missing() {
        return (false, 0.0);
    }
    if a.is_missing() || b.is_missing() {
        let present = if a.is_missing() { b } else { a };
        return (true, present.to_number().unwrap_or(0.0).abs());
    }

    match (a.to_number(), b.to_number()) {
        (Some(na), Some(nb)) => {
            let diff = (na - nb).abs();
            (diff > threshold, diff)
        }
        _ => (a != b, 0.0),
    }
}
