use crate::model::{QcWarning, Scalar, Table};

/// Restrict `table` to rows whose filter column equals `value` exactly
/// (case-sensitive). A table without the filter column passes through
/// unchanged. An empty result is advisory here; the engine escalates it.
pub fn filter_by_category(
    table: Table,
    filter_column: &str,
    value: &str,
) -> (Table, Option<QcWarning>) {
    let Some(col) = table.column_index(filter_column) else {
        return (table, None);
    };

    let mut filtered = Table::new(table.columns.clone());
    for row_idx in 0..table.rows.len() {
        let keeps = matches!(table.cell(row_idx, col), Scalar::Text(s) if s == value);
        if keeps {
            filtered.push_row(table.rows[row_idx].clone());
        }
    }

    let warning = filtered.is_empty().then_some(QcWarning::EmptyFilter);
    (filtered, warning)
}
