// Excel import (xlsx, xls, xlsb, ods) into the engine's Table shape.
// One-way conversion only; styling and formulas are not carried over.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};
use salesqc_engine::model::{Scalar, Table};

/// Which worksheet to read.
#[derive(Debug, Clone)]
pub enum SheetSelector {
    /// Zero-based position in workbook order.
    Index(usize),
    Name(String),
}

pub fn import(path: &Path, sheet: SheetSelector, skip_rows: usize) -> Result<Table, String> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| format!("cannot open {}: {e}", path.display()))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    if sheet_names.is_empty() {
        return Err("workbook has no sheets".into());
    }

    let sheet_name = match sheet {
        SheetSelector::Index(i) => sheet_names
            .get(i)
            .cloned()
            .ok_or_else(|| format!("workbook has {} sheet(s), wanted index {i}", sheet_names.len()))?,
        SheetSelector::Name(name) => {
            if !sheet_names.iter().any(|s| s == &name) {
                return Err(format!(
                    "no sheet named '{name}' (available: {})",
                    sheet_names.join(", ")
                ));
            }
            name
        }
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| format!("cannot read sheet '{sheet_name}': {e}"))?;

    table_from_range(&range, skip_rows)
}

fn table_from_range(range: &Range<Data>, skip_rows: usize) -> Result<Table, String> {
    let mut rows = range.rows().skip(skip_rows);

    let header = rows.next().ok_or("no header row after preamble")?;
    let columns: Vec<String> = header.iter().map(cell_text).collect();
    if columns.iter().all(|c| c.is_empty()) {
        return Err("header row is empty".into());
    }

    let mut table = Table::new(columns);
    for row in rows {
        table.push_row(row.iter().map(scalar_from_data).collect());
    }
    Ok(table)
}

fn cell_text(data: &Data) -> String {
    match data {
        Data::String(s) => s.trim().to_string(),
        other => other.to_string().trim().to_string(),
    }
}

/// calamine Data → Scalar. Date cells arrive as 1900-system serials and
/// stay numeric here; the engine's date resolver understands serials.
fn scalar_from_data(data: &Data) -> Scalar {
    match data {
        Data::Empty => Scalar::Empty,
        Data::Float(n) => Scalar::Number(*n),
        Data::Int(n) => Scalar::Number(*n as f64),
        Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Scalar::Empty
            } else {
                Scalar::Text(trimmed.to_string())
            }
        }
        Data::Bool(b) => Scalar::Text(if *b { "TRUE".into() } else { "FALSE".into() }),
        Data::Error(e) => Scalar::Text(format!("#{e:?}")),
        Data::DateTime(dt) => Scalar::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Scalar::Text(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range_of(rows: Vec<Vec<Data>>) -> Range<Data> {
        let height = rows.len() as u32;
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0) as u32;
        let mut range = Range::new((0, 0), (height - 1, width - 1));
        for (r, row) in rows.into_iter().enumerate() {
            for (c, cell) in row.into_iter().enumerate() {
                range.set_value((r as u32, c as u32), cell);
            }
        }
        range
    }

    #[test]
    fn range_converts_with_typing() {
        let range = range_of(vec![
            vec![Data::String("Date".into()), Data::String("V".into())],
            vec![Data::String("2024-01-01".into()), Data::Float(1.5)],
            vec![Data::String("2024-01-08".into()), Data::Empty],
        ]);
        let table = table_from_range(&range, 0).unwrap();
        assert_eq!(table.columns, vec!["Date", "V"]);
        assert_eq!(table.cell(0, 1), &Scalar::Number(1.5));
        assert_eq!(table.cell(1, 1), &Scalar::Empty);
    }

    #[test]
    fn preamble_skipped_before_header() {
        let range = range_of(vec![
            vec![Data::String("Report".into())],
            vec![Data::Empty],
            vec![Data::String("Date".into()), Data::String("V".into())],
            vec![Data::Float(45292.0), Data::Int(7)],
        ]);
        let table = table_from_range(&range, 2).unwrap();
        assert_eq!(table.columns[0], "Date");
        assert_eq!(table.cell(0, 0), &Scalar::Number(45292.0));
        assert_eq!(table.cell(0, 1), &Scalar::Number(7.0));
    }

    #[test]
    fn empty_header_is_an_error() {
        let range = range_of(vec![
            vec![Data::Empty, Data::Empty],
            vec![Data::Float(1.0), Data::Float(2.0)],
        ]);
        assert!(table_from_range(&range, 0).is_err());
    }
}
