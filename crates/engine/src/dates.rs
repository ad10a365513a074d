use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::error::QcError;
use crate::model::{DatedTable, Scalar, Table};

/// Date-bearing column candidates, probed in priority order.
pub const DATE_COLUMN_CANDIDATES: &[&str] =
    &["Time", "Date", "PER_DESCRIPTION", "Week ending", "Period"];

/// Text formats tried for generic date values, most common export first.
/// Month-first slash form before day-first, matching the upstream feeds.
const TEXT_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d-%m-%Y"];
const TEXT_DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// First candidate present as a column, or None.
pub fn find_date_column(table: &Table) -> Option<&'static str> {
    DATE_COLUMN_CANDIDATES
        .iter()
        .copied()
        .find(|c| table.has_column(c))
}

/// Build the date index for `table` over `column`.
///
/// Rows whose value cannot be parsed drop out of the index; only a fully
/// unparseable column is fatal. Duplicate dates keep the first parsed row.
/// The date column itself stays in the table.
pub fn build_date_index(table: Table, column: &str, source: &str) -> Result<DatedTable, QcError> {
    let col = table
        .column_index(column)
        .ok_or_else(|| QcError::DateColumnNotFound { source: source.into() })?;

    // DD-MM-YYYY embedded in "Week ending ..." labels.
    let week_ending = Regex::new(r"\d{2}-\d{2}-\d{4}")
        .map_err(|e| QcError::MalformedInput(e.to_string()))?;

    let mut index: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for row_idx in 0..table.rows.len() {
        if let Some(date) = parse_date_value(table.cell(row_idx, col), &week_ending) {
            index.entry(date).or_insert(row_idx);
        }
    }

    if index.is_empty() {
        return Err(QcError::ParseFailure {
            source: source.into(),
            column: column.into(),
        });
    }

    Ok(DatedTable { table, index })
}

fn parse_date_value(value: &Scalar, week_ending: &Regex) -> Option<NaiveDate> {
    match value {
        Scalar::Text(s) => {
            let s = s.trim();
            if s.contains("Week ending") {
                let m = week_ending.find(s)?;
                return NaiveDate::parse_from_str(m.as_str(), "%d-%m-%Y").ok();
            }
            for fmt in TEXT_FORMATS {
                if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
                    return Some(d);
                }
            }
            for fmt in TEXT_DATETIME_FORMATS {
                if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
                    return Some(dt.date());
                }
            }
            None
        }
        // Excel serial date, 1900 system (epoch 1899-12-30) — the encoding
        // calamine delivers for date-formatted cells.
        Scalar::Number(n) => {
            let days = n.floor();
            if !(1.0..=2_958_465.0).contains(&days) {
                return None;
            }
            NaiveDate::from_ymd_opt(1899, 12, 30)
                .map(|epoch| epoch + Duration::days(days as i64))
        }
        Scalar::Empty => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with(column: &str, values: Vec<Scalar>) -> Table {
        let mut t = Table::new(vec!["Product".into(), column.into()]);
        for v in values {
            t.push_row(vec![Scalar::Text("p".into()), v]);
        }
        t
    }

    #[test]
    fn candidate_priority_order() {
        let t = Table::new(vec!["Period".into(), "Date".into()]);
        // "Date" outranks "Period" in the candidate list.
        assert_eq!(find_date_column(&t), Some("Date"));

        let t = Table::new(vec!["Week ending".into(), "PER_DESCRIPTION".into()]);
        assert_eq!(find_date_column(&t), Some("PER_DESCRIPTION"));

        let t = Table::new(vec!["Geography".into(), "Value".into()]);
        assert_eq!(find_date_column(&t), None);
    }

    #[test]
    fn week_ending_values_parse_day_first() {
        let t = table_with(
            "Time",
            vec![
                Scalar::Text("Week ending 05-01-2024".into()),
                Scalar::Text("Week ending 12-01-2024".into()),
            ],
        );
        let dated = build_date_index(t, "Time", "unify").unwrap();
        let dates: Vec<NaiveDate> = dated.index.keys().copied().collect();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 12).unwrap(),
            ]
        );
    }

    #[test]
    fn iso_and_serial_values_parse() {
        let t = table_with(
            "Date",
            vec![
                Scalar::Text("2024-01-01".into()),
                // 2024-01-08 as an Excel serial.
                Scalar::Number(45299.0),
            ],
        );
        let dated = build_date_index(t, "Date", "extract").unwrap();
        assert!(dated
            .index
            .contains_key(&NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()));
        assert!(dated
            .index
            .contains_key(&NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()));
    }

    #[test]
    fn unparseable_rows_drop_out() {
        let t = table_with(
            "Date",
            vec![
                Scalar::Text("2024-01-01".into()),
                Scalar::Text("not a date".into()),
                Scalar::Empty,
            ],
        );
        let dated = build_date_index(t, "Date", "unify").unwrap();
        assert_eq!(dated.index.len(), 1);
        assert_eq!(dated.table.rows.len(), 3); // rows stay, the index shrinks
    }

    #[test]
    fn fully_unparseable_column_is_fatal() {
        let t = table_with("Date", vec![Scalar::Text("garbage".into()), Scalar::Empty]);
        let err = build_date_index(t, "Date", "unify").unwrap_err();
        assert!(matches!(err, QcError::ParseFailure { .. }));
    }

    #[test]
    fn duplicate_dates_keep_first_row() {
        let mut t = Table::new(vec!["Date".into(), "Value".into()]);
        t.push_row(vec![Scalar::Text("2024-01-01".into()), Scalar::Number(1.0)]);
        t.push_row(vec![Scalar::Text("2024-01-01".into()), Scalar::Number(2.0)]);
        let dated = build_date_index(t, "Date", "unify").unwrap();
        let row = dated.index[&NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()];
        assert_eq!(row, 0);
    }

    #[test]
    fn missing_column_is_not_found() {
        let t = Table::new(vec!["Geography".into()]);
        let err = build_date_index(t, "Date", "unify").unwrap_err();
        assert!(matches!(err, QcError::DateColumnNotFound { .. }));
    }
}
