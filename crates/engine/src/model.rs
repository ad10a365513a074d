use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Scalars
// ---------------------------------------------------------------------------

/// The cell primitive for all tabular input. `Empty` is the missing value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Empty,
    Number(f64),
    Text(String),
}

impl Default for Scalar {
    fn default() -> Self {
        Scalar::Empty
    }
}

impl Scalar {
    /// Numeric coercion: numbers pass through, text is parsed, empty has
    /// no numeric value.
    pub fn to_number(&self) -> Option<f64> {
        match self {
            Scalar::Number(n) => Some(*n),
            Scalar::Text(s) => s.trim().parse::<f64>().ok(),
            Scalar::Empty => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Scalar::Empty)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Scalar::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Empty => Ok(()),
            Scalar::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{n}")
                }
            }
            Scalar::Text(s) => write!(f, "{s}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// An ordered-column table. Rows are row-major; a row shorter than the
/// header reads as `Empty` past its end.
#[derive(Debug, Clone)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Scalar>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self { columns, rows: Vec::new() }
    }

    pub fn push_row(&mut self, row: Vec<Scalar>) {
        self.rows.push(row);
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cell lookup by row index + column index. Out-of-range reads are
    /// `Empty`, matching how ragged exports behave.
    pub fn cell(&self, row: usize, col: usize) -> &Scalar {
        static EMPTY: Scalar = Scalar::Empty;
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A table plus its resolved date index (date → row). Built once by the
/// date resolver; all set operations afterwards run on the index.
#[derive(Debug, Clone)]
pub struct DatedTable {
    pub table: Table,
    pub index: BTreeMap<NaiveDate, usize>,
}

impl DatedTable {
    pub fn dates(&self) -> BTreeSet<NaiveDate> {
        self.index.keys().copied().collect()
    }

    /// Value at (date, column name). `Empty` when the column is absent.
    pub fn value_at(&self, date: NaiveDate, column: &str) -> &Scalar {
        static EMPTY: Scalar = Scalar::Empty;
        match (self.index.get(&date), self.table.column_index(column)) {
            (Some(&row), Some(col)) => self.table.cell(row, col),
            _ => &EMPTY,
        }
    }
}

// ---------------------------------------------------------------------------
// Column correspondence
// ---------------------------------------------------------------------------

/// Source-A column → source-B column, one pair per matched geography,
/// ordered by the catalog's geography declaration order.
pub type ColumnMap = Vec<(String, String)>;

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct MismatchRecord {
    pub date: NaiveDate,
    pub column_a: String,
    pub value_a: Scalar,
    pub column_b: String,
    pub value_b: Scalar,
    pub difference: f64,
    pub exceeds_threshold: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonOutcome {
    pub mismatches: Vec<MismatchRecord>,
    pub total_comparisons: usize,
    pub significant_count: usize,
    pub common_dates: BTreeSet<NaiveDate>,
    pub new_dates: BTreeSet<NaiveDate>,
    pub matched_pattern: String,
    pub category_filter: String,
}

// ---------------------------------------------------------------------------
// Warnings
// ---------------------------------------------------------------------------

/// Advisory signals that ride alongside a still-successful result. They
/// become fatal only when they leave no usable data, and that escalation
/// happens in the engine, not here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "detail")]
pub enum QcWarning {
    /// A catalog geography matched no column on one or both sides.
    ColumnUnmatched(String),
    /// The category filter removed every row.
    EmptyFilter,
    /// Two catalog entry names overlap; first-match-wins applies.
    AmbiguousCatalogNames(String),
}

impl std::fmt::Display for QcWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ColumnUnmatched(name) => {
                write!(f, "no match found for geography column '{name}'")
            }
            Self::EmptyFilter => {
                write!(f, "category filter left no rows; check the UNIFY/EXTRACT pairing")
            }
            Self::AmbiguousCatalogNames(detail) => {
                write!(f, "ambiguous catalog names: {detail}")
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Run envelope
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct QcMeta {
    pub file_a: String,
    pub file_b: String,
    pub threshold: f64,
    pub engine_version: String,
    pub run_at: String,
}

/// Everything one comparison run produces.
#[derive(Debug, Clone, Serialize)]
pub struct QcRun {
    pub meta: QcMeta,
    pub outcome: ComparisonOutcome,
    pub warnings: Vec<QcWarning>,
}
