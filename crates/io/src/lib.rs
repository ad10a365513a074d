//! `salesqc-io` — loads raw CSV/Excel exports into the engine's `Table`
//! shape. The engine itself never touches file bytes.

pub mod csv;
pub mod xlsx;

use std::path::Path;

use salesqc_engine::model::Table;
use xlsx::SheetSelector;

/// Rows of report preamble above the UNIFY export's header.
pub const UNIFY_PREAMBLE_ROWS: usize = 7;

fn is_spreadsheet(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase()).as_deref(),
        Some("xlsx" | "xls" | "xlsb" | "ods")
    )
}

/// Load a UNIFY export: first sheet, fixed 7-row preamble above the header.
/// CSV exports of the same report carry the same preamble.
pub fn load_unify(path: &Path) -> Result<Table, String> {
    if is_spreadsheet(path) {
        xlsx::import(path, SheetSelector::Index(0), UNIFY_PREAMBLE_ROWS)
    } else {
        csv::import(path, UNIFY_PREAMBLE_ROWS)
    }
}

/// Load an EXTRACT export: the workbook's second tab (the data tab;
/// the first holds lookups). CSV fallback reads the file as-is.
pub fn load_extract(path: &Path) -> Result<Table, String> {
    if is_spreadsheet(path) {
        xlsx::import(path, SheetSelector::Index(1), 0)
    } else {
        csv::import(path, 0)
    }
}
