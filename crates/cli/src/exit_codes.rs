//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Code | Description                                         |
//! |------|-----------------------------------------------------|
//! | 0    | Success, no significant differences                 |
//! | 1    | General error (unspecified)                         |
//! | 2    | CLI usage error (bad args, unreadable file)         |
//! | 3    | Significant differences found                       |
//! | 4    | Input mapping failure (unmapped file, pattern pair) |
//! | 5    | Data failure (dates, columns, category filter)      |
//! | 6    | Invalid catalog                                     |

use salesqc_engine::QcError;

/// Success - command completed, sources reconcile within threshold.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing or unreadable input file.
pub const EXIT_USAGE: u8 = 2;

/// The comparison ran but found significant differences.
pub const EXIT_QC_MISMATCH: u8 = 3;

/// Filenames could not be mapped to a single catalog entry.
pub const EXIT_QC_UNMAPPED: u8 = 4;

/// The data itself was unusable: no date column, unparseable dates,
/// empty category filter result, no column correspondence, no common dates.
pub const EXIT_QC_DATA: u8 = 5;

/// Catalog file failed to parse or validate.
pub const EXIT_QC_INVALID_CATALOG: u8 = 6;

/// Map an engine error onto its registry code.
pub fn exit_code_for(err: &QcError) -> u8 {
    match err {
        QcError::CatalogParse(_) | QcError::CatalogValidation(_) => EXIT_QC_INVALID_CATALOG,
        QcError::UnmappedFile { .. } | QcError::PatternMismatch { .. } => EXIT_QC_UNMAPPED,
        QcError::EmptyAfterFilter { .. }
        | QcError::DateColumnNotFound { .. }
        | QcError::ParseFailure { .. }
        | QcError::NoColumnsMatched
        | QcError::NoCommonDates
        | QcError::MalformedInput(_) => EXIT_QC_DATA,
    }
}
