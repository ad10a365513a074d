use std::fmt;

#[derive(Debug)]
pub enum QcError {
    /// TOML parse / deserialization error for a catalog file.
    CatalogParse(String),
    /// Catalog validation error (duplicate name, empty geography list, ...).
    CatalogValidation(String),
    /// One or both source names match no catalog entry.
    UnmappedFile { files: Vec<String>, patterns: Vec<String> },
    /// The two sources match different catalog entries.
    PatternMismatch {
        file_a: String,
        pattern_a: String,
        file_b: String,
        pattern_b: String,
    },
    /// The category filter removed every row.
    EmptyAfterFilter { filter: String },
    /// No candidate date column present.
    DateColumnNotFound { source: String },
    /// No row's date value could be parsed.
    ParseFailure { source: String, column: String },
    /// Column alignment produced an empty correspondence.
    NoColumnsMatched,
    /// The date intersection is empty.
    NoCommonDates,
    /// Catch-all for structurally unusable input tables.
    MalformedInput(String),
}

impl fmt::Display for QcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CatalogParse(msg) => write!(f, "catalog parse error: {msg}"),
            Self::CatalogValidation(msg) => write!(f, "catalog validation error: {msg}"),
            Self::UnmappedFile { files, patterns } => {
                write!(
                    f,
                    "no catalog entry matches: {}. Available patterns: {}",
                    files.join(", "),
                    patterns.join(", ")
                )
            }
            Self::PatternMismatch { file_a, pattern_a, file_b, pattern_b } => {
                write!(
                    f,
                    "files resolve to different catalog entries: '{file_a}' → {pattern_a}, '{file_b}' → {pattern_b}"
                )
            }
            Self::EmptyAfterFilter { filter } => {
                write!(f, "no rows remain after category filter '{filter}'")
            }
            Self::DateColumnNotFound { source } => {
                write!(f, "source '{source}': no date column found")
            }
            Self::ParseFailure { source, column } => {
                write!(f, "source '{source}': no value in column '{column}' parses as a date")
            }
            Self::NoColumnsMatched => {
                write!(f, "column alignment produced no correspondence; check the catalog geographies")
            }
            Self::NoCommonDates => write!(f, "the two sources share no dates"),
            Self::MalformedInput(msg) => write!(f, "malformed input: {msg}"),
        }
    }
}

impl std::error::Error for QcError {}
