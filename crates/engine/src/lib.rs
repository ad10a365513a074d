//! `salesqc-engine` — reconciliation engine for retail sales/market-share
//! QC exports.
//!
//! Pure engine crate: receives pre-loaded tables, returns a structured
//! outcome or a typed failure. No UI, file IO, or presentation concerns.

pub mod align;
pub mod catalog;
pub mod dates;
pub mod engine;
pub mod error;
pub mod filter;
pub mod matcher;
pub mod model;
pub mod report;

pub use catalog::{Catalog, CatalogEntry};
pub use engine::{run, ComparisonRequest, DEFAULT_THRESHOLD};
pub use error::QcError;
pub use model::{ComparisonOutcome, QcRun, QcWarning, Scalar, Table};
pub use report::{assemble, Report};
