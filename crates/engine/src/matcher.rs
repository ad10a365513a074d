use std::path::Path;

use crate::catalog::{Catalog, CatalogEntry};
use crate::error::QcError;

/// Resolve a filename to a catalog entry.
///
/// The file stem is upper-cased and every entry name (in catalog declaration
/// order) is tested as a substring. First match wins; when one entry name
/// contains another, declaration order decides.
pub fn match_filename<'a>(catalog: &'a Catalog, filename: &str) -> Option<&'a CatalogEntry> {
    let stem = Path::new(filename)
        .file_stem()
        .map(|s| s.to_string_lossy().to_uppercase())
        .unwrap_or_default();

    catalog
        .entries
        .iter()
        .find(|entry| stem.contains(&entry.name.to_uppercase()))
}

/// Resolve both filenames and require them to land on the same entry.
pub fn validate_pair<'a>(
    catalog: &'a Catalog,
    file_a: &str,
    file_b: &str,
) -> Result<&'a CatalogEntry, QcError> {
    let entry_a = match_filename(catalog, file_a);
    let entry_b = match_filename(catalog, file_b);

    match (entry_a, entry_b) {
        (Some(a), Some(b)) => {
            if a.name == b.name {
                Ok(a)
            } else {
                Err(QcError::PatternMismatch {
                    file_a: file_a.into(),
                    pattern_a: a.name.clone(),
                    file_b: file_b.into(),
                    pattern_b: b.name.clone(),
                })
            }
        }
        (a, b) => {
            let mut files = Vec::new();
            if a.is_none() {
                files.push(format!("File 1: {file_a}"));
            }
            if b.is_none() {
                files.push(format!("File 2: {file_b}"));
            }
            Err(QcError::UnmappedFile {
                files,
                patterns: catalog.pattern_names(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_entry_in_stem() {
        let catalog = Catalog::built_in();
        let entry = match_filename(&catalog, "IT_2393_APROTEICI_D156.xlsx").unwrap();
        assert_eq!(entry.name, "APROTEICI");
    }

    #[test]
    fn match_is_case_insensitive_and_ignores_extension() {
        let catalog = Catalog::built_in();
        let entry = match_filename(&catalog, "weekly_salse_export.CSV").unwrap();
        assert_eq!(entry.name, "SALSE");

        let entry = match_filename(&catalog, "1. Check_Model_Custom_APROTEICI (33).xlsx").unwrap();
        assert_eq!(entry.name, "APROTEICI");
    }

    #[test]
    fn no_match_returns_none() {
        let catalog = Catalog::built_in();
        assert!(match_filename(&catalog, "totally_unrelated.xlsx").is_none());
    }

    #[test]
    fn declaration_order_decides_overlaps() {
        let toml = r#"
[[entry]]
name = "SALSE_BIO"
category_filter = "f"
geographies = ["a"]

[[entry]]
name = "SALSE"
category_filter = "g"
geographies = ["b"]
"#;
        let catalog = Catalog::from_toml(toml).unwrap();
        // Stem contains both names; the first declared entry wins.
        let entry = match_filename(&catalog, "export_SALSE_BIO_2024.xlsx").unwrap();
        assert_eq!(entry.name, "SALSE_BIO");
    }

    #[test]
    fn pair_resolving_to_same_entry() {
        let catalog = Catalog::built_in();
        let entry = validate_pair(
            &catalog,
            "IT_2393_APROTEICI_D156.xlsx",
            "1. Check_Model_Custom_APROTEICI (33).xlsx",
        )
        .unwrap();
        assert_eq!(entry.name, "APROTEICI");
    }

    #[test]
    fn pair_resolving_to_different_entries() {
        let catalog = Catalog::built_in();
        let err = validate_pair(&catalog, "unify_APROTEICI.xlsx", "extract_SALSE.xlsx")
            .unwrap_err();
        match err {
            QcError::PatternMismatch { pattern_a, pattern_b, .. } => {
                assert_eq!(pattern_a, "APROTEICI");
                assert_eq!(pattern_b, "SALSE");
            }
            other => panic!("expected PatternMismatch, got {other}"),
        }
    }

    #[test]
    fn unmapped_file_names_the_failing_side() {
        let catalog = Catalog::built_in();
        let err = validate_pair(&catalog, "unify_APROTEICI.xlsx", "mystery.xlsx").unwrap_err();
        match err {
            QcError::UnmappedFile { files, patterns } => {
                assert_eq!(files, vec!["File 2: mystery.xlsx".to_string()]);
                assert_eq!(patterns.len(), 5);
            }
            other => panic!("expected UnmappedFile, got {other}"),
        }
    }

    #[test]
    fn unmapped_both_sides_listed() {
        let catalog = Catalog::built_in();
        let err = validate_pair(&catalog, "a.xlsx", "b.xlsx").unwrap_err();
        match err {
            QcError::UnmappedFile { files, .. } => {
                assert_eq!(files.len(), 2);
                assert!(files[0].starts_with("File 1:"));
                assert!(files[1].starts_with("File 2:"));
            }
            other => panic!("expected UnmappedFile, got {other}"),
        }
    }
}
