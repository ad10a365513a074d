use serde::Deserialize;

use crate::error::QcError;
use crate::model::QcWarning;

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

/// One named category configuration: the geography columns both sources are
/// expected to carry, and the value that selects this category's rows in
/// the EXTRACT source.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub geographies: Vec<String>,
    pub category_filter: String,
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Ordered catalog of category configurations. Order is load-bearing:
/// filename matching is first-match-wins over declaration order, so
/// more-specific names must come first.
#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    /// Column holding the category value in the EXTRACT source.
    #[serde(default = "default_filter_column")]
    pub filter_column: String,
    #[serde(rename = "entry")]
    pub entries: Vec<CatalogEntry>,
}

fn default_filter_column() -> String {
    "ProdHier".into()
}

impl Catalog {
    pub fn from_toml(input: &str) -> Result<Self, QcError> {
        let catalog: Catalog =
            toml::from_str(input).map_err(|e| QcError::CatalogParse(e.to_string()))?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn validate(&self) -> Result<(), QcError> {
        if self.entries.is_empty() {
            return Err(QcError::CatalogValidation("catalog has no entries".into()));
        }

        for (i, entry) in self.entries.iter().enumerate() {
            if entry.name.trim().is_empty() {
                return Err(QcError::CatalogValidation(format!("entry {i}: empty name")));
            }
            if entry.geographies.is_empty() {
                return Err(QcError::CatalogValidation(format!(
                    "entry '{}': geography list is empty",
                    entry.name
                )));
            }
        }

        // Names must be unique (case-insensitively — matching upper-cases).
        for (i, a) in self.entries.iter().enumerate() {
            for b in &self.entries[i + 1..] {
                if a.name.to_uppercase() == b.name.to_uppercase() {
                    return Err(QcError::CatalogValidation(format!(
                        "duplicate entry name '{}'",
                        a.name
                    )));
                }
            }
        }

        Ok(())
    }

    /// Flag entry pairs where one name contains the other. Matching stays
    /// first-match-wins over declaration order; these are surfaced so
    /// catalog authors see the overlap instead of silently hitting it.
    pub fn ambiguity_warnings(&self) -> Vec<QcWarning> {
        let mut warnings = Vec::new();
        for (i, a) in self.entries.iter().enumerate() {
            for b in &self.entries[i + 1..] {
                let ua = a.name.to_uppercase();
                let ub = b.name.to_uppercase();
                if ua.contains(&ub) || ub.contains(&ua) {
                    warnings.push(QcWarning::AmbiguousCatalogNames(format!(
                        "'{}' overlaps '{}'; declaration order decides",
                        a.name, b.name
                    )));
                }
            }
        }
        warnings
    }

    pub fn pattern_names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }

    /// The built-in retail catalog shipped with the tool.
    pub fn built_in() -> Self {
        fn entry(name: &str, filter: &str, geographies: &[&str]) -> CatalogEntry {
            CatalogEntry {
                name: name.into(),
                geographies: geographies.iter().map(|g| (*g).into()).collect(),
                category_filter: filter.into(),
            }
        }

        Catalog {
            filter_column: default_filter_column(),
            entries: vec![
                entry(
                    "APROTEICI",
                    "01-APROTEICO_3",
                    &[
                        "Hypermarkets (7011)",
                        "SSS (7013)",
                        "Supermarkets (7012)",
                        "Total Generalist Online (6100)",
                        "Total Italy (inc. Discount) (7406)",
                        "Total Italy + Pharma (4380)",
                        "Total Italy Hyper+Super+Pharma (4301)",
                        "Total Italy Pharma (3930)",
                        "Total Italy+Pharma+Online (4397)",
                    ],
                ),
                entry(
                    "INFANZIA",
                    "02-CATEGORY_1",
                    &[
                        "Discount (58)",
                        "Hypermarkets (7011)",
                        "SSS (7013)",
                        "Supermarkets (7012)",
                        "Total Generalist Online (6100)",
                        "Total Italy (inc. Discount) (7406)",
                        "Total Italy + Pharma (4380)",
                        "Total Italy Hyper+Super+Pharma (4301)",
                        "Total Italy Pharma (3930)",
                        "Total Italy+Pharma+Online (4397)",
                        "Traditionals (incl. Microm. <100mq) (7425)",
                    ],
                ),
                entry(
                    "Sauces",
                    "01-CATEGORY_8",
                    &[
                        "Discount (58)",
                        "Hypermarkets (7011)",
                        "SSS (7013)",
                        "Supermarkets (7012)",
                        "Total Generalist Online (6100)",
                        "Total Italy (inc. Discount) (7406)",
                        "Traditionals (incl. Microm. <100mq) (7425)",
                    ],
                ),
                entry(
                    "SALSE",
                    "02-CATEGORY_1",
                    &[
                        "Discount (58)",
                        "Hypermarkets (7011)",
                        "SSS (7013)",
                        "Supermarkets (7012)",
                        "Total Generalist Online (6100)",
                        "Total Italy (inc. Discount) (7406)",
                        "Traditionals (incl. Microm. <100mq) (7425)",
                    ],
                ),
                entry(
                    "GLUTINE",
                    "01-SENZA_GLUTINE_4",
                    &[
                        "Discount (58)",
                        "Hypermarkets (7011)",
                        "SSS (7013)",
                        "Supermarkets (7012)",
                        "Total Generalist Online (6100)",
                        "Total Italy (inc. Discount) (7406)",
                        "Total Italy + Pharma (4380)",
                        "Total Italy Hyper+Super+Pharma (4301)",
                        "Total Italy Pharma (3930)",
                        "Total Italy+Pharma+Online (4397)",
                        "Traditionals (incl. Microm. <100mq) (7425)",
                    ],
                ),
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"
filter_column = "ProdHier"

[[entry]]
name = "APROTEICI"
category_filter = "01-APROTEICO_3"
geographies = ["Hypermarkets (7011)", "Supermarkets (7012)"]

[[entry]]
name = "SALSE"
category_filter = "02-CATEGORY_1"
geographies = ["Discount (58)"]
"#;

    #[test]
    fn parse_valid_catalog() {
        let catalog = Catalog::from_toml(VALID).unwrap();
        assert_eq!(catalog.filter_column, "ProdHier");
        assert_eq!(catalog.entries.len(), 2);
        assert_eq!(catalog.entries[0].name, "APROTEICI");
        assert_eq!(catalog.entries[1].category_filter, "02-CATEGORY_1");
    }

    #[test]
    fn filter_column_defaults() {
        let input = r#"
[[entry]]
name = "X"
category_filter = "f"
geographies = ["a"]
"#;
        let catalog = Catalog::from_toml(input).unwrap();
        assert_eq!(catalog.filter_column, "ProdHier");
    }

    #[test]
    fn reject_empty_geographies() {
        let input = r#"
[[entry]]
name = "X"
category_filter = "f"
geographies = []
"#;
        let err = Catalog::from_toml(input).unwrap_err();
        assert!(err.to_string().contains("geography list is empty"));
    }

    #[test]
    fn reject_duplicate_names_case_insensitive() {
        let input = r#"
[[entry]]
name = "Sauces"
category_filter = "f"
geographies = ["a"]

[[entry]]
name = "SAUCES"
category_filter = "g"
geographies = ["b"]
"#;
        let err = Catalog::from_toml(input).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn overlapping_names_warn_but_parse() {
        let input = r#"
[[entry]]
name = "SALSE_PRONTE"
category_filter = "f"
geographies = ["a"]

[[entry]]
name = "SALSE"
category_filter = "g"
geographies = ["b"]
"#;
        let catalog = Catalog::from_toml(input).unwrap();
        let warnings = catalog.ambiguity_warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].to_string().contains("SALSE_PRONTE"));
    }

    #[test]
    fn built_in_is_valid_and_unambiguous() {
        let catalog = Catalog::built_in();
        catalog.validate().unwrap();
        assert_eq!(catalog.entries.len(), 5);
        assert!(catalog.ambiguity_warnings().is_empty());
    }
}
