use crate::catalog::CatalogEntry;
use crate::model::{ColumnMap, QcWarning};

/// Build the A↔B column correspondence for one catalog entry.
///
/// Each geography is matched independently against both header lists:
/// case-insensitive equality, geography-in-column, or column-in-geography,
/// first column in declared order wins. Geographies that fail on either
/// side come back as warnings and are excluded from the map. An empty map
/// is the engine's problem (`NoColumnsMatched`), not ours.
pub fn align_columns(
    entry: &CatalogEntry,
    columns_a: &[String],
    columns_b: &[String],
) -> (ColumnMap, Vec<QcWarning>) {
    let mut map = ColumnMap::new();
    let mut warnings = Vec::new();

    for geography in &entry.geographies {
        let match_a = fuzzy_match(geography, columns_a);
        let match_b = fuzzy_match(geography, columns_b);

        match (match_a, match_b) {
            (Some(a), Some(b)) => map.push((a.to_string(), b.to_string())),
            _ => warnings.push(QcWarning::ColumnUnmatched(geography.clone())),
        }
    }

    (map, warnings)
}

fn fuzzy_match<'a>(target: &str, columns: &'a [String]) -> Option<&'a str> {
    let target_lower = target.to_lowercase();
    columns
        .iter()
        .find(|col| {
            let col_lower = col.to_lowercase();
            col_lower == target_lower
                || col_lower.contains(&target_lower)
                || target_lower.contains(&col_lower)
        })
        .map(|c| c.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogEntry;

    fn entry(geographies: &[&str]) -> CatalogEntry {
        CatalogEntry {
            name: "TEST".into(),
            geographies: geographies.iter().map(|g| (*g).into()).collect(),
            category_filter: "f".into(),
        }
    }

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| (*n).into()).collect()
    }

    #[test]
    fn exact_match_case_insensitive() {
        let e = entry(&["Hypermarkets (7011)"]);
        let a = cols(&["Time", "HYPERMARKETS (7011)"]);
        let b = cols(&["Date", "hypermarkets (7011)"]);
        let (map, warnings) = align_columns(&e, &a, &b);
        assert_eq!(map, vec![("HYPERMARKETS (7011)".to_string(), "hypermarkets (7011)".to_string())]);
        assert!(warnings.is_empty());
    }

    #[test]
    fn substring_match_either_direction() {
        let e = entry(&["Supermarkets (7012)"]);
        // Geography is a substring of the column name.
        let a = cols(&["IT Supermarkets (7012) Sales"]);
        // Column name is a substring of the geography.
        let b = cols(&["Supermarkets"]);
        let (map, warnings) = align_columns(&e, &a, &b);
        assert_eq!(map.len(), 1);
        assert_eq!(map[0].0, "IT Supermarkets (7012) Sales");
        assert_eq!(map[0].1, "Supermarkets");
        assert!(warnings.is_empty());
    }

    #[test]
    fn first_column_wins_on_duplicate_candidates() {
        let e = entry(&["Discount (58)"]);
        let a = cols(&["Discount (58) v1", "Discount (58) v2"]);
        let b = cols(&["Discount (58)"]);
        let (map, _) = align_columns(&e, &a, &b);
        assert_eq!(map[0].0, "Discount (58) v1");
    }

    #[test]
    fn unmatched_geography_excluded_with_warning() {
        let e = entry(&["Hypermarkets (7011)", "Pharma (3930)"]);
        let a = cols(&["Hypermarkets (7011)"]);
        let b = cols(&["Hypermarkets (7011)"]);
        let (map, warnings) = align_columns(&e, &a, &b);
        assert_eq!(map.len(), 1);
        assert_eq!(
            warnings,
            vec![QcWarning::ColumnUnmatched("Pharma (3930)".into())]
        );
    }

    #[test]
    fn one_sided_match_still_counts_as_unmatched() {
        let e = entry(&["SSS (7013)"]);
        let a = cols(&["SSS (7013)"]);
        let b = cols(&["Totally different"]);
        let (map, warnings) = align_columns(&e, &a, &b);
        assert!(map.is_empty());
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn map_preserves_geography_declaration_order() {
        let e = entry(&["B column", "A column"]);
        let a = cols(&["A column", "B column"]);
        let b = cols(&["A column", "B column"]);
        let (map, _) = align_columns(&e, &a, &b);
        assert_eq!(map[0].0, "B column");
        assert_eq!(map[1].0, "A column");
    }
}
