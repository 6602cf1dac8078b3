//! Duplicate row detection
//!
//! Rows are keyed on their normalized key-field values and grouped in a hash
//! map, so only rows sharing a bucket are ever compared. The first row of each
//! group is canonical; every later row of the group is flagged.

use ledgercheck_core::{BatchSchema, RawRow};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

use crate::parse::canonical_amount;

/// Normalize a value for key comparison
///
/// In numeric columns amounts compare by exact value (`1000.0` == `1000` ==
/// `$1,000`); everything else, including number-shaped codes in text columns,
/// is trimmed and case-folded.
pub fn normalize_key_value(raw: &str, numeric: bool) -> String {
    let trimmed = raw.trim();
    if numeric {
        if let Some(canonical) = canonical_amount(trimmed) {
            return canonical;
        }
    }
    trimmed.to_lowercase()
}

/// Indices of rows repeating an earlier row on `key_fields`
///
/// With no key fields every column seen in the batch takes part in the key.
/// `schema` decides which key fields are canonicalized as numbers.
pub fn find_duplicates<S: AsRef<str>>(rows: &[RawRow], key_fields: &[S], schema: &BatchSchema) -> BTreeSet<usize> {
    let fields: Vec<&str> = if key_fields.is_empty() {
        rows.iter()
            .flat_map(|r| r.column_names())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    } else {
        key_fields.iter().map(|f| f.as_ref()).collect()
    };
    let numeric: Vec<bool> = fields
        .iter()
        .map(|f| schema.find_column(f).is_some_and(|c| c.inferred_type.is_numeric()))
        .collect();

    let mut first_seen: HashMap<Vec<String>, usize> = HashMap::with_capacity(rows.len());
    let mut duplicates = BTreeSet::new();

    for (index, row) in rows.iter().enumerate() {
        let key: Vec<String> = fields
            .iter()
            .zip(&numeric)
            .map(|(f, numeric)| normalize_key_value(row.get(f), *numeric))
            .collect();
        if first_seen.contains_key(&key) {
            duplicates.insert(index);
        } else {
            first_seen.insert(key, index);
        }
    }

    debug!(rows = rows.len(), groups = first_seen.len(), duplicates = duplicates.len(), "duplicates detected");
    duplicates
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgercheck_core::{ColumnSchema, ColumnStatus, SemanticType};

    fn row(pairs: &[(&str, &str)]) -> RawRow {
        pairs.iter().copied().collect()
    }

    fn schema(columns: &[(&str, SemanticType)]) -> BatchSchema {
        BatchSchema::from_columns(columns.iter().map(|(name, ty)| ColumnSchema {
            name: name.to_string(),
            inferred_type: *ty,
            confidence: 1.0,
            status: ColumnStatus::Detected,
            fill_rate: 1.0,
            sampled: 1,
        }))
    }

    #[test]
    fn later_occurrences_are_flagged() {
        let rows = vec![
            row(&[("fecha", "2024-01-15"), ("ingreso", "12500")]),
            row(&[("fecha", "2024-13-45"), ("ingreso", "-15000")]),
            row(&[("fecha", "2024-01-15"), ("ingreso", "12500")]),
            row(&[("fecha", "2024-01-15"), ("ingreso", "12500")]),
        ];
        let schema = schema(&[("fecha", SemanticType::Date), ("ingreso", SemanticType::Currency)]);

        assert_eq!(find_duplicates(&rows, &["fecha", "ingreso"], &schema), BTreeSet::from([2, 3]));
    }

    #[test]
    fn numbers_compare_by_value() {
        let rows = vec![
            row(&[("monto", "1000")]),
            row(&[("monto", "1000.0")]),
            row(&[("monto", " $1,000 ")]),
            row(&[("monto", "1000.5")]),
        ];
        let schema = schema(&[("monto", SemanticType::Currency)]);

        assert_eq!(find_duplicates(&rows, &["monto"], &schema), BTreeSet::from([1, 2]));
    }

    #[test]
    fn long_account_numbers_stay_distinct() {
        let rows = vec![
            row(&[("cuenta", "12345678901234567890")]),
            row(&[("cuenta", "12345678901234567891")]),
            row(&[("cuenta", "12,345,678,901,234,567,890")]),
        ];
        let schema = schema(&[("cuenta", SemanticType::Numeric)]);

        assert_eq!(find_duplicates(&rows, &["cuenta"], &schema), BTreeSet::from([2]));
    }

    #[test]
    fn zero_padded_codes_in_text_columns_differ() {
        let rows = vec![row(&[("codigo", "007")]), row(&[("codigo", "7")]), row(&[("codigo", " 007 ")])];
        let schema = schema(&[("codigo", SemanticType::Text)]);

        assert_eq!(find_duplicates(&rows, &["codigo"], &schema), BTreeSet::from([2]));
    }

    #[test]
    fn text_is_trimmed_and_case_folded() {
        let rows = vec![
            row(&[("centro", "Ventas")]),
            row(&[("centro", "  VENTAS")]),
            row(&[("centro", "Producción")]),
            row(&[("centro", "PRODUCCIÓN")]),
        ];

        assert_eq!(find_duplicates(&rows, &["centro"], &BatchSchema::new()), BTreeSet::from([1, 3]));
    }

    #[test]
    fn only_key_fields_matter() {
        let rows = vec![
            row(&[("fecha", "2024-01-15"), ("centro", "Ventas")]),
            row(&[("fecha", "2024-01-15"), ("centro", "Producción")]),
        ];
        let schema = BatchSchema::new();

        assert_eq!(find_duplicates(&rows, &["fecha"], &schema), BTreeSet::from([1]));
        assert!(find_duplicates::<&str>(&rows, &[], &schema).is_empty());
    }

    #[test]
    fn missing_key_reads_as_empty() {
        let rows = vec![row(&[("fecha", "")]), row(&[])];
        assert_eq!(find_duplicates(&rows, &["fecha"], &BatchSchema::new()), BTreeSet::from([1]));
    }

    #[test]
    fn detection_is_idempotent() {
        let rows: Vec<RawRow> = (0..100).map(|i| row(&[("k", if i % 3 == 0 { "a" } else { "b" })])).collect();
        let schema = BatchSchema::new();
        let first = find_duplicates(&rows, &["k"], &schema);
        let second = find_duplicates(&rows, &["k"], &schema);

        assert_eq!(first, second);
        assert_eq!(first.len(), 98);
    }
}
