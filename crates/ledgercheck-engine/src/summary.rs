//! Batch summary aggregation

use ledgercheck_core::{BatchSchema, BatchSummary, RawRow, ValidationIssue};
use std::collections::BTreeSet;

/// Aggregate validation and duplicate results into record counts
///
/// A row counts as invalid once no matter how many issues it has. Duplicates
/// are counted separately and do not affect validity.
pub fn summarize(
    rows: &[RawRow],
    issues: &[ValidationIssue],
    duplicates: &BTreeSet<usize>,
    schema: &BatchSchema,
) -> BatchSummary {
    let total_records = rows.len();
    let invalid_records = issues
        .iter()
        .map(|issue| issue.row_index)
        .filter(|index| *index < total_records)
        .collect::<BTreeSet<_>>()
        .len();

    BatchSummary {
        total_records,
        valid_records: total_records - invalid_records,
        invalid_records,
        missing_columns: schema.missing_count(),
        duplicate_records: duplicates.len(),
    }
}
