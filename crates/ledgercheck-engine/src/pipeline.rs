//! Batch pipeline: inference, validation, duplicate detection, summary

use ledgercheck_core::{BatchReport, BatchSchema, BatchSummary, Config, RawRow, ValidationIssue};
use std::collections::BTreeSet;
use std::time::Instant;
use tracing::{info, info_span};

use crate::duplicates::find_duplicates;
use crate::inference::SchemaInferencer;
use crate::summary::summarize;
use crate::validator::RecordValidator;

/// Everything produced for one batch
#[derive(Debug, Clone, PartialEq)]
pub struct BatchOutcome {
    pub schema: BatchSchema,
    pub issues: Vec<ValidationIssue>,
    pub duplicates: BTreeSet<usize>,
    pub summary: BatchSummary,

    /// Wall-clock time of the processing pass
    pub processing_ms: u64,
}

impl BatchOutcome {
    /// Issues raised for a single row
    pub fn issues_for_row(&self, row_index: usize) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(move |i| i.row_index == row_index)
    }

    pub fn is_valid(&self, row_index: usize) -> bool {
        self.issues_for_row(row_index).next().is_none()
    }

    pub fn is_duplicate(&self, row_index: usize) -> bool {
        self.duplicates.contains(&row_index)
    }

    /// Package the outcome as a versioned report
    pub fn into_report(self, source: impl Into<String>, rows: &[RawRow]) -> BatchReport {
        BatchReport::new(
            source,
            rows,
            &self.schema,
            self.issues,
            self.duplicates.into_iter().collect(),
            self.summary,
        )
        .with_processing_ms(self.processing_ms)
    }
}

/// Runs the full processing pass over a batch
#[derive(Debug, Clone, Default)]
pub struct BatchProcessor {
    config: Config,
}

impl BatchProcessor {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Process a batch; never fails, an empty batch gives an all-zero summary
    pub fn process(&self, rows: &[RawRow]) -> BatchOutcome {
        let _span = info_span!("process_batch", rows = rows.len()).entered();
        let started = Instant::now();

        let schema = SchemaInferencer::new(&self.config).infer(rows);
        let issues = RecordValidator::new(&self.config).validate_batch(rows, &schema);
        let duplicates = find_duplicates(rows, self.config.duplicates.key_fields.as_slice(), &schema);
        let summary = summarize(rows, &issues, &duplicates, &schema);
        let processing_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        info!(
            total = summary.total_records,
            valid = summary.valid_records,
            invalid = summary.invalid_records,
            duplicates = summary.duplicate_records,
            missing_columns = summary.missing_columns,
            processing_ms,
            "batch processed"
        );

        BatchOutcome {
            schema,
            issues,
            duplicates,
            summary,
            processing_ms,
        }
    }
}
