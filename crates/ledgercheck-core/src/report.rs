//! Batch report schema (stable v1)
//!
//! This schema is STABLE and VERSIONED.
//! Breaking changes require a new version.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use crate::issue::ValidationIssue;
use crate::row::RawRow;
use crate::schema::{BatchSchema, ColumnSchema};

/// Report schema version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportVersion {
    /// Major version (breaking changes)
    pub major: u32,

    /// Minor version (backward-compatible additions)
    pub minor: u32,
}

impl ReportVersion {
    /// Current report schema version
    pub const CURRENT: ReportVersion = ReportVersion { major: 1, minor: 1 };
}

impl std::fmt::Display for ReportVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Record counts for one batch
///
/// Invariant: `valid_records + invalid_records == total_records`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Rows in the batch
    pub total_records: usize,

    /// Rows without any validation issue
    pub valid_records: usize,

    /// Rows with at least one validation issue
    pub invalid_records: usize,

    /// Columns with no values at all
    pub missing_columns: usize,

    /// Rows flagged as repeats of an earlier row
    pub duplicate_records: usize,
}

impl BatchSummary {
    /// Share of valid rows, 0-100 (0 for an empty batch)
    pub fn valid_percentage(&self) -> f64 {
        percentage(self.valid_records, self.total_records)
    }

    /// Share of invalid rows, 0-100 (0 for an empty batch)
    pub fn invalid_percentage(&self) -> f64 {
        percentage(self.invalid_records, self.total_records)
    }
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

/// Processing report (report.json v1)
///
/// This is the stable output format handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Schema version
    pub version: ReportVersion,

    /// Timestamp (ISO 8601)
    pub timestamp: String,

    /// Where the batch came from (file name or caller label)
    pub source: String,

    /// SHA-256 of the batch rows, hex encoded
    pub fingerprint: String,

    /// Record counts
    pub summary: BatchSummary,

    /// Column detection results, in column name order
    pub columns: Vec<ColumnSchema>,

    /// All validation issues, in row order
    pub issues: Vec<ValidationIssue>,

    /// Indices of duplicate rows
    pub duplicates: Vec<usize>,

    /// Wall-clock time spent processing the batch, in milliseconds
    #[serde(default)]
    pub processing_ms: u64,
}

impl BatchReport {
    /// Build a report for a processed batch
    pub fn new(
        source: impl Into<String>,
        rows: &[RawRow],
        schema: &BatchSchema,
        issues: Vec<ValidationIssue>,
        duplicates: Vec<usize>,
        summary: BatchSummary,
    ) -> Self {
        Self {
            version: ReportVersion::CURRENT,
            timestamp: chrono::Utc::now().to_rfc3339(),
            source: source.into(),
            fingerprint: fingerprint(rows),
            summary,
            columns: schema.columns().cloned().collect(),
            issues,
            duplicates,
            processing_ms: 0,
        }
    }

    /// Record how long the batch took to process
    pub fn with_processing_ms(mut self, processing_ms: u64) -> Self {
        self.processing_ms = processing_ms;
        self
    }

    /// Check if the batch had any invalid record
    pub fn has_invalid_records(&self) -> bool {
        self.summary.invalid_records > 0
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Save to file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let json = self.to_json().map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}

/// Content hash of a batch; identical rows in the same order give the same hash
pub fn fingerprint(rows: &[RawRow]) -> String {
    let mut hasher = Sha256::new();
    for row in rows {
        for (column, value) in row.iter() {
            hasher.update(column.as_bytes());
            hasher.update([0x1f]);
            hasher.update(value.as_bytes());
            hasher.update([0x1e]);
        }
        hasher.update([0x0a]);
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::IssueKind;

    fn sample_rows() -> Vec<RawRow> {
        vec![
            RawRow::new().with_field("fecha", "2024-01-15").with_field("ingreso", "12500"),
            RawRow::new().with_field("fecha", "2024-01-16").with_field("ingreso", "8900"),
        ]
    }

    #[test]
    fn summary_percentages() {
        let summary = BatchSummary {
            total_records: 1247,
            valid_records: 1224,
            invalid_records: 23,
            missing_columns: 3,
            duplicate_records: 8,
        };

        assert_eq!(format!("{:.1}", summary.valid_percentage()), "98.2");
        assert_eq!(format!("{:.1}", summary.invalid_percentage()), "1.8");
    }

    #[test]
    fn empty_summary_has_zero_percentages() {
        let summary = BatchSummary::default();
        assert_eq!(summary.valid_percentage(), 0.0);
        assert_eq!(summary.invalid_percentage(), 0.0);
    }

    #[test]
    fn report_with_issues() {
        let issues = vec![ValidationIssue::new(
            1,
            "ingreso",
            IssueKind::NegativeNotAllowed,
            "-15000",
            "Verificar si es un gasto",
        )];
        let summary = BatchSummary {
            total_records: 2,
            valid_records: 1,
            invalid_records: 1,
            ..Default::default()
        };

        let report = BatchReport::new("datos.csv", &sample_rows(), &BatchSchema::new(), issues, vec![], summary);
        assert_eq!(report.version, ReportVersion::CURRENT);
        assert!(report.has_invalid_records());

        let json = report.to_json().unwrap();
        assert!(json.contains("\"fingerprint\""));
        assert!(json.contains("NEGATIVE_NOT_ALLOWED"));
    }

    #[test]
    fn processing_time_is_reported() {
        let report = BatchReport::new("datos.csv", &sample_rows(), &BatchSchema::new(), vec![], vec![], BatchSummary::default())
            .with_processing_ms(1200);
        assert_eq!(report.processing_ms, 1200);

        let json = report.to_json().unwrap();
        assert!(json.contains("\"processing_ms\": 1200"));

        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        value.as_object_mut().unwrap().remove("processing_ms");
        let older: BatchReport = serde_json::from_value(value).unwrap();
        assert_eq!(older.processing_ms, 0);
    }

    #[test]
    fn fingerprint_tracks_content() {
        let rows = sample_rows();
        let mut changed = sample_rows();
        changed[1].insert("ingreso", "8901");

        assert_eq!(fingerprint(&rows), fingerprint(&sample_rows()));
        assert_ne!(fingerprint(&rows), fingerprint(&changed));
        assert_eq!(fingerprint(&rows).len(), 64);
    }
}
