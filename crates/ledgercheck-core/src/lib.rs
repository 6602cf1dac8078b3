//! LedgerCheck Core
//!
//! Core domain model for batch data-quality checks.
//! Never rename issue codes - they are part of the public report format.

pub mod row;
pub mod schema;
pub mod issue;
pub mod report;
pub mod config;

pub use row::RawRow;
pub use schema::{SemanticType, ColumnStatus, ColumnSchema, BatchSchema};
pub use issue::{IssueKind, ValidationIssue};
pub use report::{BatchReport, BatchSummary, ReportVersion};
pub use config::{Config, ConfigError, InferenceConfig, ValidationConfig, DuplicateConfig};
