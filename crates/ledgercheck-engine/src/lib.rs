//! LedgerCheck engine - batch data-quality logic
//!
//! This crate implements the processing pass behind the dashboard's
//! "Procesamiento de Datos" view:
//! - Column type inference with confidence scores
//! - Per-field record validation
//! - Duplicate detection
//! - Batch summary aggregation

pub mod parse;
pub mod inference;
pub mod validator;
pub mod duplicates;
pub mod summary;
pub mod pipeline;

pub use inference::{infer, SchemaInferencer};
pub use validator::{validate, RecordValidator};
pub use duplicates::find_duplicates;
pub use summary::summarize;
pub use pipeline::{BatchOutcome, BatchProcessor};
