//! Column schema types and the semantic type system

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Semantic column type
///
/// Variants are declared in inference priority order: when two types explain
/// the same share of a column, the earlier one wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticType {
    /// Calendar date
    Date,

    /// Monetary amount
    Currency,

    /// Plain real number
    Numeric,

    /// Free text (always matches)
    Text,
}

impl SemanticType {
    /// Typed checkers in priority order (Text is the fallback and is not listed)
    pub const TYPED: [SemanticType; 3] = [Self::Date, Self::Currency, Self::Numeric];

    /// Whether values of this type must parse as a real number
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Currency | Self::Numeric)
    }
}

impl std::fmt::Display for SemanticType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Date => write!(f, "Date"),
            Self::Currency => write!(f, "Currency"),
            Self::Numeric => write!(f, "Numeric"),
            Self::Text => write!(f, "Text"),
        }
    }
}

/// Detection state of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnStatus {
    /// Type detected with enough confidence
    Detected,

    /// Low confidence or sparsely filled
    Partial,

    /// No values at all
    Missing,
}

impl ColumnStatus {
    /// Label shown on the processing dashboard
    pub fn label(&self) -> &'static str {
        match self {
            Self::Detected => "Detectado",
            Self::Partial => "Parcial",
            Self::Missing => "Faltante",
        }
    }
}

impl std::fmt::Display for ColumnStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Detected => write!(f, "detected"),
            Self::Partial => write!(f, "partial"),
            Self::Missing => write!(f, "missing"),
        }
    }
}

/// Inferred schema of a single column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSchema {
    /// Column name
    pub name: String,

    /// Winning semantic type
    pub inferred_type: SemanticType,

    /// Share of non-empty sampled values matching `inferred_type`, in [0, 1]
    pub confidence: f64,

    /// Detection state
    pub status: ColumnStatus,

    /// Share of sampled values that were non-empty, in [0, 1]
    pub fill_rate: f64,

    /// Number of values sampled
    pub sampled: usize,
}

impl ColumnSchema {
    /// A column that has no values in the batch
    pub fn missing(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            inferred_type: SemanticType::Text,
            confidence: 0.0,
            status: ColumnStatus::Missing,
            fill_rate: 0.0,
            sampled: 0,
        }
    }

    pub fn is_missing(&self) -> bool {
        self.status == ColumnStatus::Missing
    }

    /// Confidence as a whole percentage, as displayed on the dashboard
    pub fn confidence_percent(&self) -> u32 {
        (self.confidence * 100.0).round() as u32
    }
}

/// Inferred schema of a batch, keyed by column name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchSchema {
    columns: BTreeMap<String, ColumnSchema>,
}

impl BatchSchema {
    /// Create a new empty schema
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a schema from columns
    pub fn from_columns(columns: impl IntoIterator<Item = ColumnSchema>) -> Self {
        Self {
            columns: columns.into_iter().map(|c| (c.name.clone(), c)).collect(),
        }
    }

    /// Find a column by name
    pub fn find_column(&self, name: &str) -> Option<&ColumnSchema> {
        self.columns.get(name)
    }

    /// Column names in name order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.keys().map(String::as_str).collect()
    }

    /// Columns in name order
    pub fn columns(&self) -> impl Iterator<Item = &ColumnSchema> {
        self.columns.values()
    }

    /// Number of columns with status `Missing`
    pub fn missing_count(&self) -> usize {
        self.columns.values().filter(|c| c.is_missing()).count()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
