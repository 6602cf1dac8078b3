//! Validation issue codes and records
//!
//! IMPORTANT: Issue codes are versioned and stable.
//! NEVER rename or remove codes - reports are consumed by the dashboard.
//! Add new codes with new names only.

use serde::{Deserialize, Serialize};

/// Issue code registry (v1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueKind {
    /// Value does not parse as the column's type
    InvalidFormat,

    /// Amount magnitude above the configured ceiling
    OutOfRange,

    /// Required field left empty
    MissingRequired,

    /// Negative amount in a field that only accepts positive values
    NegativeNotAllowed,
}

impl IssueKind {
    /// Get the issue code as a stable string identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidFormat => "INVALID_FORMAT",
            Self::OutOfRange => "OUT_OF_RANGE",
            Self::MissingRequired => "MISSING_REQUIRED",
            Self::NegativeNotAllowed => "NEGATIVE_NOT_ALLOWED",
        }
    }

    /// Generic label, used when the validator has nothing more specific
    pub fn label(&self) -> &'static str {
        match self {
            Self::InvalidFormat => "Formato inválido",
            Self::OutOfRange => "Valor fuera de rango",
            Self::MissingRequired => "Campo obligatorio vacío",
            Self::NegativeNotAllowed => "Monto negativo no permitido",
        }
    }
}

impl std::fmt::Display for IssueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single field that failed validation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Zero-based index of the row in the batch
    pub row_index: usize,

    /// Column name
    pub field: String,

    /// What went wrong
    pub kind: IssueKind,

    /// Offending raw value, verbatim
    pub raw_value: String,

    /// Label for the invalid records table, specific to the column's type
    #[serde(default)]
    pub error: String,

    /// Correction hint for the operator
    pub suggestion: String,
}

impl ValidationIssue {
    pub fn new(
        row_index: usize,
        field: impl Into<String>,
        kind: IssueKind,
        raw_value: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self {
            row_index,
            field: field.into(),
            kind,
            raw_value: raw_value.into(),
            error: kind.label().to_string(),
            suggestion: suggestion.into(),
        }
    }

    /// Replace the generic label of the issue kind
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = error.into();
        self
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "row {} [{}] {}: {:?} ({})",
            self.row_index, self.kind, self.field, self.raw_value, self.suggestion
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_code_stability() {
        assert_eq!(IssueKind::InvalidFormat.as_str(), "INVALID_FORMAT");
        assert_eq!(IssueKind::NegativeNotAllowed.as_str(), "NEGATIVE_NOT_ALLOWED");
    }

    #[test]
    fn issue_serialization() {
        let issue = ValidationIssue::new(
            45,
            "fecha",
            IssueKind::InvalidFormat,
            "2024-13-45",
            "Formato correcto: YYYY-MM-DD",
        );

        let json = serde_json::to_string(&issue).unwrap();
        assert!(json.contains("INVALID_FORMAT"));
        assert!(json.contains("\"row_index\":45"));
        assert!(json.contains("\"error\":\"Formato inválido\""));
    }

    #[test]
    fn specific_error_label() {
        let issue = ValidationIssue::new(3, "fecha", IssueKind::InvalidFormat, "ayer", "Formato correcto: YYYY-MM-DD")
            .with_error("Fecha inválida");

        assert_eq!(issue.error, "Fecha inválida");
        assert_eq!(issue.kind.label(), "Formato inválido");
    }

    #[test]
    fn error_label_is_optional_on_read() {
        let json = r#"{"row_index":1,"field":"ingreso","kind":"OUT_OF_RANGE","raw_value":"999999999","suggestion":"Verificar cifras"}"#;
        let issue: ValidationIssue = serde_json::from_str(json).unwrap();

        assert_eq!(issue.kind, IssueKind::OutOfRange);
        assert_eq!(issue.error, "");
    }
}
