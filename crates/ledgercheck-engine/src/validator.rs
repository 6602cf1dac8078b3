//! Record validation against an inferred schema
//!
//! Rules are evaluated per field and independently, so a row can collect
//! several issues. Malformed values always become issues; validation itself
//! never fails.

use ledgercheck_core::{BatchSchema, ColumnSchema, Config, IssueKind, RawRow, SemanticType, ValidationIssue};
use tracing::debug;

use crate::parse::{parse_amount, ValueParser};

pub const DATE_SUGGESTION: &str = "Formato correcto: YYYY-MM-DD";
pub const AMOUNT_SUGGESTION: &str = "Usar formato: 12345.67";
pub const NEGATIVE_SUGGESTION: &str = "Verificar si es un gasto";
pub const RANGE_SUGGESTION: &str = "Verificar cifras";

/// Validates rows field by field
#[derive(Debug, Clone)]
pub struct RecordValidator<'a> {
    config: &'a Config,
    parser: ValueParser<'a>,
}

impl<'a> RecordValidator<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            parser: ValueParser::new(&config.inference.date_formats),
        }
    }

    /// Validate one row; an empty result means the row is valid
    pub fn validate(&self, row: &RawRow, schema: &BatchSchema, row_index: usize) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        for column in schema.columns() {
            self.check_field(row, column, row_index, &mut issues);
        }
        issues
    }

    /// Validate every row of a batch, issues in row order
    pub fn validate_batch(&self, rows: &[RawRow], schema: &BatchSchema) -> Vec<ValidationIssue> {
        let issues: Vec<ValidationIssue> = rows
            .iter()
            .enumerate()
            .flat_map(|(index, row)| self.validate(row, schema, index))
            .collect();

        debug!(rows = rows.len(), issues = issues.len(), "batch validated");
        issues
    }

    fn check_field(&self, row: &RawRow, column: &ColumnSchema, row_index: usize, issues: &mut Vec<ValidationIssue>) {
        let field = column.name.as_str();
        let raw = row.get(field);
        let issue = |kind, suggestion: String| ValidationIssue::new(row_index, field, kind, raw, suggestion);

        if raw.trim().is_empty() {
            if self.config.validation.is_required(field) {
                issues.push(issue(IssueKind::MissingRequired, format!("Completar campo '{}'", field)));
            }
            return;
        }

        match column.inferred_type {
            SemanticType::Date => {
                if self.parser.parse_date(raw).is_none() {
                    issues.push(issue(IssueKind::InvalidFormat, DATE_SUGGESTION.to_string()).with_error("Fecha inválida"));
                }
            }
            ty if ty.is_numeric() => {
                let Some(amount) = parse_amount(raw) else {
                    let error = if ty == SemanticType::Currency {
                        "Formato de moneda incorrecto"
                    } else {
                        "Formato numérico incorrecto"
                    };
                    issues.push(issue(IssueKind::InvalidFormat, AMOUNT_SUGGESTION.to_string()).with_error(error));
                    return;
                };

                if amount.value < 0.0 && self.config.validation.rejects_negative(field) {
                    issues.push(
                        issue(IssueKind::NegativeNotAllowed, NEGATIVE_SUGGESTION.to_string())
                            .with_error(format!("Monto negativo en {}", field)),
                    );
                }
                if amount.value.abs() > self.config.validation.amount_ceiling {
                    issues.push(issue(IssueKind::OutOfRange, RANGE_SUGGESTION.to_string()));
                }
            }
            _ => {}
        }
    }
}

/// Validate one row with the given configuration
pub fn validate(row: &RawRow, schema: &BatchSchema, row_index: usize, config: &Config) -> Vec<ValidationIssue> {
    RecordValidator::new(config).validate(row, schema, row_index)
}
