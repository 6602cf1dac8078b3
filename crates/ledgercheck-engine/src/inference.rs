//! Column type inference
//!
//! Every column is sampled, each non-empty sample is run through the typed
//! checkers, and the checker explaining the most samples wins. Ties go to the
//! higher-priority type (Date > Currency > Numeric). Text is the fallback, also
//! taken when the winner explains less than `min_type_share` of the samples.

use ledgercheck_core::{BatchSchema, ColumnSchema, ColumnStatus, Config, RawRow, SemanticType};
use std::collections::BTreeSet;
use tracing::{debug, warn};

use crate::parse::ValueParser;

/// Infers a [`BatchSchema`] from raw rows
#[derive(Debug, Clone)]
pub struct SchemaInferencer<'a> {
    config: &'a Config,
    parser: ValueParser<'a>,
}

impl<'a> SchemaInferencer<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            parser: ValueParser::new(&config.inference.date_formats),
        }
    }

    /// Infer the schema of a batch
    ///
    /// The column set is every column seen in any row plus configured expected
    /// and required columns. An empty batch yields an empty schema.
    pub fn infer(&self, rows: &[RawRow]) -> BatchSchema {
        if rows.is_empty() {
            return BatchSchema::new();
        }

        let mut names: BTreeSet<&str> = rows.iter().flat_map(|r| r.column_names()).collect();
        names.extend(self.config.expected_columns.iter().map(String::as_str));
        names.extend(self.config.validation.required_fields.iter().map(String::as_str));

        let schema = BatchSchema::from_columns(names.into_iter().map(|name| self.infer_column(name, rows)));

        for column in schema.columns().filter(|c| c.is_missing()) {
            warn!(column = %column.name, "column has no values");
        }
        debug!(columns = schema.len(), missing = schema.missing_count(), "schema inferred");

        schema
    }

    fn infer_column(&self, name: &str, rows: &[RawRow]) -> ColumnSchema {
        if !rows.iter().any(|r| r.contains(name)) {
            return ColumnSchema::missing(name);
        }

        let values: Vec<&str> = rows.iter().map(|r| r.get(name)).collect();
        let sample = sample_values(values, self.config.inference.sample_size);
        let filled: Vec<&str> = sample.iter().copied().filter(|v| !v.trim().is_empty()).collect();

        let sampled = sample.len();
        let fill_rate = if sampled == 0 { 0.0 } else { filled.len() as f64 / sampled as f64 };

        if filled.is_empty() {
            return ColumnSchema {
                sampled,
                ..ColumnSchema::missing(name)
            };
        }

        let monetary = self.config.inference.is_currency_column(name);
        let count = |ty: SemanticType| {
            filled.iter().filter(|v| self.parser.matches(ty, v, monetary)).count()
        };

        let (inferred_type, matches) = match self.config.column_override(name) {
            Some(forced) => (forced, count(forced)),
            None => {
                let mut best = (SemanticType::Text, 0);
                for ty in SemanticType::TYPED {
                    let n = count(ty);
                    if n > best.1 {
                        best = (ty, n);
                    }
                }
                let share = best.1 as f64 / filled.len() as f64;
                if best.1 == 0 || share < self.config.inference.min_type_share {
                    (SemanticType::Text, filled.len())
                } else {
                    best
                }
            }
        };

        let confidence = matches as f64 / filled.len() as f64;
        let inference = &self.config.inference;
        let status = if confidence < inference.min_confidence || fill_rate < inference.min_fill_rate {
            ColumnStatus::Partial
        } else {
            ColumnStatus::Detected
        };

        debug!(column = name, ty = %inferred_type, confidence, fill_rate, "column inferred");

        ColumnSchema {
            name: name.to_string(),
            inferred_type,
            confidence,
            status,
            fill_rate,
            sampled,
        }
    }
}

/// Pick up to `limit` values independently of row order
///
/// Values are sorted and taken at an even stride, so permuting the rows never
/// changes the sample.
fn sample_values(mut values: Vec<&str>, limit: usize) -> Vec<&str> {
    values.sort_unstable();
    let len = values.len();
    if len <= limit {
        return values;
    }
    (0..limit).map(|i| values[i * len / limit]).collect()
}

/// Infer a schema with the given configuration
pub fn infer(rows: &[RawRow], config: &Config) -> BatchSchema {
    SchemaInferencer::new(config).infer(rows)
}
