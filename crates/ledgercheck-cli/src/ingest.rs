//! CSV ingestion into raw rows

use csv::{ReaderBuilder, Trim};
use ledgercheck_core::RawRow;
use std::collections::HashSet;
use std::path::Path;

/// Ingestion failures; these are the only fatal errors of a run
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read CSV headers: {0}")]
    Headers(#[source] csv::Error),

    #[error("column '{0}' appears more than once in the CSV header")]
    DuplicateHeader(String),

    #[error("failed to parse CSV record {record}: {source}")]
    Record {
        record: usize,
        #[source]
        source: csv::Error,
    },
}

/// Loads CSV text into [`RawRow`]s keyed by the header row
#[derive(Debug, Clone)]
pub struct CsvLoader {
    /// Delimiter character (default: comma)
    delimiter: u8,
}

impl Default for CsvLoader {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set custom delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Load a CSV file
    pub fn load_file(&self, path: &Path) -> Result<Vec<RawRow>, IngestError> {
        let bytes = std::fs::read(path).map_err(|source| IngestError::Io {
            path: path.display().to_string(),
            source,
        })?;

        // Spreadsheet exports are not always UTF-8; keep going with replacement chars.
        let content = String::from_utf8_lossy(&bytes);
        self.parse_content(&content)
    }

    /// Parse CSV content from a string
    ///
    /// Short records leave their trailing columns out of the row, which reads
    /// them as empty; extra cells beyond the header are dropped.
    pub fn parse_content(&self, content: &str) -> Result<Vec<RawRow>, IngestError> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(Trim::All)
            .flexible(true)
            .from_reader(content.as_bytes());

        let headers = reader.headers().map_err(IngestError::Headers)?.clone();

        let mut seen = HashSet::new();
        if let Some(repeated) = headers.iter().find(|h| !seen.insert(*h)) {
            return Err(IngestError::DuplicateHeader(repeated.to_string()));
        }

        let mut rows = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|source| IngestError::Record { record: index + 1, source })?;
            rows.push(headers.iter().zip(record.iter()).collect::<RawRow>());
        }

        Ok(rows)
    }
}

/// Pick a delimiter from the file extension (`.tsv` is tab separated)
pub fn delimiter_for(path: &Path) -> u8 {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => b'\t',
        _ => b',',
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_follow_header() {
        let rows = CsvLoader::new()
            .parse_content("fecha,ingreso,gasto\n2024-01-15, 12500 ,8200\n2024-01-16,8900,5600\n")
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("ingreso"), "12500");
        assert_eq!(rows[1].get("gasto"), "5600");
    }

    #[test]
    fn short_records_read_as_empty() {
        let rows = CsvLoader::new().parse_content("fecha,ingreso,gasto\n2024-01-15,12500\n").unwrap();

        assert_eq!(rows[0].get("gasto"), "");
        assert!(!rows[0].contains("gasto"));
    }

    #[test]
    fn repeated_header_is_rejected() {
        let err = CsvLoader::new()
            .parse_content("fecha,ingreso,ingreso\n2024-01-15,12500,-300\n")
            .unwrap_err();

        assert!(matches!(err, IngestError::DuplicateHeader(ref column) if column == "ingreso"));
        assert!(err.to_string().contains("'ingreso'"));
    }

    #[test]
    fn quoted_amounts_keep_grouping() {
        let rows = CsvLoader::new().parse_content("monto\n\"$12,345.67\"\n").unwrap();
        assert_eq!(rows[0].get("monto"), "$12,345.67");
    }

    #[test]
    fn semicolon_delimiter() {
        let rows = CsvLoader::new()
            .with_delimiter(b';')
            .parse_content("fecha;monto\n2024-01-15;1500\n")
            .unwrap();
        assert_eq!(rows[0].get("monto"), "1500");
    }

    #[test]
    fn header_only_is_empty_batch() {
        assert!(CsvLoader::new().parse_content("fecha,ingreso\n").unwrap().is_empty());
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = CsvLoader::new().load_file(Path::new("/nonexistent/datos.csv")).unwrap_err();
        assert!(matches!(err, IngestError::Io { .. }));
    }

    #[test]
    fn tsv_extension() {
        assert_eq!(delimiter_for(Path::new("datos.tsv")), b'\t');
        assert_eq!(delimiter_for(Path::new("datos.csv")), b',');
    }
}
