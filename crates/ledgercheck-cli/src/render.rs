//! Console and Markdown rendering of batch reports

use colored::Colorize;
use ledgercheck_core::{BatchReport, BatchSchema, ColumnSchema, ColumnStatus, ValidationIssue};

/// Rows of the invalid records table shown before truncating
const MAX_LISTED_ISSUES: usize = 20;

fn status_marker(status: ColumnStatus) -> colored::ColoredString {
    match status {
        ColumnStatus::Detected => "✓".green(),
        ColumnStatus::Partial => "!".yellow(),
        ColumnStatus::Missing => "✗".red(),
    }
}

/// Reports written before labels were stored carry an empty `error`
fn error_label(issue: &ValidationIssue) -> &str {
    if issue.error.is_empty() {
        issue.kind.label()
    } else {
        &issue.error
    }
}

fn column_line(column: &ColumnSchema) -> String {
    format!(
        "  {} {:<20} {:<9} {:<10} {:>4}%",
        status_marker(column.status),
        column.name,
        column.inferred_type.to_string(),
        column.status.label(),
        column.confidence_percent()
    )
}

/// Print the column detection table
pub fn print_schema(schema: &BatchSchema) {
    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{}", "Detección de Columnas".bold().bright_blue());
    println!("{}", "=".repeat(60).bright_blue());
    println!();

    if schema.is_empty() {
        println!("{}", "No columns found".yellow());
    }
    for column in schema.columns() {
        println!("{}", column_line(column));
    }

    println!();
    println!("{}", "=".repeat(60).bright_blue());
}

/// Print report summary to stdout
pub fn print_report_summary(report: &BatchReport) {
    let summary = &report.summary;

    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{}", "Procesamiento de Datos".bold().bright_blue());
    println!("{}", "=".repeat(60).bright_blue());
    println!();

    println!("Source: {}", report.source);
    println!("Version: {}", report.version);
    println!("Timestamp: {}", report.timestamp);
    println!("Tiempo de procesamiento: {} ms", report.processing_ms);
    println!();

    println!("{}", "Summary:".bold());
    println!("  Total registros:     {}", summary.total_records);
    println!(
        "  Registros válidos:   {} ({:.1}%)",
        summary.valid_records.to_string().green(),
        summary.valid_percentage()
    );

    if summary.invalid_records > 0 {
        println!(
            "  Registros inválidos: {} ({:.1}%)",
            summary.invalid_records.to_string().red().bold(),
            summary.invalid_percentage()
        );
    } else {
        println!("  Registros inválidos: {}", summary.invalid_records.to_string().green());
    }

    println!("  Columnas faltantes:  {}", summary.missing_columns.to_string().yellow());
    println!("  Duplicados:          {}", summary.duplicate_records);
    println!();

    if !report.columns.is_empty() {
        println!("{}", "Columns:".bold());
        for column in &report.columns {
            println!("{}", column_line(column));
        }
        println!();
    }

    if report.issues.is_empty() {
        println!("{}", "✓ No issues found!".green().bold());
    } else {
        println!("{}", "Registros inválidos:".bold());
        for issue in report.issues.iter().take(MAX_LISTED_ISSUES) {
            println!(
                "  [{}] row {} {}: {}",
                issue.kind.as_str().red().bold(),
                issue.row_index,
                issue.field,
                error_label(issue)
            );
            println!("    Valor:      {:?}", issue.raw_value);
            println!("    Sugerencia: {}", issue.suggestion);
        }
        if report.issues.len() > MAX_LISTED_ISSUES {
            println!("  ... showing {} of {} issues", MAX_LISTED_ISSUES, report.issues.len());
        }
    }

    println!();
    println!("{}", "=".repeat(60).bright_blue());
}

/// Generate markdown report
pub fn generate_markdown_report(report: &BatchReport) -> String {
    let summary = &report.summary;
    let mut md = String::new();

    md.push_str("# Procesamiento de Datos\n\n");
    md.push_str(&format!("**Source:** {}\n\n", report.source));
    md.push_str(&format!("**Version:** {}\n\n", report.version));
    md.push_str(&format!("**Timestamp:** {}\n\n", report.timestamp));
    md.push_str(&format!("**Fingerprint:** `{}`\n\n", report.fingerprint));
    md.push_str(&format!("**Tiempo de procesamiento:** {} ms\n\n", report.processing_ms));

    md.push_str("## Resumen\n\n");
    md.push_str(&format!("- Total registros: {}\n", summary.total_records));
    md.push_str(&format!(
        "- Registros válidos: {} ({:.1}%)\n",
        summary.valid_records,
        summary.valid_percentage()
    ));
    md.push_str(&format!(
        "- Registros inválidos: {} ({:.1}%)\n",
        summary.invalid_records,
        summary.invalid_percentage()
    ));
    md.push_str(&format!("- Columnas faltantes: {}\n", summary.missing_columns));
    md.push_str(&format!("- Duplicados detectados: {}\n", summary.duplicate_records));
    md.push('\n');

    if !report.columns.is_empty() {
        md.push_str("## Detección de Columnas\n\n");
        md.push_str("| Columna | Tipo Detectado | Estado | Confianza |\n");
        md.push_str("|---|---|---|---:|\n");
        for column in &report.columns {
            md.push_str(&format!(
                "| {} | {} | {} | {}% |\n",
                column.name,
                column.inferred_type,
                column.status.label(),
                column.confidence_percent()
            ));
        }
        md.push('\n');
    }

    if report.issues.is_empty() {
        md.push_str("✅ **No issues found!**\n");
    } else {
        md.push_str("## Registros Inválidos\n\n");
        md.push_str("| Fila | Error | Campo | Valor | Sugerencia |\n");
        md.push_str("|---:|---|---|---|---|\n");
        for issue in &report.issues {
            md.push_str(&format!(
                "| {} | {} | {} | `{}` | {} |\n",
                issue.row_index,
                error_label(issue),
                issue.field,
                issue.raw_value.replace('|', "\\|"),
                issue.suggestion
            ));
        }
    }

    md
}
