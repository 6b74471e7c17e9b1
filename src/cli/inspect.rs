use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use mzfingerprint::input::{IngestReport, TableReader};
use mzfingerprint::schema::TableKind;

/// Malformed rows listed before the rest are summarized
const MALFORMED_SHOWN: usize = 10;

/// Display how a table's header resolves onto the canonical schema
pub fn run(file: PathBuf, kind: TableKind, psm_mass_column: Option<String>) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let report = match kind {
        TableKind::Peaks => {
            TableReader::peaks()
                .read_peaks_path(&file)
                .with_context(|| format!("Failed to read peak list {}", file.display()))?
                .report
        }
        TableKind::Psms => {
            let reader = match psm_mass_column {
                Some(column) => TableReader::psms().with_mass_column(column),
                None => TableReader::psms(),
            };
            reader
                .read_psms_path(&file)
                .with_context(|| format!("Failed to read PSM table {}", file.display()))?
                .report
        }
    };

    print_report(&file, &report);
    Ok(())
}

fn print_report(file: &Path, report: &IngestReport) {
    println!("mzfingerprint Table Inspection");
    println!("==============================");
    println!("File: {}", file.display());
    println!("Table: {}", report.table);
    println!("Delimiter: {}", report.delimiter);
    println!();

    println!("Resolved Columns:");
    for field in report.table.fields() {
        match report.columns.binding(*field) {
            Some(b) => println!(
                "  {:<18} <- column {:3} {:?} (via {:?})",
                field.name(),
                b.index + 1,
                b.header,
                b.matched
            ),
            None => println!("  {:<18} <- (not present)", field.name()),
        }
    }
    if !report.columns.ignored.is_empty() {
        println!();
        println!("Ignored Columns:");
        for header in &report.columns.ignored {
            println!("  {:?}", header);
        }
    }
    println!();

    println!("Rows:");
    println!("  Read: {}", report.rows_read);
    println!("  Valid: {}", report.rows_accepted);
    println!("  Malformed: {}", report.malformed_count());
    for row in report.malformed.iter().take(MALFORMED_SHOWN) {
        println!("    {}", row);
    }
    if report.malformed_count() > MALFORMED_SHOWN {
        println!("    ... and {} more", report.malformed_count() - MALFORMED_SHOWN);
    }
}
