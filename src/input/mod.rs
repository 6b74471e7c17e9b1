//! # Table Input
//!
//! Reads peak lists and PSM tables from delimited text, resolves their
//! headers through [`crate::schema`] and parses every row into canonical
//! records.
//!
//! Header problems abort the read with [`IngestError::Schema`]. Row
//! problems never abort: a row whose cells cannot be coerced is dropped and
//! recorded as a [`MalformedRow`] in the table's [`IngestReport`], so no
//! input row disappears without being counted.
//!
//! ```rust,no_run
//! use mzfingerprint::input::TableReader;
//!
//! let peaks = TableReader::peaks().read_peaks_path("maldi_peaks.csv")?;
//! println!("{} peaks, {} malformed rows", peaks.records.len(), peaks.report.malformed_count());
//! # Ok::<(), mzfingerprint::input::IngestError>(())
//! ```

mod delimiter;
mod error;
pub mod parse;

#[cfg(test)]
mod tests;

pub use delimiter::Delimiter;
pub use error::IngestError;

use std::borrow::Cow;
use std::fmt;
use std::fs;
use std::io::Read;
use std::path::Path;

use csv::{ByteRecord, StringRecord};
use log::{debug, info, warn};
use serde::Serialize;

use crate::records::{PeakRecord, PsmRecord, SpatialCoordinates};
use crate::schema::{CanonicalField, ColumnMap, ColumnResolver, TableKind};
use parse::{
    optional_text, parse_charge, parse_f64, parse_optional_f64, parse_positive_f64, CellError,
};

/// Number of malformed rows logged individually before the rest are only counted
const MALFORMED_LOG_LIMIT: usize = 5;

/// A data row that was dropped because a cell could not be coerced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MalformedRow {
    /// Table the row belongs to
    pub table: TableKind,
    /// 1-based line number in the input (the header is line 1)
    pub line: u64,
    /// Field that failed, if the failure is tied to one column
    pub field: Option<CanonicalField>,
    /// Raw cell value
    pub value: String,
    /// Failure reason
    pub reason: String,
}

impl fmt::Display for MalformedRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.field {
            Some(field) => write!(
                f,
                "{} line {}: {} = {:?}: {}",
                self.table, self.line, field, self.value, self.reason
            ),
            None => write!(f, "{} line {}: {}", self.table, self.line, self.reason),
        }
    }
}

/// Outcome of reading one table
#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    /// Table kind
    pub table: TableKind,
    /// Delimiter used
    pub delimiter: Delimiter,
    /// Header resolution
    pub columns: ColumnMap,
    /// Data rows read (excluding the header)
    pub rows_read: usize,
    /// Rows turned into records
    pub rows_accepted: usize,
    /// Rows dropped, with reasons
    pub malformed: Vec<MalformedRow>,
}

impl IngestReport {
    /// Number of dropped rows
    pub fn malformed_count(&self) -> usize {
        self.malformed.len()
    }
}

impl fmt::Display for IngestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} rows read, {} accepted, {} malformed ({}-delimited)",
            self.table,
            self.rows_read,
            self.rows_accepted,
            self.malformed.len(),
            self.delimiter
        )
    }
}

/// A normalized peak list
#[derive(Debug, Clone)]
pub struct PeakTable {
    /// Parsed peaks in input order
    pub records: Vec<PeakRecord>,
    /// Parse report
    pub report: IngestReport,
}

/// A normalized PSM table
#[derive(Debug, Clone)]
pub struct PsmTable {
    /// Parsed PSMs in input order
    pub records: Vec<PsmRecord>,
    /// Parse report
    pub report: IngestReport,
}

/// Reader for one kind of input table
#[derive(Debug, Clone)]
pub struct TableReader {
    resolver: ColumnResolver,
    delimiter: Option<Delimiter>,
}

impl TableReader {
    /// Reader for a MALDI peak list
    pub fn peaks() -> Self {
        Self::new(ColumnResolver::new(TableKind::Peaks))
    }

    /// Reader for a DDA PSM table
    pub fn psms() -> Self {
        Self::new(ColumnResolver::new(TableKind::Psms))
    }

    /// Reader using a custom resolver
    pub fn new(resolver: ColumnResolver) -> Self {
        Self {
            resolver,
            delimiter: None,
        }
    }

    /// Use a fixed delimiter instead of inferring it
    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Bind the PSM theoretical mass to a specific column
    pub fn with_mass_column(mut self, header: impl Into<String>) -> Self {
        self.resolver = self
            .resolver
            .with_override(CanonicalField::TheoreticalMass, header);
        self
    }

    /// Table kind handled by this reader
    pub fn table(&self) -> TableKind {
        self.resolver.table()
    }

    /// Read a peak list from a file
    pub fn read_peaks_path<P: AsRef<Path>>(&self, path: P) -> Result<PeakTable, IngestError> {
        let path = path.as_ref();
        let content = read_bytes(path)?;
        let delimiter = self.delimiter_for(Some(path), &content);
        info!("Loading peak list {} ({} delimited)", path.display(), delimiter);
        self.parse_peaks(&content, delimiter)
    }

    /// Read a PSM table from a file
    pub fn read_psms_path<P: AsRef<Path>>(&self, path: P) -> Result<PsmTable, IngestError> {
        let path = path.as_ref();
        let content = read_bytes(path)?;
        let delimiter = self.delimiter_for(Some(path), &content);
        info!("Loading PSM table {} ({} delimited)", path.display(), delimiter);
        self.parse_psms(&content, delimiter)
    }

    /// Read a peak list from any reader; the delimiter is sniffed unless fixed
    pub fn read_peaks<R: Read>(&self, mut reader: R) -> Result<PeakTable, IngestError> {
        let mut content = Vec::new();
        reader.read_to_end(&mut content)?;
        let delimiter = self.delimiter_for(None, &content);
        self.parse_peaks(&content, delimiter)
    }

    /// Read a PSM table from any reader; the delimiter is sniffed unless fixed
    pub fn read_psms<R: Read>(&self, mut reader: R) -> Result<PsmTable, IngestError> {
        let mut content = Vec::new();
        reader.read_to_end(&mut content)?;
        let delimiter = self.delimiter_for(None, &content);
        self.parse_psms(&content, delimiter)
    }

    /// Resolve only the header of a table, for inspection
    pub fn resolve_header(&self, content: &[u8], delimiter: Delimiter) -> Result<ColumnMap, IngestError> {
        let mut reader = csv_reader(content, delimiter);
        let headers = header_names(reader.byte_headers()?);
        Ok(self.resolver.resolve(headers.as_slice())?)
    }

    /// Delimiter for `content`, honouring an explicit setting
    pub fn delimiter_for(&self, path: Option<&Path>, content: &[u8]) -> Delimiter {
        self.delimiter
            .unwrap_or_else(|| Delimiter::detect(path, &first_line(content)))
    }

    fn parse_peaks(&self, content: &[u8], delimiter: Delimiter) -> Result<PeakTable, IngestError> {
        let mut sink = RowSink::default();
        let (columns, rows_read) = self.parse_rows(content, delimiter, &mut sink, peak_from_record)?;
        let report = sink.finish(TableKind::Peaks, delimiter, columns, rows_read);
        Ok(PeakTable {
            records: sink.records,
            report,
        })
    }

    fn parse_psms(&self, content: &[u8], delimiter: Delimiter) -> Result<PsmTable, IngestError> {
        let mut sink = RowSink::default();
        let (columns, rows_read) = self.parse_rows(content, delimiter, &mut sink, psm_from_record)?;
        let report = sink.finish(TableKind::Psms, delimiter, columns, rows_read);
        Ok(PsmTable {
            records: sink.records,
            report,
        })
    }

    fn parse_rows<T, F>(
        &self,
        content: &[u8],
        delimiter: Delimiter,
        sink: &mut RowSink<T>,
        convert: F,
    ) -> Result<(ColumnMap, usize), IngestError>
    where
        F: Fn(&ColumnMap, &StringRecord, usize) -> Result<T, RowFault>,
    {
        let table = self.table();
        let mut reader = csv_reader(content, delimiter);

        let headers = header_names(reader.byte_headers()?);
        let columns = self.resolver.resolve(headers.as_slice())?;

        let mut rows_read = 0usize;
        for (row, result) in reader.byte_records().enumerate() {
            rows_read += 1;
            // header is line 1, first data row line 2
            let fallback_line = row as u64 + 2;
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    let line = e.position().map_or(fallback_line, |p| p.line());
                    sink.reject(MalformedRow {
                        table,
                        line,
                        field: None,
                        value: String::new(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            let line = record.position().map_or(fallback_line, |p| p.line());
            let record = match StringRecord::from_byte_record(record) {
                Ok(record) => record,
                Err(e) => {
                    let index = e.utf8_error().field();
                    let reason = e.to_string();
                    let value = e
                        .into_byte_record()
                        .get(index)
                        .map(|cell| String::from_utf8_lossy(cell).into_owned())
                        .unwrap_or_default();
                    sink.reject(MalformedRow {
                        table,
                        line,
                        field: columns.field_at(index),
                        value,
                        reason,
                    });
                    continue;
                }
            };

            match convert(&columns, &record, row) {
                Ok(item) => sink.records.push(item),
                Err(fault) => sink.reject(MalformedRow {
                    table,
                    line,
                    field: Some(fault.field),
                    value: fault.value,
                    reason: fault.error.to_string(),
                }),
            }
        }

        Ok((columns, rows_read))
    }
}

fn read_bytes(path: &Path) -> Result<Vec<u8>, IngestError> {
    fs::read(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// First line of the input, for delimiter sniffing
fn first_line(content: &[u8]) -> Cow<'_, str> {
    let end = content
        .iter()
        .position(|&b| b == b'\n')
        .unwrap_or(content.len());
    String::from_utf8_lossy(&content[..end])
}

/// Header cells as text, decoded lossily
fn header_names(headers: &ByteRecord) -> Vec<String> {
    headers
        .iter()
        .map(|cell| String::from_utf8_lossy(cell).into_owned())
        .collect()
}

fn csv_reader(content: &[u8], delimiter: Delimiter) -> csv::Reader<&[u8]> {
    csv::ReaderBuilder::new()
        .delimiter(delimiter.as_byte())
        .flexible(true)
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(content)
}

/// A cell-level failure while converting one row
struct RowFault {
    field: CanonicalField,
    value: String,
    error: CellError,
}

struct RowSink<T> {
    records: Vec<T>,
    malformed: Vec<MalformedRow>,
}

impl<T> Default for RowSink<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            malformed: Vec::new(),
        }
    }
}

impl<T> RowSink<T> {
    fn reject(&mut self, row: MalformedRow) {
        if self.malformed.len() < MALFORMED_LOG_LIMIT {
            warn!("Dropping malformed row: {}", row);
        } else {
            debug!("Dropping malformed row: {}", row);
        }
        self.malformed.push(row);
    }

    fn finish(
        &mut self,
        table: TableKind,
        delimiter: Delimiter,
        columns: ColumnMap,
        rows_read: usize,
    ) -> IngestReport {
        let report = IngestReport {
            table,
            delimiter,
            columns,
            rows_read,
            rows_accepted: self.records.len(),
            malformed: std::mem::take(&mut self.malformed),
        };
        if report.malformed_count() > MALFORMED_LOG_LIMIT {
            warn!(
                "{}: {} further malformed rows not shown",
                table,
                report.malformed_count() - MALFORMED_LOG_LIMIT
            );
        }
        info!("-> {}", report);
        report
    }
}

fn cell<'r>(columns: &ColumnMap, record: &'r StringRecord, field: CanonicalField) -> Option<&'r str> {
    columns.index_of(field).and_then(|i| record.get(i))
}

fn required<T>(
    columns: &ColumnMap,
    record: &StringRecord,
    field: CanonicalField,
    parse: fn(&str) -> Result<T, CellError>,
) -> Result<T, RowFault> {
    let raw = cell(columns, record, field).unwrap_or_default();
    parse(raw).map_err(|error| RowFault {
        field,
        value: raw.to_string(),
        error,
    })
}

fn optional_number(
    columns: &ColumnMap,
    record: &StringRecord,
    field: CanonicalField,
) -> Result<Option<f64>, RowFault> {
    let raw = cell(columns, record, field);
    parse_optional_f64(raw).map_err(|error| RowFault {
        field,
        value: raw.unwrap_or_default().to_string(),
        error,
    })
}

fn peak_from_record(columns: &ColumnMap, record: &StringRecord, row: usize) -> Result<PeakRecord, RowFault> {
    let mass = required(columns, record, CanonicalField::Mass, parse_positive_f64)?;
    let intensity = optional_number(columns, record, CanonicalField::Intensity)?;

    let coordinates = SpatialCoordinates {
        x: optional_text(cell(columns, record, CanonicalField::PixelX)),
        y: optional_text(cell(columns, record, CanonicalField::PixelY)),
        z: optional_text(cell(columns, record, CanonicalField::PixelZ)),
        spot: optional_text(cell(columns, record, CanonicalField::Spot)),
    };

    Ok(PeakRecord {
        row,
        mass,
        intensity,
        spatial_coordinates: (!coordinates.is_empty()).then_some(coordinates),
    })
}

fn psm_from_record(columns: &ColumnMap, record: &StringRecord, row: usize) -> Result<PsmRecord, RowFault> {
    let theoretical_mass = required(columns, record, CanonicalField::TheoreticalMass, parse_positive_f64)?;
    let confidence_score = required(columns, record, CanonicalField::ConfidenceScore, parse_f64)?;

    // An absent or blank charge is unknown (0)
    let charge_state = match optional_text(cell(columns, record, CanonicalField::ChargeState)) {
        Some(raw) => parse_charge(&raw).map_err(|error| RowFault {
            field: CanonicalField::ChargeState,
            value: raw.clone(),
            error,
        })?,
        None => 0,
    };

    Ok(PsmRecord {
        row,
        peptide_sequence: optional_text(cell(columns, record, CanonicalField::PeptideSequence))
            .unwrap_or_default(),
        theoretical_mass,
        charge_state,
        confidence_score,
        protein: optional_text(cell(columns, record, CanonicalField::Protein)),
    })
}
