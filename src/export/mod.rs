//! # Report Export
//!
//! Writes the final match table as delimited text with a fixed header, and
//! the plot data as JSON.
//!
//! Output is all-or-nothing: data goes to a temporary file in the
//! destination directory, which is moved over the destination only after
//! every row has been written and synced. A failure at any point leaves
//! the destination untouched.
//!
//! ## Columns
//!
//! | Column | Source |
//! |--------|--------|
//! | peak_row | input row of the peak |
//! | mass | observed peak mass |
//! | intensity | peak intensity (optional) |
//! | pixel_x, pixel_y, pixel_z, spot | spatial coordinates (optional) |
//! | psm_row | input row of the PSM |
//! | peptide_sequence | PSM peptide |
//! | protein | PSM protein (optional) |
//! | theoretical_mass | PSM mass |
//! | charge_state | PSM charge |
//! | confidence_score | PSM score |
//! | mass_error_ppm | signed ppm error |
//! | mass_bin | lower edge of the mass bin |
//!
//! Floats are written in their shortest round-trip representation.

mod error;

#[cfg(test)]
mod tests;

pub use error::ExportError;

use std::fmt;
use std::fs;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use log::info;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::input::Delimiter;
use crate::records::{MatchResult, PeakRecord, PsmRecord, SpatialCoordinates};

/// Header of the exported match table, in column order
pub const EXPORT_COLUMNS: [&str; 15] = [
    "peak_row",
    "mass",
    "intensity",
    "pixel_x",
    "pixel_y",
    "pixel_z",
    "spot",
    "psm_row",
    "peptide_sequence",
    "protein",
    "theoretical_mass",
    "charge_state",
    "confidence_score",
    "mass_error_ppm",
    "mass_bin",
];

/// Flat row layout; field order must match [`EXPORT_COLUMNS`]
#[derive(Debug, Serialize, Deserialize)]
struct ExportRow {
    peak_row: usize,
    mass: f64,
    intensity: Option<f64>,
    pixel_x: Option<String>,
    pixel_y: Option<String>,
    pixel_z: Option<String>,
    spot: Option<String>,
    psm_row: usize,
    peptide_sequence: String,
    protein: Option<String>,
    theoretical_mass: f64,
    charge_state: i32,
    confidence_score: f64,
    mass_error_ppm: f64,
    mass_bin: f64,
}

impl From<&MatchResult> for ExportRow {
    fn from(r: &MatchResult) -> Self {
        let coords = r.peak.spatial_coordinates.clone().unwrap_or_default();
        Self {
            peak_row: r.peak.row,
            mass: r.peak.mass,
            intensity: r.peak.intensity,
            pixel_x: coords.x,
            pixel_y: coords.y,
            pixel_z: coords.z,
            spot: coords.spot,
            psm_row: r.psm.row,
            peptide_sequence: r.psm.peptide_sequence.clone(),
            protein: r.psm.protein.clone(),
            theoretical_mass: r.psm.theoretical_mass,
            charge_state: r.psm.charge_state,
            confidence_score: r.psm.confidence_score,
            mass_error_ppm: r.mass_error_ppm,
            mass_bin: r.mass_bin,
        }
    }
}

impl From<ExportRow> for MatchResult {
    fn from(row: ExportRow) -> Self {
        let coords = SpatialCoordinates {
            x: row.pixel_x,
            y: row.pixel_y,
            z: row.pixel_z,
            spot: row.spot,
        };
        MatchResult {
            peak: PeakRecord {
                row: row.peak_row,
                mass: row.mass,
                intensity: row.intensity,
                spatial_coordinates: (!coords.is_empty()).then_some(coords),
            },
            psm: PsmRecord {
                row: row.psm_row,
                peptide_sequence: row.peptide_sequence,
                theoretical_mass: row.theoretical_mass,
                charge_state: row.charge_state,
                confidence_score: row.confidence_score,
                protein: row.protein,
            },
            mass_error_ppm: row.mass_error_ppm,
            mass_bin: row.mass_bin,
        }
    }
}

/// Statistics from a completed export
#[derive(Debug, Clone)]
pub struct ExportStats {
    /// Destination file
    pub path: PathBuf,
    /// Data rows written (excluding the header)
    pub rows_written: usize,
    /// File size in bytes
    pub file_size_bytes: u64,
}

impl fmt::Display for ExportStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Wrote {} matches to {} ({} bytes)",
            self.rows_written,
            self.path.display(),
            self.file_size_bytes
        )
    }
}

/// Write the match table to any writer
pub fn write_matches<W: Write>(
    writer: W,
    results: &[MatchResult],
    delimiter: Delimiter,
) -> Result<(), ExportError> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(delimiter.as_byte())
        .has_headers(false)
        .from_writer(writer);

    wtr.write_record(EXPORT_COLUMNS)?;
    for result in results {
        wtr.serialize(ExportRow::from(result))?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Read a table previously written by [`write_matches`]
pub fn read_matches<R: Read>(reader: R, delimiter: Delimiter) -> Result<Vec<MatchResult>, ExportError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter.as_byte())
        .has_headers(true)
        .from_reader(reader);

    let headers = rdr.headers()?;
    if !headers.iter().eq(EXPORT_COLUMNS.iter().copied()) {
        return Err(ExportError::Header(headers.iter().collect::<Vec<_>>().join(",")));
    }

    rdr.deserialize::<ExportRow>()
        .map(|row| Ok(MatchResult::from(row?)))
        .collect()
}

/// Atomically write the match table to `path`
pub fn export_matches<P: AsRef<Path>>(
    path: P,
    results: &[MatchResult],
    delimiter: Delimiter,
) -> Result<ExportStats, ExportError> {
    let path = path.as_ref();
    write_atomic(path, |file| write_matches(BufWriter::new(file), results, delimiter))?;

    let stats = ExportStats {
        path: path.to_path_buf(),
        rows_written: results.len(),
        file_size_bytes: fs::metadata(path).map(|m| m.len()).unwrap_or(0),
    };
    info!("{}", stats);
    Ok(stats)
}

/// Atomically write any serializable value as pretty JSON
pub fn export_json<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> Result<(), ExportError> {
    let path = path.as_ref();
    write_atomic(path, |file| {
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, value)?;
        writer.write_all(b"\n").map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        writer.flush().map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })
    })?;
    info!("Wrote {}", path.display());
    Ok(())
}

fn write_atomic<F>(path: &Path, write: F) -> Result<(), ExportError>
where
    F: FnOnce(&mut fs::File) -> Result<(), ExportError>,
{
    let io_err = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
    write(tmp.as_file_mut())?;
    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(path).map_err(|e| ExportError::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}
