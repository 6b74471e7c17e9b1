//! # mzfingerprint - Spatial Mass Fingerprinting
//!
//! `mzfingerprint` links peaks from a MALDI imaging experiment to peptide
//! identifications from a DDA LC-MS/MS search by accurate mass, so spatially
//! resolved signals can be annotated with peptides.
//!
//! ## Key Features
//!
//! - **Schema Normalization**: Peak lists and PSM tables from different
//!   tools are mapped onto one canonical schema through an explicit synonym
//!   table, with strict validation of required columns.
//!
//! - **Tolerance Matching**: Every peak is joined to at most one PSM within a
//!   symmetric ppm window, chosen by smallest error, then highest score,
//!   then input order. PSMs are indexed by mass so each peak only scans its
//!   own window.
//!
//! - **Score/Charge Filtering**: Inclusive score threshold and an accepted
//!   charge set, applied before or after candidate selection.
//!
//! - **Aggregation**: Mass error histogram, score vs. error scatter and
//!   identification counts per mass bin, ready for plotting.
//!
//! - **Atomic Export**: Delimited match table and JSON plot data, written
//!   all-or-nothing.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mzfingerprint::prelude::*;
//!
//! let params = AnalysisParameters::default()
//!     .with_ppm_tolerance(10.0)
//!     .with_score_threshold(18.0)
//!     .with_charges("1,2".parse::<ChargeSet>()?);
//!
//! let run = AnalysisRun::new(params)?;
//! let peaks = run.load_peaks("maldi_peaks.csv")?;
//! let psms = run.load_psms("psm.tsv")?;
//!
//! match run.execute(&peaks, &psms) {
//!     Ok(output) => {
//!         output.export_matches("fingerprinting_results.csv", Delimiter::Comma)?;
//!         println!("{}", output.summary);
//!     }
//!     Err(RunError::NoMatches(e)) => eprintln!("{}", e),
//!     Err(e) => return Err(e.into()),
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! The library is organized into the following modules:
//!
//! - [`schema`]: Canonical fields, header synonyms and column resolution
//! - [`input`]: Delimited table reading and explicit numeric parsing
//! - [`records`]: Canonical peak, PSM and match records
//! - [`params`]: Analysis parameters and their validation
//! - [`matcher`]: Windowed ppm matching with deterministic tie-break
//! - [`filter`]: Score and charge filtering of selected matches
//! - [`aggregate`]: Plot-ready views of a result set
//! - [`export`]: Atomic CSV/TSV and JSON output
//! - [`run`]: One analysis run end to end, with its summary
//!
//! ## Mass Error
//!
//! All errors are relative to the theoretical mass of the PSM:
//!
//! ```text
//! mass_error_ppm = (peak.mass - psm.theoretical_mass) / psm.theoretical_mass * 1e6
//! ```

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod aggregate;
pub mod export;
pub mod filter;
pub mod input;
pub mod matcher;
pub mod params;
pub mod records;
pub mod run;
pub mod schema;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::aggregate::{ErrorHistogram, MassBinCounts, MassBinning, PlotData, ScoreErrorPoint};
    pub use crate::export::{export_json, export_matches, read_matches, ExportError, ExportStats};
    pub use crate::filter::{FilterOutcome, ResultFilter};
    pub use crate::input::{Delimiter, IngestError, IngestReport, PeakTable, PsmTable, TableReader};
    pub use crate::matcher::{MatchOutcome, Matcher, MatcherConfig};
    pub use crate::params::{
        AnalysisParameters, ChargeFilterStage, ChargeSet, HistogramBinning, ParameterError,
    };
    pub use crate::records::{ppm_error, MatchResult, PeakRecord, PsmRecord, SpatialCoordinates};
    pub use crate::run::{AnalysisRun, NoMatchesCause, NoMatchesError, RunError, RunOutput, RunSummary};
    pub use crate::schema::{CanonicalField, ColumnMap, ColumnResolver, SchemaError, TableKind};
}
