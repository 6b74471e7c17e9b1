//! # Analysis Run
//!
//! Drives one fingerprinting analysis end to end:
//!
//! ```text
//! peak list ─┐
//!            ├─ normalize ─ match ─ filter ─┬─ match table
//! PSM table ─┘                               └─ plot data
//! ```
//!
//! An [`AnalysisRun`] owns its parameters, identifier and start time. Each
//! stage returns a new value, so nothing is shared between runs and a run
//! can be dropped between stages.
//!
//! ```rust,no_run
//! use mzfingerprint::prelude::*;
//!
//! let run = AnalysisRun::new(AnalysisParameters::default().with_ppm_tolerance(20.0))?;
//! let output = run.execute_files("maldi_peaks.csv", "psm.tsv")?;
//! output.export_matches("fingerprinting_results.csv", Delimiter::Comma)?;
//! println!("{}", output.summary);
//! # Ok::<(), mzfingerprint::run::RunError>(())
//! ```

mod error;
mod summary;

#[cfg(test)]
mod tests;

pub use error::{NoMatchesCause, NoMatchesError, RunError};
pub use summary::{RunSummary, TableCounts};

use std::path::Path;

use chrono::{DateTime, Utc};
use log::{info, warn};
use serde::Serialize;
use uuid::Uuid;

use crate::aggregate::{MassBinning, PlotData};
use crate::export::{self, ExportStats};
use crate::filter::ResultFilter;
use crate::input::{Delimiter, PeakTable, PsmTable, TableReader};
use crate::matcher::{Matcher, MatcherConfig};
use crate::params::AnalysisParameters;
use crate::records::MatchResult;

/// One configured analysis
#[derive(Debug, Clone)]
pub struct AnalysisRun {
    id: Uuid,
    started_at: DateTime<Utc>,
    params: AnalysisParameters,
}

/// Everything a successful run produces
#[derive(Debug, Clone)]
pub struct RunOutput {
    /// Final match table, in peak input order
    pub matches: Vec<MatchResult>,
    /// Plot-ready aggregates of `matches`
    pub plots: PlotData,
    /// Counts and settings
    pub summary: RunSummary,
}

/// JSON document written next to the match table
#[derive(Serialize)]
struct PlotReport<'a> {
    summary: &'a RunSummary,
    plots: &'a PlotData,
}

impl AnalysisRun {
    /// Create a run after validating `params`
    pub fn new(params: AnalysisParameters) -> Result<Self, RunError> {
        params.validate()?;
        let run = Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            params,
        };
        info!(
            "Analysis run {}: {} ppm, score >= {}, charges {} ({})",
            run.id,
            run.params.ppm_tolerance,
            run.params.score_threshold,
            run.params.accepted_charges,
            run.params.charge_filter_stage
        );
        Ok(run)
    }

    /// Run identifier
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Creation time
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Parameters of this run
    pub fn parameters(&self) -> &AnalysisParameters {
        &self.params
    }

    /// Reader for the peak list
    pub fn peak_reader(&self) -> TableReader {
        TableReader::peaks()
    }

    /// Reader for the PSM table, honouring a configured mass column
    pub fn psm_reader(&self) -> TableReader {
        match &self.params.psm_mass_column {
            Some(column) => TableReader::psms().with_mass_column(column.clone()),
            None => TableReader::psms(),
        }
    }

    /// Load and normalize a peak list
    pub fn load_peaks<P: AsRef<Path>>(&self, path: P) -> Result<PeakTable, RunError> {
        Ok(self.peak_reader().read_peaks_path(path)?)
    }

    /// Load and normalize a PSM table
    pub fn load_psms<P: AsRef<Path>>(&self, path: P) -> Result<PsmTable, RunError> {
        Ok(self.psm_reader().read_psms_path(path)?)
    }

    /// Match, filter and aggregate two normalized tables.
    ///
    /// Returns [`RunError::NoMatches`] when nothing survives filtering; the
    /// error carries the diagnosis and the full summary.
    pub fn execute(&self, peaks: &PeakTable, psms: &PsmTable) -> Result<RunOutput, RunError> {
        let binning = MassBinning::new(self.params.mass_bin_width)?;

        let matcher = Matcher::new(&psms.records, &MatcherConfig::from(&self.params), binning);
        let outcome = matcher.match_peaks(&peaks.records);
        let matches_before_filter = outcome.matches.len();

        let filtered = ResultFilter::from_parameters(&self.params).apply(outcome.matches);

        let summary = RunSummary {
            run_id: self.id,
            started_at: self.started_at,
            parameters: self.params.clone(),
            peaks: TableCounts::from(&peaks.report),
            psms: TableCounts::from(&psms.report),
            psms_indexed: outcome.psms_indexed,
            matches_before_filter,
            unmatched_peaks: outcome.unmatched_peaks,
            filter: filtered.counts(),
        };

        if filtered.retained.is_empty() {
            let cause = NoMatchesCause::diagnose(&summary);
            if cause.is_likely_misconfiguration() {
                warn!("No matches: {} (check inputs and charge settings)", cause);
            } else {
                warn!("No matches: {}", cause);
            }
            return Err(NoMatchesError {
                cause,
                summary: Box::new(summary),
            }
            .into());
        }

        let plots = PlotData::compute(&filtered.retained, &binning, self.params.error_binning);
        info!(
            "Run {} complete: {} matches retained",
            self.id,
            filtered.retained.len()
        );

        Ok(RunOutput {
            matches: filtered.retained,
            plots,
            summary,
        })
    }

    /// Load both tables from disk and execute
    pub fn execute_files<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        peaks_path: P,
        psms_path: Q,
    ) -> Result<RunOutput, RunError> {
        let peaks = self.load_peaks(peaks_path)?;
        let psms = self.load_psms(psms_path)?;
        self.execute(&peaks, &psms)
    }
}

impl RunOutput {
    /// Write the match table atomically
    pub fn export_matches<P: AsRef<Path>>(
        &self,
        path: P,
        delimiter: Delimiter,
    ) -> Result<ExportStats, RunError> {
        Ok(export::export_matches(path, &self.matches, delimiter)?)
    }

    /// Write the summary and plot data as JSON
    pub fn write_plot_data<P: AsRef<Path>>(&self, path: P) -> Result<(), RunError> {
        let report = PlotReport {
            summary: &self.summary,
            plots: &self.plots,
        };
        Ok(export::export_json(path, &report)?)
    }
}
