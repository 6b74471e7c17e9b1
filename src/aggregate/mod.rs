//! # Result Aggregation
//!
//! Derived views of the final match table for plotting and reporting:
//!
//! - **Mass error distribution**: ordered ppm errors and a binned
//!   [`ErrorHistogram`]
//! - **Score vs. error**: one [`ScoreErrorPoint`] per match
//! - **Identifications per mass bin**: [`MassBinCounts`] with explicit
//!   zero-count bins so downstream histograms stay uniform
//!
//! Every view is a pure function of the match slice; none of them mutate or
//! share state, so they can be computed in any order.

mod bins;
mod histogram;


pub use bins::{identifications_per_mass_bin, MassBinCount, MassBinCounts, MassBinning};
pub use histogram::{ErrorHistogram, HistogramBin};

use serde::{Deserialize, Serialize};

use crate::params::{AnalysisParameters, HistogramBinning, ParameterError};
use crate::records::MatchResult;

/// Widest span, in bins, that is listed with its empty bins
pub const MAX_DENSE_BINS: usize = 100_000;

/// Mass error and score of one match
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreErrorPoint {
    /// Signed mass error in ppm
    pub mass_error_ppm: f64,
    /// Confidence score of the selected PSM
    pub confidence_score: f64,
}

/// Mass errors in match order
pub fn mass_errors(results: &[MatchResult]) -> Vec<f64> {
    results.iter().map(|r| r.mass_error_ppm).collect()
}

/// `(mass_error_ppm, confidence_score)` per match, in match order
pub fn score_error_pairs(results: &[MatchResult]) -> Vec<ScoreErrorPoint> {
    results
        .iter()
        .map(|r| ScoreErrorPoint {
            mass_error_ppm: r.mass_error_ppm,
            confidence_score: r.confidence_score(),
        })
        .collect()
}

/// All plot-ready views of one result set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlotData {
    /// Mass errors (ppm) in match order
    pub mass_errors: Vec<f64>,
    /// Binned mass errors
    pub error_histogram: ErrorHistogram,
    /// Score vs. mass error scatter points
    pub score_vs_error: Vec<ScoreErrorPoint>,
    /// Identifications per mass bin
    pub identifications_per_bin: MassBinCounts,
}

impl PlotData {
    /// Compute every view from the same result set
    pub fn compute(
        results: &[MatchResult],
        binning: &MassBinning,
        error_binning: HistogramBinning,
    ) -> Self {
        let mass_errors = mass_errors(results);
        Self {
            error_histogram: ErrorHistogram::compute(&mass_errors, error_binning),
            mass_errors,
            score_vs_error: score_error_pairs(results),
            identifications_per_bin: identifications_per_mass_bin(results, binning, None),
        }
    }

    /// Compute using the binning configured in `params`
    pub fn from_parameters(
        results: &[MatchResult],
        params: &AnalysisParameters,
    ) -> Result<Self, ParameterError> {
        params.error_binning.validate()?;
        let binning = MassBinning::new(params.mass_bin_width)?;
        Ok(Self::compute(results, &binning, params.error_binning))
    }
}
