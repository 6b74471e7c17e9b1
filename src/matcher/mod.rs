//! # Tolerance Matcher
//!
//! Joins each peak to at most one PSM whose theoretical mass lies within a
//! symmetric ppm window:
//!
//! ```text
//! |peak.mass - psm.theoretical_mass| / psm.theoretical_mass * 1e6 <= ppm_tolerance
//! ```
//!
//! When several PSMs are eligible the winner is chosen by, in order:
//!
//! 1. smallest absolute ppm error
//! 2. highest confidence score
//! 3. earliest input row
//!
//! so identical input always yields identical output.
//!
//! PSMs are sorted once by theoretical mass and each peak only scans the
//! window located by binary search, bounding the cost to
//! O((P + S) log S) instead of O(P x S).
//!
//! With [`ChargeFilterStage::PreMatch`] the accepted-charge restriction is
//! applied while building the index, so excluded charges never take part
//! in the tie-break.

mod index;


pub use index::PsmIndex;

use std::cmp::Ordering;

use log::{debug, info};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::aggregate::MassBinning;
use crate::params::{AnalysisParameters, ChargeFilterStage, ChargeSet};
use crate::records::{ppm_error, MatchResult, PeakRecord, PsmRecord};

/// Progress is logged every this many peaks
const PROGRESS_INTERVAL: usize = 100;

/// Matcher settings
#[derive(Debug, Clone, PartialEq)]
pub struct MatcherConfig {
    /// Symmetric window in ppm of the theoretical mass
    pub ppm_tolerance: f64,
    /// Accepted charges
    pub accepted_charges: ChargeSet,
    /// Whether the charge restriction narrows the candidate pool
    pub charge_stage: ChargeFilterStage,
    /// Match on the rayon thread pool when the `parallel` feature is enabled
    pub parallel: bool,
}

impl MatcherConfig {
    /// Plain ppm matching with no charge restriction
    pub fn new(ppm_tolerance: f64) -> Self {
        Self {
            ppm_tolerance,
            accepted_charges: ChargeSet::any(),
            charge_stage: ChargeFilterStage::PreMatch,
            parallel: false,
        }
    }

    /// Restrict candidates to `charges` before tie-break
    pub fn with_charges(mut self, charges: ChargeSet) -> Self {
        self.accepted_charges = charges;
        self
    }
}

impl From<&AnalysisParameters> for MatcherConfig {
    fn from(params: &AnalysisParameters) -> Self {
        Self {
            ppm_tolerance: params.ppm_tolerance,
            accepted_charges: params.accepted_charges.clone(),
            charge_stage: params.charge_filter_stage,
            parallel: params.parallel,
        }
    }
}

/// Result of matching a peak list
#[derive(Debug, Clone, Default)]
pub struct MatchOutcome {
    /// One result per matched peak, in peak input order
    pub matches: Vec<MatchResult>,
    /// Peaks without any eligible candidate
    pub unmatched_peaks: usize,
    /// PSMs that took part in matching
    pub psms_indexed: usize,
}

/// A scored candidate for one peak
#[derive(Debug, Clone, Copy)]
struct Candidate<'a> {
    psm: &'a PsmRecord,
    error_ppm: f64,
}

impl Candidate<'_> {
    /// `Less` means `self` is the better match
    fn rank(&self, other: &Self) -> Ordering {
        self.error_ppm
            .abs()
            .total_cmp(&other.error_ppm.abs())
            .then_with(|| other.psm.confidence_score.total_cmp(&self.psm.confidence_score))
            .then_with(|| self.psm.row.cmp(&other.psm.row))
    }
}

/// Windowed nearest-mass matcher over one PSM table
#[derive(Debug, Clone)]
pub struct Matcher<'a> {
    index: PsmIndex<'a>,
    ppm_tolerance: f64,
    binning: MassBinning,
    parallel: bool,
}

impl<'a> Matcher<'a> {
    /// Build the PSM index for `config`
    pub fn new(psms: &'a [PsmRecord], config: &MatcherConfig, binning: MassBinning) -> Self {
        let index = match config.charge_stage {
            ChargeFilterStage::PreMatch if !config.accepted_charges.is_unrestricted() => {
                let index = PsmIndex::with_charges(psms, &config.accepted_charges);
                info!(
                    "Charge filter (pre-match, charges {}): {} of {} PSMs eligible",
                    config.accepted_charges,
                    index.len(),
                    psms.len()
                );
                index
            }
            _ => PsmIndex::new(psms),
        };

        Self {
            index,
            ppm_tolerance: config.ppm_tolerance,
            binning,
            parallel: config.parallel,
        }
    }

    /// Number of PSMs taking part in matching
    pub fn psm_count(&self) -> usize {
        self.index.len()
    }

    /// Best eligible PSM for `peak` and its signed ppm error
    pub fn best_match(&self, peak: &PeakRecord) -> Option<(&'a PsmRecord, f64)> {
        self.index
            .window(peak.mass, self.ppm_tolerance)
            .iter()
            .map(|&psm| Candidate {
                psm,
                error_ppm: ppm_error(peak.mass, psm.theoretical_mass),
            })
            .filter(|c| c.error_ppm.abs() <= self.ppm_tolerance)
            .min_by(|a, b| a.rank(b))
            .map(|c| (c.psm, c.error_ppm))
    }

    fn result_for(&self, peak: &PeakRecord) -> Option<MatchResult> {
        self.best_match(peak).map(|(psm, error_ppm)| MatchResult {
            peak: peak.clone(),
            psm: psm.clone(),
            mass_error_ppm: error_ppm,
            mass_bin: self.binning.lower_edge(peak.mass),
        })
    }

    /// Match every peak; output follows peak input order
    pub fn match_peaks(&self, peaks: &[PeakRecord]) -> MatchOutcome {
        info!(
            "Matching {} peaks against {} PSMs at {} ppm",
            peaks.len(),
            self.index.len(),
            self.ppm_tolerance
        );

        let selected = self.select_all(peaks);

        let matches: Vec<MatchResult> = selected.into_iter().flatten().collect();
        let unmatched_peaks = peaks.len() - matches.len();
        info!(
            "Matching complete: {} peaks matched, {} without a candidate",
            matches.len(),
            unmatched_peaks
        );

        MatchOutcome {
            matches,
            unmatched_peaks,
            psms_indexed: self.index.len(),
        }
    }

    #[cfg(feature = "parallel")]
    fn select_all(&self, peaks: &[PeakRecord]) -> Vec<Option<MatchResult>> {
        if self.parallel {
            debug!("Matching on {} rayon threads", rayon::current_num_threads());
            return peaks.par_iter().map(|peak| self.result_for(peak)).collect();
        }
        self.select_sequential(peaks)
    }

    #[cfg(not(feature = "parallel"))]
    fn select_all(&self, peaks: &[PeakRecord]) -> Vec<Option<MatchResult>> {
        if self.parallel {
            log::warn!("Parallel matching requested but built without the parallel feature; matching sequentially");
        }
        self.select_sequential(peaks)
    }

    fn select_sequential(&self, peaks: &[PeakRecord]) -> Vec<Option<MatchResult>> {
        let total = peaks.len();
        peaks
            .iter()
            .enumerate()
            .map(|(i, peak)| {
                if (i + 1) % PROGRESS_INTERVAL == 0 {
                    debug!("  - Processing peak {}/{}...", i + 1, total);
                }
                self.result_for(peak)
            })
            .collect()
    }
}
