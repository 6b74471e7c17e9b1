//! Score and charge filtering of selected matches.
//!
//! The score threshold is applied after selection and is inclusive: a match
//! whose score equals the threshold is kept. It never re-selects among the
//! candidates that lost the tie-break. The charge restriction is applied
//! here only when the run is configured for
//! [`ChargeFilterStage::PostMatch`]; in the default pre-match stage the
//! matcher has already removed excluded charges from the candidate pool.

use log::info;
use serde::{Deserialize, Serialize};

use crate::params::{AnalysisParameters, ChargeFilterStage, ChargeSet};
use crate::records::MatchResult;

/// Post-selection filter
#[derive(Debug, Clone, PartialEq)]
pub struct ResultFilter {
    score_threshold: f64,
    post_match_charges: Option<ChargeSet>,
}

/// Filtered matches and rejection counts
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOutcome {
    /// Surviving matches, in their original order and unchanged
    pub retained: Vec<MatchResult>,
    /// Matches rejected for `confidence_score < score_threshold`
    pub rejected_by_score: usize,
    /// Matches rejected for an excluded charge (post-match stage only)
    pub rejected_by_charge: usize,
}

/// Counts of a filter pass, for summaries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCounts {
    /// Matches entering the filter
    pub input: usize,
    /// Matches kept
    pub retained: usize,
    /// Rejected by score
    pub rejected_by_score: usize,
    /// Rejected by charge
    pub rejected_by_charge: usize,
}

impl FilterOutcome {
    /// Rejection counts of this outcome
    pub fn counts(&self) -> FilterCounts {
        FilterCounts {
            input: self.retained.len() + self.rejected_by_score + self.rejected_by_charge,
            retained: self.retained.len(),
            rejected_by_score: self.rejected_by_score,
            rejected_by_charge: self.rejected_by_charge,
        }
    }
}

impl ResultFilter {
    /// Filter on score only
    pub fn new(score_threshold: f64) -> Self {
        Self {
            score_threshold,
            post_match_charges: None,
        }
    }

    /// Also drop matches whose charge is not in `charges`
    pub fn with_post_match_charges(mut self, charges: ChargeSet) -> Self {
        self.post_match_charges = (!charges.is_unrestricted()).then_some(charges);
        self
    }

    /// Filter configured from run parameters
    pub fn from_parameters(params: &AnalysisParameters) -> Self {
        let filter = Self::new(params.score_threshold);
        match params.charge_filter_stage {
            ChargeFilterStage::PostMatch => {
                filter.with_post_match_charges(params.accepted_charges.clone())
            }
            ChargeFilterStage::PreMatch => filter,
        }
    }

    /// Whether a single match passes
    pub fn accepts(&self, result: &MatchResult) -> bool {
        self.charge_ok(result) && self.score_ok(result)
    }

    fn charge_ok(&self, result: &MatchResult) -> bool {
        self.post_match_charges
            .as_ref()
            .map_or(true, |set| set.accepts(result.charge_state()))
    }

    fn score_ok(&self, result: &MatchResult) -> bool {
        result.confidence_score() >= self.score_threshold
    }

    /// Split `matches` into retained and rejected
    pub fn apply(&self, matches: Vec<MatchResult>) -> FilterOutcome {
        let mut outcome = FilterOutcome::default();

        for result in matches {
            if !self.charge_ok(&result) {
                outcome.rejected_by_charge += 1;
            } else if !self.score_ok(&result) {
                outcome.rejected_by_score += 1;
            } else {
                outcome.retained.push(result);
            }
        }

        info!(
            "Filtering (score >= {}): {} retained, {} below score, {} excluded charge",
            self.score_threshold,
            outcome.retained.len(),
            outcome.rejected_by_score,
            outcome.rejected_by_charge
        );

        outcome
    }
}
