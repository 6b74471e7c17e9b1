//! Analysis parameters for one run.
//!
//! Defaults follow the values the fingerprinting workflow has always used:
//! 10 ppm, hyperscore 18, charges 1 and 2, 10 Da mass bins and a 50-bin
//! mass error histogram.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Default ppm tolerance
pub const DEFAULT_PPM_TOLERANCE: f64 = 10.0;
/// Default minimum confidence score
pub const DEFAULT_SCORE_THRESHOLD: f64 = 18.0;
/// Default mass bin width in Da
pub const DEFAULT_MASS_BIN_WIDTH: f64 = 10.0;
/// Default number of mass error histogram bins
pub const DEFAULT_ERROR_BINS: usize = 50;

/// Errors raised by invalid analysis parameters
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParameterError {
    /// ppm tolerance is not a finite positive number
    #[error("ppm tolerance must be a finite number > 0, got {0}")]
    InvalidTolerance(f64),

    /// score threshold is NaN or infinite
    #[error("score threshold must be finite, got {0}")]
    InvalidScoreThreshold(f64),

    /// bin width is not a finite positive number
    #[error("bin width must be a finite number > 0, got {0}")]
    InvalidBinWidth(f64),

    /// histogram requested with zero bins
    #[error("histogram bin count must be at least 1")]
    ZeroBins,

    /// charge list could not be parsed
    #[error("invalid charge state '{0}': expected a positive integer")]
    InvalidCharge(String),
}

/// Set of accepted precursor charge states.
///
/// An empty set places no restriction on charge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChargeSet(BTreeSet<i32>);

impl ChargeSet {
    /// A set that accepts every charge
    pub fn any() -> Self {
        Self(BTreeSet::new())
    }

    /// True when no restriction is applied
    pub fn is_unrestricted(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether a PSM of this charge passes the set
    pub fn accepts(&self, charge: i32) -> bool {
        self.0.is_empty() || self.0.contains(&charge)
    }

    /// Accepted charges in ascending order
    pub fn iter(&self) -> impl Iterator<Item = i32> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<i32> for ChargeSet {
    fn from_iter<T: IntoIterator<Item = i32>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl FromStr for ChargeSet {
    type Err = ParameterError;

    /// Parse a comma-separated list such as `"1, 2,3"`; blank means any charge
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut set = BTreeSet::new();
        for part in s.split(',') {
            let part = part.trim();
            if part.is_empty() {
                continue;
            }
            match part.parse::<i32>() {
                Ok(z) if z > 0 => {
                    set.insert(z);
                }
                _ => return Err(ParameterError::InvalidCharge(part.to_string())),
            }
        }
        Ok(Self(set))
    }
}

impl fmt::Display for ChargeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "any");
        }
        let parts: Vec<String> = self.0.iter().map(|z| z.to_string()).collect();
        write!(f, "{}", parts.join(","))
    }
}

/// When the accepted-charge restriction is applied.
///
/// The two stages are not equivalent: pre-match removes excluded charges
/// from the candidate pool, so the next-closest accepted PSM can win;
/// post-match selects among all PSMs and then drops the match if the
/// winner's charge is excluded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChargeFilterStage {
    /// Restrict the candidate pool before tie-break (default)
    #[default]
    PreMatch,
    /// Select among all candidates, then discard excluded charges
    PostMatch,
}

impl fmt::Display for ChargeFilterStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChargeFilterStage::PreMatch => write!(f, "pre-match"),
            ChargeFilterStage::PostMatch => write!(f, "post-match"),
        }
    }
}

/// How the mass error histogram is binned
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistogramBinning {
    /// Fixed number of equal-width bins spanning the data
    Count(usize),
    /// Fixed bin width in ppm, aligned to multiples of the width
    Width(f64),
}

impl Default for HistogramBinning {
    fn default() -> Self {
        HistogramBinning::Count(DEFAULT_ERROR_BINS)
    }
}

impl HistogramBinning {
    /// Check the binning is usable
    pub fn validate(&self) -> Result<(), ParameterError> {
        match *self {
            HistogramBinning::Count(0) => Err(ParameterError::ZeroBins),
            HistogramBinning::Width(w) if !(w.is_finite() && w > 0.0) => {
                Err(ParameterError::InvalidBinWidth(w))
            }
            _ => Ok(()),
        }
    }
}

/// User-configured parameters of one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisParameters {
    /// Symmetric matching window in ppm of the theoretical mass
    pub ppm_tolerance: f64,
    /// Minimum confidence score (inclusive)
    pub score_threshold: f64,
    /// Accepted charge states; empty means any
    pub accepted_charges: ChargeSet,
    /// Where the charge restriction is applied
    pub charge_filter_stage: ChargeFilterStage,
    /// Width in Da of the mass bins used for identification counts
    pub mass_bin_width: f64,
    /// Mass error histogram binning
    pub error_binning: HistogramBinning,
    /// Bind this PSM column as the theoretical mass instead of using synonyms
    pub psm_mass_column: Option<String>,
    /// Match peaks on the rayon thread pool (requires the `parallel` feature)
    pub parallel: bool,
}

impl Default for AnalysisParameters {
    fn default() -> Self {
        Self {
            ppm_tolerance: DEFAULT_PPM_TOLERANCE,
            score_threshold: DEFAULT_SCORE_THRESHOLD,
            accepted_charges: [1, 2].into_iter().collect(),
            charge_filter_stage: ChargeFilterStage::default(),
            mass_bin_width: DEFAULT_MASS_BIN_WIDTH,
            error_binning: HistogramBinning::default(),
            psm_mass_column: None,
            parallel: false,
        }
    }
}

impl AnalysisParameters {
    /// Set the ppm tolerance
    pub fn with_ppm_tolerance(mut self, ppm: f64) -> Self {
        self.ppm_tolerance = ppm;
        self
    }

    /// Set the score threshold
    pub fn with_score_threshold(mut self, threshold: f64) -> Self {
        self.score_threshold = threshold;
        self
    }

    /// Set the accepted charges
    pub fn with_charges(mut self, charges: ChargeSet) -> Self {
        self.accepted_charges = charges;
        self
    }

    /// Set the charge filter stage
    pub fn with_charge_filter_stage(mut self, stage: ChargeFilterStage) -> Self {
        self.charge_filter_stage = stage;
        self
    }

    /// Set the mass bin width
    pub fn with_mass_bin_width(mut self, width: f64) -> Self {
        self.mass_bin_width = width;
        self
    }

    /// Validate all parameters
    pub fn validate(&self) -> Result<(), ParameterError> {
        if !(self.ppm_tolerance.is_finite() && self.ppm_tolerance > 0.0) {
            return Err(ParameterError::InvalidTolerance(self.ppm_tolerance));
        }
        if !self.score_threshold.is_finite() {
            return Err(ParameterError::InvalidScoreThreshold(self.score_threshold));
        }
        if !(self.mass_bin_width.is_finite() && self.mass_bin_width > 0.0) {
            return Err(ParameterError::InvalidBinWidth(self.mass_bin_width));
        }
        if let Some(z) = self.accepted_charges.iter().find(|&z| z <= 0) {
            return Err(ParameterError::InvalidCharge(z.to_string()));
        }
        self.error_binning.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_charges() {
        let set: ChargeSet = "1, 2,3".parse().unwrap();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(set.accepts(2));
        assert!(!set.accepts(4));
        assert_eq!(set.to_string(), "1,2,3");
    }

    #[test]
    fn test_blank_charges_accept_any() {
        let set: ChargeSet = " ".parse().unwrap();
        assert!(set.is_unrestricted());
        assert!(set.accepts(0));
        assert!(set.accepts(7));
        assert_eq!(set.to_string(), "any");
    }

    #[test]
    fn test_invalid_charge() {
        assert_eq!(
            "1,two".parse::<ChargeSet>(),
            Err(ParameterError::InvalidCharge("two".to_string()))
        );
        assert!("0".parse::<ChargeSet>().is_err());
        assert!("-2".parse::<ChargeSet>().is_err());
    }

    #[test]
    fn test_default_parameters_valid() {
        let params = AnalysisParameters::default();
        params.validate().unwrap();
        assert_eq!(params.ppm_tolerance, 10.0);
        assert_eq!(params.score_threshold, 18.0);
        assert_eq!(params.accepted_charges.to_string(), "1,2");
        assert_eq!(params.charge_filter_stage, ChargeFilterStage::PreMatch);
    }

    #[test]
    fn test_invalid_parameters() {
        let params = AnalysisParameters::default().with_ppm_tolerance(0.0);
        assert_eq!(params.validate(), Err(ParameterError::InvalidTolerance(0.0)));

        let params = AnalysisParameters::default().with_ppm_tolerance(f64::NAN);
        assert!(params.validate().is_err());

        let params = AnalysisParameters::default().with_mass_bin_width(-1.0);
        assert_eq!(params.validate(), Err(ParameterError::InvalidBinWidth(-1.0)));

        let mut params = AnalysisParameters::default();
        params.error_binning = HistogramBinning::Count(0);
        assert_eq!(params.validate(), Err(ParameterError::ZeroBins));
    }

    #[test]
    fn test_deserialized_charges_are_validated() {
        let mut value = serde_json::to_value(AnalysisParameters::default()).unwrap();
        value["accepted_charges"] = serde_json::json!([2, 0]);
        let params: AnalysisParameters = serde_json::from_value(value).unwrap();

        assert_eq!(
            params.validate(),
            Err(ParameterError::InvalidCharge("0".to_string()))
        );

        let negative: ChargeSet = [-1, 2].into_iter().collect();
        let params = AnalysisParameters::default().with_charges(negative);
        assert_eq!(
            params.validate(),
            Err(ParameterError::InvalidCharge("-1".to_string()))
        );
    }

    #[test]
    fn test_charge_stage_serde() {
        let json = serde_json::to_string(&ChargeFilterStage::PostMatch).unwrap();
        assert_eq!(json, "\"post-match\"");
    }
}
