//! TOML configuration file support.
//!
//! Settings that would otherwise be repeated on every invocation can live in
//! a config file. Command-line flags take precedence over the file, and the
//! file takes precedence over the built-in defaults.
//!
//! ```toml
//! # mzfingerprint.toml
//! [matching]
//! ppm_tolerance = 10.0
//! score_threshold = 18.0
//! accepted_charges = [1, 2]
//! charge_filter = "pre-match"
//! psm_mass_column = "Calibrated Observed Mass"
//! parallel = false
//!
//! [aggregation]
//! mass_bin_width = 10.0
//! error_bins = 50
//!
//! [output]
//! delimiter = "comma"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use mzfingerprint::input::Delimiter;
use mzfingerprint::params::{
    AnalysisParameters, ChargeFilterStage, ChargeSet, HistogramBinning, ParameterError,
};

/// Root configuration structure for mzfingerprint.toml files.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Matching and filtering settings.
    #[serde(default)]
    pub matching: MatchingConfig,

    /// Plot aggregation settings.
    #[serde(default)]
    pub aggregation: AggregationConfig,

    /// Export settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Configuration for matching and filtering.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatchingConfig {
    /// Symmetric window in ppm.
    pub ppm_tolerance: Option<f64>,

    /// Minimum confidence score (inclusive).
    pub score_threshold: Option<f64>,

    /// Accepted charge states; an empty list accepts any charge.
    pub accepted_charges: Option<Vec<i32>>,

    /// "pre-match" or "post-match".
    pub charge_filter: Option<ChargeFilterStage>,

    /// PSM column to use as the theoretical mass.
    pub psm_mass_column: Option<String>,

    /// Match on all cores (requires the parallel feature).
    pub parallel: Option<bool>,
}

/// Configuration for the plot aggregates.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AggregationConfig {
    /// Mass bin width in Da.
    pub mass_bin_width: Option<f64>,

    /// Number of mass error histogram bins.
    pub error_bins: Option<usize>,

    /// Mass error histogram bin width in ppm; takes precedence over `error_bins`.
    pub error_bin_width: Option<f64>,
}

/// Configuration for the exported table.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// "comma", "tab" or "semicolon".
    pub delimiter: Option<Delimiter>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Overlay the file's settings onto `params`.
    pub fn apply(&self, mut params: AnalysisParameters) -> Result<AnalysisParameters> {
        let m = &self.matching;
        if let Some(ppm) = m.ppm_tolerance {
            params.ppm_tolerance = ppm;
        }
        if let Some(threshold) = m.score_threshold {
            params.score_threshold = threshold;
        }
        if let Some(charges) = &m.accepted_charges {
            params.accepted_charges = charge_set(charges)?;
        }
        if let Some(stage) = m.charge_filter {
            params.charge_filter_stage = stage;
        }
        if let Some(column) = &m.psm_mass_column {
            params.psm_mass_column = Some(column.clone());
        }
        if let Some(parallel) = m.parallel {
            params.parallel = parallel;
        }

        let a = &self.aggregation;
        if let Some(width) = a.mass_bin_width {
            params.mass_bin_width = width;
        }
        if let Some(width) = a.error_bin_width {
            params.error_binning = HistogramBinning::Width(width);
        } else if let Some(bins) = a.error_bins {
            params.error_binning = HistogramBinning::Count(bins);
        }

        Ok(params)
    }
}

fn charge_set(charges: &[i32]) -> Result<ChargeSet> {
    if let Some(bad) = charges.iter().find(|&&z| z <= 0) {
        return Err(ParameterError::InvalidCharge(bad.to_string()))
            .context("Invalid accepted_charges in config file");
    }
    Ok(charges.iter().copied().collect())
}
