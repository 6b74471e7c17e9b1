use std::fmt;

use crate::export::ExportError;
use crate::input::IngestError;
use crate::params::ParameterError;

use super::summary::RunSummary;

/// Errors that end an analysis run
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    /// Run parameters are invalid
    #[error("Invalid parameters: {0}")]
    Parameter(#[from] ParameterError),

    /// An input table could not be read or its header did not resolve
    #[error(transparent)]
    Ingest(#[from] IngestError),

    /// Results could not be written
    #[error(transparent)]
    Export(#[from] ExportError),

    /// The run completed but no match survived
    #[error(transparent)]
    NoMatches(#[from] NoMatchesError),
}

/// Why a run produced no matches
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoMatchesCause {
    /// The peak list or the PSM table had no valid rows
    EmptyInput,
    /// The accepted charge set removed every PSM or every selected match
    ChargeExcludedAll,
    /// No PSM was within tolerance of any peak
    NoCandidates,
    /// Matches were selected but all scored below the threshold
    AllBelowScore,
}

impl NoMatchesCause {
    /// Infer the cause from the counts of a finished run
    pub fn diagnose(summary: &RunSummary) -> Self {
        if summary.peaks.rows_accepted == 0 || summary.psms.rows_accepted == 0 {
            NoMatchesCause::EmptyInput
        } else if summary.psms_indexed == 0 {
            NoMatchesCause::ChargeExcludedAll
        } else if summary.matches_before_filter == 0 {
            NoMatchesCause::NoCandidates
        } else if summary.filter.rejected_by_charge == summary.matches_before_filter {
            NoMatchesCause::ChargeExcludedAll
        } else {
            NoMatchesCause::AllBelowScore
        }
    }

    /// Causes that usually mean wrong inputs or settings rather than data
    pub fn is_likely_misconfiguration(&self) -> bool {
        matches!(
            self,
            NoMatchesCause::EmptyInput | NoMatchesCause::ChargeExcludedAll
        )
    }
}

impl fmt::Display for NoMatchesCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoMatchesCause::EmptyInput => write!(f, "an input table has no valid rows"),
            NoMatchesCause::ChargeExcludedAll => {
                write!(f, "the accepted charge states exclude every candidate")
            }
            NoMatchesCause::NoCandidates => {
                write!(f, "no PSM lies within the ppm tolerance of any peak")
            }
            NoMatchesCause::AllBelowScore => {
                write!(f, "every selected match is below the score threshold")
            }
        }
    }
}

/// Empty result set, with the diagnosis and the counts it was drawn from
#[derive(Debug, Clone, thiserror::Error)]
#[error("No matches retained: {cause}")]
pub struct NoMatchesError {
    /// Diagnosed cause
    pub cause: NoMatchesCause,
    /// Counts of the finished run
    pub summary: Box<RunSummary>,
}
