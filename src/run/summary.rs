use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[cfg(feature = "colorized_output")]
use console::style;

use crate::filter::FilterCounts;
use crate::input::IngestReport;
use crate::params::AnalysisParameters;

/// Row counts of one input table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TableCounts {
    /// Data rows read
    pub rows_read: usize,
    /// Rows turned into records
    pub rows_accepted: usize,
    /// Rows dropped as malformed
    pub rows_malformed: usize,
}

impl From<&IngestReport> for TableCounts {
    fn from(report: &IngestReport) -> Self {
        Self {
            rows_read: report.rows_read,
            rows_accepted: report.rows_accepted,
            rows_malformed: report.malformed_count(),
        }
    }
}

impl fmt::Display for TableCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rows read, {} accepted, {} malformed",
            self.rows_read, self.rows_accepted, self.rows_malformed
        )
    }
}

/// Counts and settings of a finished run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    /// Run identifier
    pub run_id: Uuid,
    /// When the run was created
    pub started_at: DateTime<Utc>,
    /// Parameters in effect
    pub parameters: AnalysisParameters,
    /// Peak list counts
    pub peaks: TableCounts,
    /// PSM table counts
    pub psms: TableCounts,
    /// PSMs that took part in matching
    pub psms_indexed: usize,
    /// Peaks with a selected PSM, before filtering
    pub matches_before_filter: usize,
    /// Peaks without any PSM in the window
    pub unmatched_peaks: usize,
    /// Filter pass counts
    pub filter: FilterCounts,
}

impl RunSummary {
    /// Matches in the final table
    pub fn matches_retained(&self) -> usize {
        self.filter.retained
    }

    /// Format the summary with colors (requires console feature)
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            let mut output = String::new();
            output.push_str(&format!("{}\n", style("Fingerprinting Summary").bold().cyan()));
            output.push_str(&format!("{}\n", style("======================").cyan()));
            output.push_str(&format!("{}: {}\n", style("Run").bold(), self.run_id));
            output.push_str(&format!("{}: {}\n", style("Parameters").bold(), self.parameter_line()));
            output.push_str(&format!("{}: {}\n", style("Peaks").bold(), self.peaks));
            output.push_str(&format!("{}: {}\n", style("PSMs").bold(), self.psms));
            output.push_str(&format!("{}: {}\n", style("Matching").bold(), self.matching_line()));
            output.push_str(&format!(
                "{}: {} retained, {} below score, {} excluded charge\n",
                style("Filtering").bold(),
                style(self.filter.retained).green(),
                style(self.filter.rejected_by_score).yellow(),
                style(self.filter.rejected_by_charge).yellow()
            ));
            if self.peaks.rows_malformed + self.psms.rows_malformed > 0 {
                output.push_str(&format!(
                    "{}\n",
                    style("Some input rows were malformed and dropped").yellow()
                ));
            }
            output
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            format!("{}", self)
        }
    }

    fn parameter_line(&self) -> String {
        let p = &self.parameters;
        format!(
            "{} ppm, score >= {}, charges {} ({})",
            p.ppm_tolerance, p.score_threshold, p.accepted_charges, p.charge_filter_stage
        )
    }

    fn matching_line(&self) -> String {
        format!(
            "{} PSMs indexed, {} peaks matched, {} unmatched",
            self.psms_indexed, self.matches_before_filter, self.unmatched_peaks
        )
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Fingerprinting Summary")?;
        writeln!(f, "======================")?;
        writeln!(f, "Run: {} ({})", self.run_id, self.started_at.to_rfc3339())?;
        writeln!(f, "Parameters: {}", self.parameter_line())?;
        writeln!(f, "Peaks: {}", self.peaks)?;
        writeln!(f, "PSMs: {}", self.psms)?;
        writeln!(f, "Matching: {}", self.matching_line())?;
        writeln!(
            f,
            "Filtering: {} retained, {} below score, {} excluded charge",
            self.filter.retained, self.filter.rejected_by_score, self.filter.rejected_by_charge
        )
    }
}
