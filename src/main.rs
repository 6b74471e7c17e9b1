//! # mzfingerprint
//!
//! Command-line tool for spatial mass fingerprinting: matches MALDI peaks
//! to DDA peptide identifications by accurate mass.
//!
//! ## Usage
//!
//! ```bash
//! # Match and export with defaults (10 ppm, score >= 18, charges 1,2)
//! mzfingerprint run maldi_peaks.csv psm.tsv -o fingerprinting_results.csv
//!
//! # Wider window, any charge, plot data for the figures
//! mzfingerprint run maldi_peaks.csv psm.tsv --ppm 20 --charges "" --plot-data plots.json
//!
//! # Check how a table's columns are recognized
//! mzfingerprint inspect psm.tsv --kind psms
//! ```
//!
//! Exit status is 0 on success, 2 when the run finished without any
//! retained match, and 1 on error.

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;

mod cli;

use cli::Cli;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    cli::init_logging(cli.verbosity());

    cli::dispatch(cli)
}
