use anyhow::{Context, Result};
use log::info;
use std::process::ExitCode;

use mzfingerprint::input::{Delimiter, IngestReport};
use mzfingerprint::params::{AnalysisParameters, ChargeSet, HistogramBinning};
use mzfingerprint::run::{AnalysisRun, RunError};

use super::config::Config;
use super::RunArgs;

/// Exit status of a run that completed without any retained match
const NO_MATCHES_EXIT: u8 = 2;

/// Malformed rows echoed per table
const MALFORMED_SHOWN: usize = 5;

/// Match a peak list against a PSM table and export the results
pub fn run(args: RunArgs) -> Result<ExitCode> {
    let config = match &args.config {
        Some(path) => {
            info!("Loading config from {}", path.display());
            Config::from_file(path)?
        }
        None => Config::default(),
    };

    let params = parameters(&args, &config)?;
    let delimiter = output_delimiter(&args, &config);

    let run = AnalysisRun::new(params).context("Invalid analysis parameters")?;

    let peaks = run
        .load_peaks(&args.peaks)
        .with_context(|| format!("Failed to load peak list {}", args.peaks.display()))?;
    let psms = run
        .load_psms(&args.psms)
        .with_context(|| format!("Failed to load PSM table {}", args.psms.display()))?;

    print_malformed(&peaks.report);
    print_malformed(&psms.report);

    match run.execute(&peaks, &psms) {
        Ok(output) => {
            println!("{}", output.summary.format_colored());

            let stats = output
                .export_matches(&args.output, delimiter)
                .context("Failed to write match table")?;
            println!("{}", stats);

            if let Some(path) = &args.plot_data {
                output
                    .write_plot_data(path)
                    .context("Failed to write plot data")?;
                println!("Wrote plot data to {}", path.display());
            }

            Ok(ExitCode::SUCCESS)
        }
        Err(RunError::NoMatches(err)) => {
            println!("{}", err.summary.format_colored());
            eprintln!("No matches retained: {}.", err.cause);
            if err.cause.is_likely_misconfiguration() {
                eprintln!("This usually points to the inputs or settings rather than the sample.");
            }
            eprintln!("No output written.");
            Ok(ExitCode::from(NO_MATCHES_EXIT))
        }
        Err(e) => Err(e).context("Analysis failed"),
    }
}

/// Defaults, then the config file, then command-line flags
fn parameters(args: &RunArgs, config: &Config) -> Result<AnalysisParameters> {
    let mut params = config.apply(AnalysisParameters::default())?;

    if let Some(ppm) = args.ppm {
        params.ppm_tolerance = ppm;
    }
    if let Some(score) = args.min_score {
        params.score_threshold = score;
    }
    if let Some(charges) = &args.charges {
        params.accepted_charges = charges
            .parse::<ChargeSet>()
            .with_context(|| format!("Invalid --charges '{}'", charges))?;
    }
    if let Some(stage) = args.charge_filter {
        params.charge_filter_stage = stage.into();
    }
    if let Some(width) = args.mass_bin_width {
        params.mass_bin_width = width;
    }
    if let Some(bins) = args.error_bins {
        params.error_binning = HistogramBinning::Count(bins);
    }
    if let Some(column) = &args.psm_mass_column {
        params.psm_mass_column = Some(column.clone());
    }
    if args.parallel {
        params.parallel = true;
    }

    Ok(params)
}

/// `--tab`, then the config file, then the output extension
fn output_delimiter(args: &RunArgs, config: &Config) -> Delimiter {
    if args.tab {
        return Delimiter::Tab;
    }
    config
        .output
        .delimiter
        .or_else(|| Delimiter::from_extension(&args.output))
        .unwrap_or_default()
}

fn print_malformed(report: &IngestReport) {
    if report.malformed.is_empty() {
        return;
    }
    eprintln!(
        "{}: {} malformed rows dropped",
        report.table,
        report.malformed_count()
    );
    for row in report.malformed.iter().take(MALFORMED_SHOWN) {
        eprintln!("  {}", row);
    }
    if report.malformed_count() > MALFORMED_SHOWN {
        eprintln!("  ... and {} more", report.malformed_count() - MALFORMED_SHOWN);
    }
}
