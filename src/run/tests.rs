use super::*;
use crate::params::{ChargeFilterStage, ChargeSet, ParameterError};
use tempfile::tempdir;

const PEAKS: &str = "mass\n1000.50\n";
const PSMS: &str = "peptide,charge,theoretical_mass,hyperscore
PEPTIDEK,2,1000.00,30
";

fn tables(peaks: &str, psms: &str) -> (PeakTable, PsmTable) {
    (
        TableReader::peaks().read_peaks(peaks.as_bytes()).unwrap(),
        TableReader::psms().read_psms(psms.as_bytes()).unwrap(),
    )
}

fn params(threshold: f64) -> AnalysisParameters {
    AnalysisParameters::default()
        .with_ppm_tolerance(1000.0)
        .with_score_threshold(threshold)
        .with_charges([2].into_iter().collect())
}

fn expect_no_matches(result: Result<RunOutput, RunError>) -> NoMatchesError {
    match result {
        Err(RunError::NoMatches(e)) => e,
        Err(other) => panic!("expected NoMatches, got {other}"),
        Ok(output) => panic!("expected NoMatches, got {} matches", output.matches.len()),
    }
}

#[test]
fn test_single_match_retained() {
    let (peaks, psms) = tables(PEAKS, PSMS);
    let run = AnalysisRun::new(params(20.0)).unwrap();
    let output = run.execute(&peaks, &psms).unwrap();

    assert_eq!(output.matches.len(), 1);
    let m = &output.matches[0];
    assert!((m.mass_error_ppm - 500.0).abs() < 1e-9);
    assert_eq!(m.psm.peptide_sequence, "PEPTIDEK");
    assert_eq!(m.psm.charge_state, 2);

    assert_eq!(output.summary.run_id, run.id());
    assert_eq!(output.summary.matches_retained(), 1);
    assert_eq!(output.plots.mass_errors.len(), 1);
    assert_eq!(output.plots.identifications_per_bin.total(), 1);
}

#[test]
fn test_threshold_above_score_reports_no_matches() {
    let (peaks, psms) = tables(PEAKS, PSMS);
    let run = AnalysisRun::new(params(40.0)).unwrap();
    let err = expect_no_matches(run.execute(&peaks, &psms));

    assert_eq!(err.cause, NoMatchesCause::AllBelowScore);
    assert!(!err.cause.is_likely_misconfiguration());
    assert_eq!(err.summary.matches_before_filter, 1);
    assert_eq!(err.summary.filter.rejected_by_score, 1);
}

#[test]
fn test_malformed_peak_counted_once() {
    let peaks = "mass\n1000.50\nnot-a-mass\n2000.0\n";
    let (peaks, psms) = tables(peaks, PSMS);
    let output = AnalysisRun::new(params(20.0))
        .unwrap()
        .execute(&peaks, &psms)
        .unwrap();

    assert_eq!(output.summary.peaks.rows_read, 3);
    assert_eq!(output.summary.peaks.rows_accepted, 2);
    assert_eq!(output.summary.peaks.rows_malformed, 1);
    assert_eq!(output.summary.unmatched_peaks, 1);
    assert_eq!(output.matches.len(), 1);
}

#[test]
fn test_no_candidates_diagnosis() {
    let (peaks, psms) = tables("mass\n3000.0\n", PSMS);
    let err = expect_no_matches(AnalysisRun::new(params(20.0)).unwrap().execute(&peaks, &psms));
    assert_eq!(err.cause, NoMatchesCause::NoCandidates);
}

#[test]
fn test_charge_diagnosis() {
    let (peaks, psms) = tables(PEAKS, PSMS);

    let pre = params(20.0).with_charges([3].into_iter().collect());
    let err = expect_no_matches(AnalysisRun::new(pre.clone()).unwrap().execute(&peaks, &psms));
    assert_eq!(err.cause, NoMatchesCause::ChargeExcludedAll);
    assert_eq!(err.summary.psms_indexed, 0);
    assert!(err.cause.is_likely_misconfiguration());

    let post = pre.with_charge_filter_stage(ChargeFilterStage::PostMatch);
    let err = expect_no_matches(AnalysisRun::new(post).unwrap().execute(&peaks, &psms));
    assert_eq!(err.cause, NoMatchesCause::ChargeExcludedAll);
    assert_eq!(err.summary.filter.rejected_by_charge, 1);
}

#[test]
fn test_empty_input_diagnosis() {
    let (peaks, psms) = tables("mass\nabc\n", PSMS);
    let err = expect_no_matches(AnalysisRun::new(params(20.0)).unwrap().execute(&peaks, &psms));
    assert_eq!(err.cause, NoMatchesCause::EmptyInput);
}

#[test]
fn test_invalid_parameters_rejected() {
    let err = AnalysisRun::new(AnalysisParameters::default().with_ppm_tolerance(-5.0)).unwrap_err();
    assert!(matches!(
        err,
        RunError::Parameter(ParameterError::InvalidTolerance(_))
    ));
}

#[test]
fn test_runs_are_independent_and_deterministic() {
    let peaks = "mass\n999.2\n1000.5\n1200.0\n1499.9\n";
    let psms = "peptide,charge,theoretical_mass,hyperscore
AAAK,1,1000.0,25
CCCK,2,1500.0,19
DDDK,2,1200.1,40
EEEK,1,999.25,22
";
    let (peaks, psms) = tables(peaks, psms);
    let params = AnalysisParameters::default()
        .with_ppm_tolerance(600.0)
        .with_charges(ChargeSet::any());

    let a = AnalysisRun::new(params.clone()).unwrap();
    let b = AnalysisRun::new(params).unwrap();
    assert_ne!(a.id(), b.id());

    let out_a = a.execute(&peaks, &psms).unwrap();
    let out_b = b.execute(&peaks, &psms).unwrap();
    assert_eq!(out_a.matches, out_b.matches);
    assert_eq!(out_a.plots, out_b.plots);
}

#[test]
fn test_psm_mass_column_override() {
    let psms = "Peptide\tCharge\tCalibrated Observed Mass\tCalculated Peptide Mass\tHyperscore
PEPTIDEK\t2\t1000.00\t1100.00\t30
";
    let dir = tempdir().unwrap();
    let peak_path = dir.path().join("peaks.csv");
    let psm_path = dir.path().join("psm.tsv");
    std::fs::write(&peak_path, PEAKS).unwrap();
    std::fs::write(&psm_path, psms).unwrap();

    // synonym priority binds the calculated mass, which is out of tolerance
    let run = AnalysisRun::new(params(20.0)).unwrap();
    let err = expect_no_matches(run.execute_files(&peak_path, &psm_path));
    assert_eq!(err.cause, NoMatchesCause::NoCandidates);

    let mut with_column = params(20.0);
    with_column.psm_mass_column = Some("Calibrated Observed Mass".to_string());
    let output = AnalysisRun::new(with_column)
        .unwrap()
        .execute_files(&peak_path, &psm_path)
        .unwrap();
    assert_eq!(output.matches.len(), 1);
}

#[test]
fn test_write_outputs() {
    let (peaks, psms) = tables(PEAKS, PSMS);
    let output = AnalysisRun::new(params(20.0))
        .unwrap()
        .execute(&peaks, &psms)
        .unwrap();

    let dir = tempdir().unwrap();
    let stats = output
        .export_matches(dir.path().join("results.tsv"), Delimiter::Tab)
        .unwrap();
    assert_eq!(stats.rows_written, 1);

    let json_path = dir.path().join("plots.json");
    output.write_plot_data(&json_path).unwrap();
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(json_path).unwrap()).unwrap();
    assert_eq!(value["summary"]["filter"]["retained"], 1);
    assert_eq!(value["plots"]["mass_errors"].as_array().unwrap().len(), 1);
}

#[test]
fn test_summary_display() {
    let (peaks, psms) = tables(PEAKS, PSMS);
    let output = AnalysisRun::new(params(20.0))
        .unwrap()
        .execute(&peaks, &psms)
        .unwrap();
    let text = output.summary.to_string();
    assert!(text.contains("1000 ppm, score >= 20, charges 2 (pre-match)"));
    assert!(text.contains("Peaks: 1 rows read, 1 accepted, 0 malformed"));
}

#[test]
fn test_wide_mass_span_still_exports() {
    let peaks = "mass\n500.0\n5000000000.0\n";
    let psms = "peptide,charge,theoretical_mass,hyperscore
SMALLK,2,500.0,30
HUGEK,2,5000000000.0,30
";
    let (peaks, psms) = tables(peaks, psms);
    let output = AnalysisRun::new(AnalysisParameters::default())
        .unwrap()
        .execute(&peaks, &psms)
        .unwrap();

    assert_eq!(output.matches.len(), 2);
    let per_bin = &output.plots.identifications_per_bin;
    assert!(per_bin.gaps_omitted);
    assert_eq!(per_bin.bins.len(), 2);
    assert_eq!(per_bin.total(), 2);

    let dir = tempdir().unwrap();
    let stats = output
        .export_matches(dir.path().join("results.csv"), Delimiter::Comma)
        .unwrap();
    assert_eq!(stats.rows_written, 2);
}
