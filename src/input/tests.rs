use std::io::Cursor;
use std::path::Path;

use super::*;

const PEAKS_CSV: &str = "m/z,Intensity,x,y
1000.50,1200,3,4
abc,800,3,5
1500.25,,4,4
";

const PSMS_TSV: &str = "Peptide\tCharge\tCalculated Peptide Mass\tHyperscore\tProtein
PEPTIDEK\t2\t1000.00\t30.5\tsp|P12345|TEST
SAMPLER\t+3\t1500.20\t12.0\t
BROKENR\t2\tn/a\t25\tsp|P99999|BAD
";

#[test]
fn test_delimiter_from_extension() {
    assert_eq!(Delimiter::from_extension(Path::new("psm.tsv")), Some(Delimiter::Tab));
    assert_eq!(Delimiter::from_extension(Path::new("psm.TXT")), Some(Delimiter::Tab));
    assert_eq!(Delimiter::from_extension(Path::new("peaks.csv")), Some(Delimiter::Comma));
    assert_eq!(Delimiter::from_extension(Path::new("peaks.dat")), None);
    assert_eq!(Delimiter::from_extension(Path::new("peaks")), None);
}

#[test]
fn test_delimiter_sniffing() {
    assert_eq!(Delimiter::sniff("a\tb\tc"), Delimiter::Tab);
    assert_eq!(Delimiter::sniff("a,b,c"), Delimiter::Comma);
    assert_eq!(Delimiter::sniff("a;b;c"), Delimiter::Semicolon);
    assert_eq!(Delimiter::sniff("mass"), Delimiter::Comma);
    // a tie between tabs and commas is not a tab header
    assert_eq!(Delimiter::sniff("a\tb,c"), Delimiter::Comma);
    assert_eq!(Delimiter::sniff("a\tb\tc,d"), Delimiter::Tab);
    // Extension wins over content
    assert_eq!(
        Delimiter::detect(Some(Path::new("x.csv")), "a\tb"),
        Delimiter::Comma
    );
    assert_eq!(Delimiter::detect(Some(Path::new("x.dat")), "a\tb"), Delimiter::Tab);
}

#[test]
fn test_read_peaks_drops_malformed_row() {
    let table = TableReader::peaks().read_peaks(Cursor::new(PEAKS_CSV)).unwrap();

    assert_eq!(table.records.len(), 2);
    assert_eq!(table.report.rows_read, 3);
    assert_eq!(table.report.rows_accepted, 2);
    assert_eq!(table.report.malformed_count(), 1);

    let bad = &table.report.malformed[0];
    assert_eq!(bad.line, 3);
    assert_eq!(bad.field, Some(CanonicalField::Mass));
    assert_eq!(bad.value, "abc");

    let first = &table.records[0];
    assert_eq!(first.row, 0);
    assert_eq!(first.mass, 1000.50);
    assert_eq!(first.intensity, Some(1200.0));
    let coords = first.spatial_coordinates.as_ref().unwrap();
    assert_eq!(coords.x.as_deref(), Some("3"));
    assert_eq!(coords.y.as_deref(), Some("4"));

    // row index keeps counting across dropped rows
    let second = &table.records[1];
    assert_eq!(second.row, 2);
    assert_eq!(second.intensity, None);
}

#[test]
fn test_read_psms_tab_separated() {
    let table = TableReader::psms().read_psms(Cursor::new(PSMS_TSV)).unwrap();

    assert_eq!(table.report.delimiter, Delimiter::Tab);
    assert_eq!(table.records.len(), 2);
    assert_eq!(table.report.malformed_count(), 1);
    assert_eq!(
        table.report.malformed[0].field,
        Some(CanonicalField::TheoreticalMass)
    );

    let psm = &table.records[0];
    assert_eq!(psm.peptide_sequence, "PEPTIDEK");
    assert_eq!(psm.charge_state, 2);
    assert_eq!(psm.theoretical_mass, 1000.0);
    assert_eq!(psm.confidence_score, 30.5);
    assert_eq!(psm.protein.as_deref(), Some("sp|P12345|TEST"));

    let psm = &table.records[1];
    assert_eq!(psm.charge_state, 3);
    assert_eq!(psm.protein, None);
}

#[test]
fn test_missing_charge_column_is_unknown() {
    let csv = "sequence,theoretical_mass,score\nAAAK,500.0,20\n";
    let table = TableReader::psms().read_psms(Cursor::new(csv)).unwrap();
    assert_eq!(table.records[0].charge_state, 0);
}

#[test]
fn test_invalid_charge_is_malformed() {
    let csv = "peptide,mass,charge,score\nAAAK,500.0,2.5,20\nCCCK,600.0,2,21\n";
    let table = TableReader::psms().read_psms(Cursor::new(csv)).unwrap();
    assert_eq!(table.records.len(), 1);
    assert_eq!(table.report.malformed[0].field, Some(CanonicalField::ChargeState));
}

#[test]
fn test_short_row_is_malformed() {
    let csv = "mass,intensity\n100.0,5\n\n200.0\n,7\n";
    let table = TableReader::peaks().read_peaks(Cursor::new(csv)).unwrap();
    // "200.0" has no intensity cell: that is fine, ",7" has no mass
    assert_eq!(table.records.len(), 2);
    assert_eq!(table.report.malformed_count(), 1);
    assert_eq!(table.report.malformed[0].reason, "missing value");
}

#[test]
fn test_non_positive_mass_is_malformed() {
    let csv = "mass\n0\n-10\n100\n";
    let table = TableReader::peaks().read_peaks(Cursor::new(csv)).unwrap();
    assert_eq!(table.records.len(), 1);
    assert_eq!(table.report.malformed_count(), 2);
}

#[test]
fn test_schema_error_aborts_read() {
    let csv = "intensity,x\n5,1\n";
    let err = TableReader::peaks().read_peaks(Cursor::new(csv)).unwrap_err();
    assert!(matches!(err, IngestError::Schema(_)));
}

#[test]
fn test_empty_input_is_schema_error() {
    let err = TableReader::peaks().read_peaks(Cursor::new("")).unwrap_err();
    assert!(matches!(
        err,
        IngestError::Schema(crate::schema::SchemaError::EmptyHeader { .. })
    ));
}

#[test]
fn test_header_only_is_empty_table() {
    let table = TableReader::peaks().read_peaks(Cursor::new("mass,intensity\n")).unwrap();
    assert!(table.records.is_empty());
    assert_eq!(table.report.rows_read, 0);
}

#[test]
fn test_mass_column_override() {
    let tsv = "Peptide\tCalibrated Observed Mass\tCalculated Peptide Mass\tHyperscore\nPEPK\t1000.01\t1000.00\t22\n";
    let table = TableReader::psms()
        .with_mass_column("Calibrated Observed Mass")
        .with_delimiter(Delimiter::Tab)
        .read_psms(Cursor::new(tsv))
        .unwrap();
    assert_eq!(table.records[0].theoretical_mass, 1000.01);
}

#[test]
fn test_read_from_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("psms.tsv");
    std::fs::write(&path, PSMS_TSV).unwrap();

    let table = TableReader::psms().read_psms_path(&path).unwrap();
    assert_eq!(table.records.len(), 2);

    let missing = TableReader::psms().read_psms_path(dir.path().join("nope.tsv"));
    assert!(matches!(missing, Err(IngestError::Io { .. })));
}

#[test]
fn test_invalid_utf8_row_is_malformed() {
    let bytes: &[u8] = b"mass,spot\n1000.5,A1\n1200.0,caf\xE9\n1300.0,B2\n";
    let table = TableReader::peaks().read_peaks(bytes).unwrap();

    assert_eq!(table.records.len(), 2);
    assert_eq!(table.report.rows_read, 3);
    assert_eq!(table.report.malformed_count(), 1);
    let bad = &table.report.malformed[0];
    assert_eq!(bad.line, 3);
    assert_eq!(bad.field, Some(CanonicalField::Spot));
    assert_eq!(bad.value, "caf\u{FFFD}");

    let masses: Vec<f64> = table.records.iter().map(|p| p.mass).collect();
    assert_eq!(masses, vec![1000.5, 1300.0]);
}

#[test]
fn test_invalid_utf8_in_ignored_column() {
    let bytes: &[u8] = b"Peptide\tProtein Description\tCalculated Peptide Mass\tHyperscore\n\
PEPK\tR\xE9ductase\t1000.0\t22\n\
SAMK\tKinase\t1100.0\t30\n";
    let table = TableReader::psms().read_psms(bytes).unwrap();

    assert_eq!(table.records.len(), 1);
    assert_eq!(table.records[0].peptide_sequence, "SAMK");
    assert_eq!(table.report.malformed_count(), 1);
    assert_eq!(table.report.malformed[0].field, None);
}

#[test]
fn test_invalid_utf8_header_cell_is_ignored() {
    let bytes: &[u8] = b"mass,l\xE9gende\n1000.5,x\n";
    let table = TableReader::peaks().read_peaks(bytes).unwrap();
    assert_eq!(table.records.len(), 1);
    assert_eq!(table.report.columns.ignored.len(), 1);
}
