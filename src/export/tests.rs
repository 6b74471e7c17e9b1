use super::*;
use crate::records::ppm_error;
use tempfile::tempdir;

fn sample_results() -> Vec<MatchResult> {
    let coords = SpatialCoordinates {
        x: Some("12".to_string()),
        y: Some("7".to_string()),
        z: None,
        spot: Some("R00X12Y7".to_string()),
    };
    vec![
        MatchResult {
            peak: PeakRecord::new(0, 1000.5)
                .with_intensity(1234.5)
                .with_coordinates(coords),
            psm: PsmRecord::new(3, "PEPTIDEK", 1000.0, 2, 30.0).with_protein("sp|P12345|TEST"),
            mass_error_ppm: ppm_error(1000.5, 1000.0),
            mass_bin: 1000.0,
        },
        MatchResult {
            peak: PeakRecord::new(4, 1523.7712),
            psm: PsmRecord::new(9, "", 1523.7701, 1, 18.25),
            mass_error_ppm: ppm_error(1523.7712, 1523.7701),
            mass_bin: 1520.0,
        },
    ]
}

#[test]
fn test_header_is_fixed() {
    let mut buf = Vec::new();
    write_matches(&mut buf, &sample_results(), Delimiter::Comma).unwrap();
    let text = String::from_utf8(buf).unwrap();
    let header = text.lines().next().unwrap();
    assert_eq!(header, EXPORT_COLUMNS.join(","));
    assert_eq!(text.lines().count(), 3);
}

#[test]
fn test_empty_table_still_has_header() {
    let mut buf = Vec::new();
    write_matches(&mut buf, &[], Delimiter::Tab).unwrap();
    let text = String::from_utf8(buf).unwrap();
    assert_eq!(text.trim_end(), EXPORT_COLUMNS.join("\t"));
}

#[test]
fn test_written_table_reads_back() {
    let results = sample_results();
    for delimiter in [Delimiter::Comma, Delimiter::Tab] {
        let mut buf = Vec::new();
        write_matches(&mut buf, &results, delimiter).unwrap();
        let restored = read_matches(buf.as_slice(), delimiter).unwrap();
        assert_eq!(restored, results);
    }
}

#[test]
fn test_read_rejects_foreign_header() {
    let err = read_matches("a,b,c\n1,2,3\n".as_bytes(), Delimiter::Comma).unwrap_err();
    assert!(matches!(err, ExportError::Header(_)));
}

#[test]
fn test_export_to_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("fingerprinting_results.csv");

    let stats = export_matches(&path, &sample_results(), Delimiter::Comma).unwrap();
    assert_eq!(stats.rows_written, 2);
    assert!(stats.file_size_bytes > 0);

    let file = fs::File::open(&path).unwrap();
    assert_eq!(read_matches(file, Delimiter::Comma).unwrap().len(), 2);

    // no temporary files left behind
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn test_export_to_missing_directory_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing").join("out.csv");

    let err = export_matches(&path, &sample_results(), Delimiter::Comma).unwrap_err();
    assert!(matches!(err, ExportError::Io { .. }));
    assert!(!path.exists());
}

#[test]
fn test_failed_export_keeps_previous_file() {
    let dir = tempdir().unwrap();
    // a directory at the destination cannot be replaced by a file
    let path = dir.path().join("out.csv");
    fs::create_dir(&path).unwrap();

    let err = export_matches(&path, &sample_results(), Delimiter::Comma).unwrap_err();
    assert!(matches!(err, ExportError::Persist { .. }));
    assert!(path.is_dir());
}

#[test]
fn test_export_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("plots.json");
    export_json(&path, &sample_results()).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 2);
}
