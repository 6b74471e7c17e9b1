#![no_main]

use libfuzzer_sys::fuzz_target;
use mzfingerprint::input::TableReader;
use mzfingerprint::matcher::{Matcher, MatcherConfig};
use mzfingerprint::aggregate::MassBinning;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must either parse or fail with an error, never panic
    let peaks = TableReader::peaks().read_peaks(data);
    let psms = TableReader::psms().read_psms(data);

    // If both tables parsed, matching them against each other must not panic either
    if let (Ok(peaks), Ok(psms)) = (peaks, psms) {
        if let Ok(binning) = MassBinning::new(10.0) {
            let matcher = Matcher::new(&psms.records, &MatcherConfig::new(20.0), binning);
            let _ = matcher.match_peaks(&peaks.records);
        }
    }
});
