use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mzfingerprint::aggregate::{MassBinning, PlotData};
use mzfingerprint::input::TableReader;
use mzfingerprint::matcher::{Matcher, MatcherConfig};
use mzfingerprint::params::{ChargeSet, HistogramBinning};
use mzfingerprint::records::{PeakRecord, PsmRecord};

/// Synthetic PSM table spread over a typical tryptic peptide mass range
fn generate_psms(count: usize) -> Vec<PsmRecord> {
    (0..count)
        .map(|i| {
            let mass = 700.0 + (i as f64 * 7.919) % 3300.0;
            PsmRecord::new(i, format!("PEP{}K", i), mass, 1 + (i % 3) as i32, (i % 40) as f64)
        })
        .collect()
}

/// Synthetic peak list with a small offset from the PSM masses
fn generate_peaks(count: usize) -> Vec<PeakRecord> {
    (0..count)
        .map(|i| PeakRecord::new(i, 700.004 + (i as f64 * 3.137) % 3300.0))
        .collect()
}

/// Benchmark windowed matching against PSM table size
fn bench_match_peaks(c: &mut Criterion) {
    let mut group = c.benchmark_group("match_peaks");
    let binning = MassBinning::new(10.0).unwrap();
    let peaks = generate_peaks(10_000);

    for psm_count in [1_000, 10_000, 100_000] {
        let psms = generate_psms(psm_count);
        group.throughput(Throughput::Elements(peaks.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}psms", psm_count)),
            &psms,
            |b, psms| {
                let config = MatcherConfig::new(10.0);
                let matcher = Matcher::new(psms, &config, binning);
                b.iter(|| black_box(matcher.match_peaks(black_box(&peaks))));
            },
        );
    }

    group.finish();
}

/// Benchmark index construction with and without a charge restriction
fn bench_build_index(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_index");
    let binning = MassBinning::new(10.0).unwrap();
    let psms = generate_psms(100_000);

    group.bench_function("any_charge", |b| {
        let config = MatcherConfig::new(10.0);
        b.iter(|| black_box(Matcher::new(&psms, &config, binning).psm_count()));
    });

    group.bench_function("charges_1_2", |b| {
        let config = MatcherConfig::new(10.0).with_charges([1, 2].into_iter().collect::<ChargeSet>());
        b.iter(|| black_box(Matcher::new(&psms, &config, binning).psm_count()));
    });

    group.finish();
}

/// Benchmark table parsing
fn bench_read_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_table");

    let mut content = String::from("Peptide\tCharge\tCalculated Peptide Mass\tHyperscore\tProtein\n");
    for psm in generate_psms(50_000) {
        content.push_str(&format!(
            "{}\t{}\t{:.4}\t{:.1}\tsp|P{:05}|TEST\n",
            psm.peptide_sequence, psm.charge_state, psm.theoretical_mass, psm.confidence_score, psm.row
        ));
    }

    group.throughput(Throughput::Bytes(content.len() as u64));
    group.bench_function("psms_50k", |b| {
        let reader = TableReader::psms();
        b.iter(|| black_box(reader.read_psms(content.as_bytes()).unwrap()));
    });

    group.finish();
}

/// Benchmark plot aggregation
fn bench_plot_data(c: &mut Criterion) {
    let binning = MassBinning::new(10.0).unwrap();
    let psms = generate_psms(10_000);
    let peaks = generate_peaks(50_000);
    let matches = Matcher::new(&psms, &MatcherConfig::new(50.0), binning)
        .match_peaks(&peaks)
        .matches;

    c.bench_function("plot_data", |b| {
        b.iter(|| black_box(PlotData::compute(&matches, &binning, HistogramBinning::Count(50))));
    });
}

criterion_group!(
    benches,
    bench_match_peaks,
    bench_build_index,
    bench_read_table,
    bench_plot_data
);
criterion_main!(benches);
