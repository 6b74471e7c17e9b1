use std::collections::BTreeMap;

use log::warn;
use serde::{Deserialize, Serialize};

use super::MAX_DENSE_BINS;
use crate::params::HistogramBinning;

/// One bin of the mass error histogram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    /// Inclusive lower edge (ppm)
    pub lower: f64,
    /// Upper edge (ppm); exclusive except for the last bin
    pub upper: f64,
    /// Number of values in the bin
    pub count: usize,
}

/// Binned mass error distribution
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorHistogram {
    /// Bins in ascending order
    pub bins: Vec<HistogramBin>,
    /// Empty bins were left out because the span exceeds [`MAX_DENSE_BINS`]
    #[serde(default)]
    pub gaps_omitted: bool,
}

impl ErrorHistogram {
    /// Bin `values` according to `binning`.
    ///
    /// Bins span the data; the maximum value falls in the last bin. An empty
    /// input yields no bins. When all values are equal a single bin of
    /// width 1 centred on the value is used in count mode. Spans wider than
    /// [`MAX_DENSE_BINS`] list only the occupied bins.
    pub fn compute(values: &[f64], binning: HistogramBinning) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let (min, max) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));

        let (start, width, span) = match binning {
            HistogramBinning::Count(n) => {
                let n = n.max(1) as f64;
                if max > min {
                    (min, (max - min) / n, n)
                } else {
                    (min - 0.5, 1.0, 1.0)
                }
            }
            HistogramBinning::Width(width) => {
                let start = (min / width).floor() * width;
                (start, width, ((max - start) / width).floor() + 1.0)
            }
        };

        let last = span - 1.0;
        let mut occupied: BTreeMap<i64, usize> = BTreeMap::new();
        for &v in values {
            let index = ((v - start) / width).floor().clamp(0.0, last);
            *occupied.entry(index as i64).or_insert(0) += 1;
        }

        let bin = |i: i64, count: usize| HistogramBin {
            lower: start + i as f64 * width,
            upper: start + (i + 1) as f64 * width,
            count,
        };

        let dense = span <= MAX_DENSE_BINS as f64;
        let bins = if dense {
            (0..span as i64)
                .map(|i| bin(i, occupied.get(&i).copied().unwrap_or(0)))
                .collect()
        } else {
            warn!("Mass error histogram spans {:.0} bins; listing occupied bins only", span);
            occupied.into_iter().map(|(i, count)| bin(i, count)).collect()
        };

        Self {
            bins,
            gaps_omitted: !dense,
        }
    }

    /// Sum of all bin counts
    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }
}
