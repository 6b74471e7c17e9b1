use std::collections::BTreeMap;

use log::warn;
use serde::{Deserialize, Serialize};

use super::MAX_DENSE_BINS;
use crate::params::ParameterError;
use crate::records::MatchResult;

/// Fixed-width discretisation of mass.
///
/// Bin edges are multiples of the width, so the bin of a mass is
/// `floor(mass / width) * width`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MassBinning {
    width: f64,
}

impl MassBinning {
    /// Binning with the given width in Da
    pub fn new(width: f64) -> Result<Self, ParameterError> {
        if !(width.is_finite() && width > 0.0) {
            return Err(ParameterError::InvalidBinWidth(width));
        }
        Ok(Self { width })
    }

    /// Bin width in Da
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Lower edge of the bin containing `mass`
    pub fn lower_edge(&self, mass: f64) -> f64 {
        (mass / self.width).floor() * self.width
    }
}

/// Identification count of one mass bin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MassBinCount {
    /// Inclusive lower edge
    pub lower: f64,
    /// Exclusive upper edge
    pub upper: f64,
    /// Label in interval notation, e.g. `[100, 150)`
    pub label: String,
    /// Number of identifications in the bin
    pub count: usize,
}

/// Identifications per mass bin, ascending, empty bins included
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MassBinCounts {
    /// Bin width in Da
    pub bin_width: f64,
    /// Bins in ascending mass order
    pub bins: Vec<MassBinCount>,
    /// Results outside an explicitly requested range
    pub out_of_range: usize,
    /// Empty bins were left out because the span exceeds [`MAX_DENSE_BINS`]
    #[serde(default)]
    pub gaps_omitted: bool,
}

impl MassBinCounts {
    /// Total identifications counted in bins
    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }

    /// Count of the bin whose label is `label`
    pub fn count_for(&self, label: &str) -> Option<usize> {
        self.bins.iter().find(|b| b.label == label).map(|b| b.count)
    }
}

fn label(lower: f64, upper: f64) -> String {
    format!("[{}, {})", lower, upper)
}

/// Count identifications per fixed-width mass bin.
///
/// With `range = Some((lo, hi))` the bins start at the bin edge of `lo` and
/// continue while the lower edge is below `hi`; a mass equal to `hi` is
/// counted in the last bin and masses outside the range are reported in
/// `out_of_range`. Without a range the bins cover
/// `[floor(min / w) * w, floor(max / w) * w + w)` of the data.
///
/// Every bin inside the range is present, including those with no
/// identifications, as long as the range spans at most [`MAX_DENSE_BINS`]
/// bins. Wider spans list only the occupied bins and set `gaps_omitted`.
pub fn identifications_per_mass_bin(
    results: &[MatchResult],
    binning: &MassBinning,
    range: Option<(f64, f64)>,
) -> MassBinCounts {
    let width = binning.width();

    let (start, span) = match range {
        Some((lo, hi)) => {
            let start = binning.lower_edge(lo);
            (start, ((hi - start) / width).ceil().max(1.0))
        }
        None => {
            if results.is_empty() {
                return MassBinCounts {
                    bin_width: width,
                    ..Default::default()
                };
            }
            let (min, max) = results.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| {
                (lo.min(r.mass()), hi.max(r.mass()))
            });
            let start = binning.lower_edge(min);
            let end = binning.lower_edge(max) + width;
            (start, ((end - start) / width).round().max(1.0))
        }
    };

    let last = span - 1.0;
    let mut occupied: BTreeMap<i64, usize> = BTreeMap::new();
    let mut out_of_range = 0usize;

    for result in results {
        let mass = result.mass();
        if let Some((lo, hi)) = range {
            if mass < lo || mass > hi {
                out_of_range += 1;
                continue;
            }
        }
        let offset = ((binning.lower_edge(mass) - start) / width)
            .round()
            .clamp(0.0, last);
        *occupied.entry(offset as i64).or_insert(0) += 1;
    }

    let bin = |i: i64, count: usize| {
        let lower = start + i as f64 * width;
        let upper = lower + width;
        MassBinCount {
            lower,
            upper,
            label: label(lower, upper),
            count,
        }
    };

    let dense = span <= MAX_DENSE_BINS as f64;
    let bins = if dense {
        (0..span as i64)
            .map(|i| bin(i, occupied.get(&i).copied().unwrap_or(0)))
            .collect()
    } else {
        warn!(
            "Mass range spans {:.0} bins of {} Da; listing occupied bins only",
            span, width
        );
        occupied.into_iter().map(|(i, count)| bin(i, count)).collect()
    };

    MassBinCounts {
        bin_width: width,
        bins,
        out_of_range,
        gaps_omitted: !dense,
    }
}
