use crate::params::ChargeSet;
use crate::records::PsmRecord;

/// Relative padding applied to the search window bounds so that rounding in
/// the bound computation never excludes a candidate the exact predicate
/// would accept.
const WINDOW_PADDING: f64 = 1e-9;

/// PSMs sorted by theoretical mass for windowed lookup.
///
/// Sorting is stable, so PSMs with identical masses keep their input order.
#[derive(Debug, Clone)]
pub struct PsmIndex<'a> {
    psms: Vec<&'a PsmRecord>,
    masses: Vec<f64>,
}

impl<'a> PsmIndex<'a> {
    /// Index every PSM
    pub fn new(psms: &'a [PsmRecord]) -> Self {
        Self::build(psms.iter())
    }

    /// Index only PSMs whose charge is accepted
    pub fn with_charges(psms: &'a [PsmRecord], charges: &ChargeSet) -> Self {
        Self::build(psms.iter().filter(|p| charges.accepts(p.charge_state)))
    }

    fn build(psms: impl Iterator<Item = &'a PsmRecord>) -> Self {
        let mut psms: Vec<&'a PsmRecord> = psms.collect();
        psms.sort_by(|a, b| a.theoretical_mass.total_cmp(&b.theoretical_mass));
        let masses = psms.iter().map(|p| p.theoretical_mass).collect();
        Self { psms, masses }
    }

    /// Number of indexed PSMs
    pub fn len(&self) -> usize {
        self.psms.len()
    }

    /// True when nothing is indexed
    pub fn is_empty(&self) -> bool {
        self.psms.is_empty()
    }

    /// PSMs whose theoretical mass may lie within `ppm` of `mass`.
    ///
    /// The eligibility window is relative to the theoretical mass `t`:
    /// `|mass - t| <= tol * t` with `tol = ppm * 1e-6`, which rearranges to
    /// `mass / (1 + tol) <= t <= mass / (1 - tol)`. The returned slice is a
    /// padded superset; callers re-check each candidate exactly.
    pub fn window(&self, mass: f64, ppm: f64) -> &[&'a PsmRecord] {
        let tol = ppm * 1e-6;
        let lo = mass / (1.0 + tol) * (1.0 - WINDOW_PADDING);
        let start = self.masses.partition_point(|&t| t < lo);

        let end = if tol < 1.0 {
            let hi = mass / (1.0 - tol) * (1.0 + WINDOW_PADDING);
            self.masses.partition_point(|&t| t <= hi)
        } else {
            self.masses.len()
        };

        &self.psms[start..end.max(start)]
    }

    /// All indexed PSMs in mass order
    pub fn as_slice(&self) -> &[&'a PsmRecord] {
        &self.psms
    }
}
