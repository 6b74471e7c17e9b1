//! Canonical record types shared by every pipeline stage.
//!
//! Records are produced once by [`crate::input`] and never mutated
//! afterwards; later stages build new values from them.

use serde::{Deserialize, Serialize};

/// Position metadata of a peak in an imaging run.
///
/// Values are kept as the original text so they are written back exactly
/// as they were read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpatialCoordinates {
    /// X pixel coordinate
    pub x: Option<String>,
    /// Y pixel coordinate
    pub y: Option<String>,
    /// Z pixel coordinate (3D imaging only)
    pub z: Option<String>,
    /// Spot, region or pixel label
    pub spot: Option<String>,
}

impl SpatialCoordinates {
    /// True when no coordinate field is set
    pub fn is_empty(&self) -> bool {
        self.x.is_none() && self.y.is_none() && self.z.is_none() && self.spot.is_none()
    }
}

/// One observed peak from the MALDI peak list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakRecord {
    /// 0-based data row index in the input table
    pub row: usize,
    /// Observed mass (always > 0)
    pub mass: f64,
    /// Signal intensity
    pub intensity: Option<f64>,
    /// Pixel / spot metadata, carried through unmodified
    pub spatial_coordinates: Option<SpatialCoordinates>,
}

impl PeakRecord {
    /// Create a peak with only a mass
    pub fn new(row: usize, mass: f64) -> Self {
        Self {
            row,
            mass,
            intensity: None,
            spatial_coordinates: None,
        }
    }

    /// Set the intensity
    pub fn with_intensity(mut self, intensity: f64) -> Self {
        self.intensity = Some(intensity);
        self
    }

    /// Set the spatial coordinates
    pub fn with_coordinates(mut self, coordinates: SpatialCoordinates) -> Self {
        self.spatial_coordinates = Some(coordinates);
        self
    }
}

/// One peptide-spectrum match from the DDA reference set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PsmRecord {
    /// 0-based data row index in the input table
    pub row: usize,
    /// Matched peptide sequence
    pub peptide_sequence: String,
    /// Calculated mass of the peptide (always > 0)
    pub theoretical_mass: f64,
    /// Precursor charge; 0 when the table has no charge column
    pub charge_state: i32,
    /// Search engine score, higher is better
    pub confidence_score: f64,
    /// Protein accession(s)
    pub protein: Option<String>,
}

impl PsmRecord {
    /// Create a PSM record
    pub fn new(
        row: usize,
        peptide_sequence: impl Into<String>,
        theoretical_mass: f64,
        charge_state: i32,
        confidence_score: f64,
    ) -> Self {
        Self {
            row,
            peptide_sequence: peptide_sequence.into(),
            theoretical_mass,
            charge_state,
            confidence_score,
            protein: None,
        }
    }

    /// Set the protein accession
    pub fn with_protein(mut self, protein: impl Into<String>) -> Self {
        self.protein = Some(protein.into());
        self
    }
}

/// A peak joined to its selected PSM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// The observed peak
    pub peak: PeakRecord,
    /// The selected PSM
    pub psm: PsmRecord,
    /// (observed - theoretical) / theoretical * 1e6
    pub mass_error_ppm: f64,
    /// Lower edge of the fixed-width mass bin containing the peak mass
    pub mass_bin: f64,
}

impl MatchResult {
    /// Observed peak mass
    pub fn mass(&self) -> f64 {
        self.peak.mass
    }

    /// Score of the selected PSM
    pub fn confidence_score(&self) -> f64 {
        self.psm.confidence_score
    }

    /// Charge of the selected PSM
    pub fn charge_state(&self) -> i32 {
        self.psm.charge_state
    }
}

/// Signed mass error in ppm relative to the theoretical mass.
#[inline]
pub fn ppm_error(observed: f64, theoretical: f64) -> f64 {
    (observed - theoretical) / theoretical * 1e6
}
