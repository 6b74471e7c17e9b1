use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of input table being normalized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    /// MALDI peak list
    Peaks,
    /// DDA peptide-spectrum matches
    Psms,
}

impl TableKind {
    /// Canonical fields that can be bound for this table, in binding order
    pub fn fields(&self) -> &'static [CanonicalField] {
        match self {
            TableKind::Peaks => PEAK_FIELDS,
            TableKind::Psms => PSM_FIELDS,
        }
    }

    /// Canonical fields that must be resolved for this table
    pub fn required_fields(&self) -> &'static [CanonicalField] {
        match self {
            TableKind::Peaks => &[CanonicalField::Mass],
            TableKind::Psms => &[CanonicalField::TheoreticalMass, CanonicalField::ConfidenceScore],
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableKind::Peaks => write!(f, "peak list"),
            TableKind::Psms => write!(f, "PSM table"),
        }
    }
}

/// A field of the canonical internal schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    /// Observed peak mass
    Mass,
    /// Peak intensity
    Intensity,
    /// X pixel coordinate
    PixelX,
    /// Y pixel coordinate
    PixelY,
    /// Z pixel coordinate
    PixelZ,
    /// Spot / region label
    Spot,
    /// Peptide sequence of a PSM
    PeptideSequence,
    /// Calculated peptide mass of a PSM
    TheoreticalMass,
    /// Precursor charge of a PSM
    ChargeState,
    /// Search engine score of a PSM
    ConfidenceScore,
    /// Protein accession of a PSM
    Protein,
}

/// Fields bound when normalizing a peak list
pub const PEAK_FIELDS: &[CanonicalField] = &[
    CanonicalField::Mass,
    CanonicalField::Intensity,
    CanonicalField::PixelX,
    CanonicalField::PixelY,
    CanonicalField::PixelZ,
    CanonicalField::Spot,
];

/// Fields bound when normalizing a PSM table
pub const PSM_FIELDS: &[CanonicalField] = &[
    CanonicalField::TheoreticalMass,
    CanonicalField::ConfidenceScore,
    CanonicalField::ChargeState,
    CanonicalField::PeptideSequence,
    CanonicalField::Protein,
];

impl CanonicalField {
    /// Canonical snake_case name, also used as the export column name
    pub fn name(&self) -> &'static str {
        match self {
            CanonicalField::Mass => "mass",
            CanonicalField::Intensity => "intensity",
            CanonicalField::PixelX => "pixel_x",
            CanonicalField::PixelY => "pixel_y",
            CanonicalField::PixelZ => "pixel_z",
            CanonicalField::Spot => "spot",
            CanonicalField::PeptideSequence => "peptide_sequence",
            CanonicalField::TheoreticalMass => "theoretical_mass",
            CanonicalField::ChargeState => "charge_state",
            CanonicalField::ConfidenceScore => "confidence_score",
            CanonicalField::Protein => "protein",
        }
    }

    /// Accepted header spellings, in priority order.
    ///
    /// Entries are already in normalized form (see [`normalize_header`]).
    /// When several headers of one table match, the one matching the
    /// earliest entry wins.
    pub fn synonyms(&self) -> &'static [&'static str] {
        match self {
            CanonicalField::Mass => &[
                "mass",
                "m/z",
                "mz",
                "neutral mass",
                "observed mass",
                "monoisotopic mass",
                "peak mass",
                "peak m/z",
                "maldi m/z",
                "maldi m/z value",
                "centroid mass",
                "experimental mass",
                "mass to charge",
            ],
            CanonicalField::Intensity => &[
                "intensity",
                "int",
                "peak intensity",
                "abundance",
                "height",
                "signal",
            ],
            CanonicalField::PixelX => &["x", "pixel x", "x coordinate", "pos x", "xpos"],
            CanonicalField::PixelY => &["y", "pixel y", "y coordinate", "pos y", "ypos"],
            CanonicalField::PixelZ => &["z", "pixel z", "z coordinate", "pos z", "zpos"],
            CanonicalField::Spot => &[
                "spot",
                "spot id",
                "pixel",
                "pixel id",
                "region",
                "roi",
                "position",
            ],
            CanonicalField::PeptideSequence => &[
                "peptide",
                "peptide sequence",
                "sequence",
                "stripped peptide",
                "modified peptide",
            ],
            CanonicalField::TheoreticalMass => &[
                "theoretical mass",
                "calculated peptide mass",
                "calculated mass",
                "calc mass",
                "peptide mass",
                "theoretical neutral mass",
                "precursor neutral mass",
                "calibrated observed mass",
                "mass",
            ],
            CanonicalField::ChargeState => &[
                "charge",
                "charge state",
                "z",
                "precursor charge",
                "assumed charge",
            ],
            CanonicalField::ConfidenceScore => &[
                "hyperscore",
                "confidence score",
                "score",
                "confidence",
                "xcorr",
                "andromeda score",
                "ion score",
            ],
            CanonicalField::Protein => &[
                "protein",
                "proteins",
                "protein id",
                "protein accession",
                "accession",
                "leading razor protein",
            ],
        }
    }

    /// Numeric fields are parsed explicitly; failures mark the row malformed
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            CanonicalField::Mass
                | CanonicalField::Intensity
                | CanonicalField::TheoreticalMass
                | CanonicalField::ChargeState
                | CanonicalField::ConfidenceScore
        )
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Normalize a header for synonym lookup.
///
/// Lowercases, trims, strips a UTF-8 byte order mark and collapses runs of
/// whitespace, underscores and hyphens into a single space, so that
/// `"Neutral_Mass"`, `" neutral-mass "` and `"NEUTRAL   MASS"` all become
/// `"neutral mass"`.
pub fn normalize_header(header: &str) -> String {
    let header = header.trim_start_matches('\u{feff}');
    let mut out = String::with_capacity(header.len());
    let mut pending_space = false;

    for c in header.trim().chars() {
        if c.is_whitespace() || c == '_' || c == '-' {
            pending_space = true;
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        out.extend(c.to_lowercase());
    }

    out
}
