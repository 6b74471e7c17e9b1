//! # Schema Normalization
//!
//! Peak lists and PSM tables come from many instruments and search engines,
//! each with its own column naming. This module maps raw headers onto a
//! small canonical schema through an explicit synonym table, then validates
//! that the required fields are present.
//!
//! ## Canonical Fields
//!
//! | Field | Table | Required | Example headers |
//! |-------|-------|----------|-----------------|
//! | mass | peaks | Yes | `Mass`, `m/z`, `neutral_mass` |
//! | intensity | peaks | No | `Intensity`, `abundance` |
//! | pixel_x / pixel_y / pixel_z | peaks | No | `x`, `Pixel X` |
//! | spot | peaks | No | `Spot`, `region` |
//! | theoretical_mass | PSMs | Yes | `Theoretical Mass`, `Calculated Peptide Mass` |
//! | confidence_score | PSMs | Yes | `Hyperscore`, `score` |
//! | charge_state | PSMs | No | `Charge` |
//! | peptide_sequence | PSMs | No | `Peptide`, `Sequence` |
//! | protein | PSMs | No | `Protein` |
//!
//! Matching is case-insensitive and tolerant to surrounding whitespace and to
//! `_`/`-` used as word separators.

mod error;
mod fields;
mod resolve;


pub use error::SchemaError;
pub use fields::{normalize_header, CanonicalField, TableKind, PEAK_FIELDS, PSM_FIELDS};
pub use resolve::{ColumnBinding, ColumnMap, ColumnResolver};
