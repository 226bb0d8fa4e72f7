//! Probability Units
//!
//! The incident-prediction stage reports probability as a percentage in
//! [0, 100]. Earlier revisions of the system mixed percentages and [0, 1]
//! fractions at different call sites, which produced reports rendering
//! "0.25%" for a one-in-four incident. `Percentage` makes the unit part of
//! the type so the scale is enforced at decode, adaptation, and render
//! boundaries instead of by call-site discipline.

use serde::{Deserialize, Deserializer, Serialize};

/// A percentage value clamped to [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Percentage(f64);

/// Deserializes as a bare number and clamps, so an out-of-range value from
/// a stored document or a model response can never enter the type.
impl<'de> Deserialize<'de> for Percentage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        Ok(Self::new(value))
    }
}

impl Percentage {
    /// Create from a value already expressed in percent.
    pub fn new(value: f64) -> Self {
        Self(value.clamp(0.0, 100.0))
    }

    /// Create from a [0, 1] fraction, scaling to percent.
    pub fn from_fraction(fraction: f64) -> Self {
        Self::new(fraction * 100.0)
    }

    /// Interpret a raw numeric value of unknown provenance.
    ///
    /// Values at or below 1.0 are treated as fractions; anything larger is
    /// taken as already being a percentage. Legacy producers emitted both.
    pub fn from_ambiguous(value: f64) -> Self {
        if value <= 1.0 {
            Self::from_fraction(value)
        } else {
            Self::new(value)
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn as_fraction(&self) -> f64 {
        self.0 / 100.0
    }
}

impl std::fmt::Display for Percentage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if (self.0 - self.0.round()).abs() < f64::EPSILON {
            write!(f, "{}%", self.0.round() as i64)
        } else {
            write!(f, "{:.1}%", self.0)
        }
    }
}

impl From<Percentage> for f64 {
    fn from(p: Percentage) -> f64 {
        p.0
    }
}
