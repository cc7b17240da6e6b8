//! Flood-hazard reference data, severity tiers, and penalty multipliers.

use std::fmt;
use std::str::FromStr;

use crate::{Coordinate, CoreError, CoreResult};

// ── Samples ───────────────────────────────────────────────────────────────────

/// One point observation from the external flood-hazard dataset.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HazardSample {
    pub position:      Coordinate,
    pub flood_height:  f64,
    pub elevation:     f64,
    pub precipitation: f64,
}

impl HazardSample {
    pub fn new(position: Coordinate, flood_height: f64, elevation: f64, precipitation: f64) -> Self {
        Self { position, flood_height, elevation, precipitation }
    }
}

/// Attributes copied from the nearest sample by the hazard join.
///
/// "No sample within tolerance" is represented by the *absence* of this
/// value (`Option::None`), never by zeroed fields.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HazardAttributes {
    /// Index of the matched sample in the sample slice.
    pub sample:        usize,
    /// Distance from the join target to the sample, metres.
    pub distance_m:    f64,
    pub flood_height:  f64,
    pub elevation:     f64,
    pub precipitation: f64,
}

// ── Severity ──────────────────────────────────────────────────────────────────

/// Discrete hazard tier of an edge.  Ordered from harmless to severe.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Severity {
    /// No hazard information attached.
    #[default]
    None,
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::None   => "none",
            Severity::Low    => "low",
            Severity::Medium => "medium",
            Severity::High   => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(Severity::None),
            "low"       => Ok(Severity::Low),
            "medium"    => Ok(Severity::Medium),
            "high"      => Ok(Severity::High),
            other       => Err(CoreError::Parse(format!("unknown hazard level {other:?}"))),
        }
    }
}

/// Policy mapping a continuous hazard scalar (e.g. mean flood variance) to a
/// [`Severity`] tier.
///
/// `scalar >= high` → `High`, `scalar >= medium` → `Medium`, anything else
/// (including NaN) → `Low`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SeverityThresholds {
    pub medium: f64,
    pub high:   f64,
}

impl SeverityThresholds {
    pub fn classify(&self, scalar: f64) -> Severity {
        if scalar >= self.high {
            Severity::High
        } else if scalar >= self.medium {
            Severity::Medium
        } else {
            Severity::Low
        }
    }

    pub fn validate(&self) -> CoreResult<()> {
        if !self.medium.is_finite() || !self.high.is_finite() || self.medium > self.high {
            return Err(CoreError::Config(format!(
                "severity thresholds must be finite with medium <= high (got {} / {})",
                self.medium, self.high
            )));
        }
        Ok(())
    }
}

// ── Penalties ─────────────────────────────────────────────────────────────────

/// Cost multiplier per severity tier, plus the multiplier for flooded edges.
///
/// Every multiplier is finite and at least 1.0: hazardous edges become
/// expensive, never unusable.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PenaltyTable {
    pub none:    f64,
    pub low:     f64,
    pub medium:  f64,
    pub high:    f64,
    pub flooded: f64,
}

impl Default for PenaltyTable {
    fn default() -> Self {
        Self {
            none:    1.0,
            low:     1.0,
            medium:  5.0,
            high:    100.0,
            flooded: 100.0,
        }
    }
}

impl PenaltyTable {
    /// Multiplier for an edge of `severity`.  Flooded edges take the larger
    /// of their tier multiplier and the flooded multiplier.
    #[inline]
    pub fn multiplier(&self, severity: Severity, flooded: bool) -> f64 {
        let tier = match severity {
            Severity::None   => self.none,
            Severity::Low    => self.low,
            Severity::Medium => self.medium,
            Severity::High   => self.high,
        };
        if flooded { tier.max(self.flooded) } else { tier }
    }

    /// Reject tables that would make an edge free, negative, infinite, or
    /// cheaper at a more severe tier.
    pub fn validate(&self) -> CoreResult<()> {
        let ordered = [
            ("none", self.none),
            ("low", self.low),
            ("medium", self.medium),
            ("high", self.high),
            ("flooded", self.flooded),
        ];
        for (name, m) in ordered {
            if !m.is_finite() || m < 1.0 {
                return Err(CoreError::Config(format!(
                    "penalty multiplier `{name}` must be finite and >= 1.0 (got {m})"
                )));
            }
        }
        for pair in ordered.windows(2) {
            let ((lo_name, lo), (hi_name, hi)) = (pair[0], pair[1]);
            if lo > hi {
                return Err(CoreError::Config(format!(
                    "penalty multiplier `{lo_name}` ({lo}) exceeds `{hi_name}` ({hi})"
                )));
            }
        }
        Ok(())
    }
}
