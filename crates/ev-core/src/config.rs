//! Engine configuration.
//!
//! Typically loaded from a JSON file by the application crate (with the
//! `serde` feature) and passed to `ev_spatial::build_network`.  Every field
//! has a default, so a config file only needs to name what it changes.

use crate::{CoreError, CoreResult, PenaltyTable, SeverityThresholds};
use crate::geo::MAX_PRECISION;

/// Which point of a segment represents it in the hazard join.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum JoinAnchor {
    /// First vertex of the polyline.
    #[default]
    Start,
    /// Arithmetic mean of all vertices.
    Centroid,
    /// Middle vertex (`coords[len / 2]`).
    Midpoint,
}

/// Tunables for graph construction, densification, snapping, and costing.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NetworkConfig {
    /// Decimal digits kept when normalizing coordinates.  Default: 5.
    pub precision: u32,

    /// Maximum distance (metres, inclusive) between a join target and a
    /// hazard sample.  Default: 200.
    pub hazard_join_max_m: f64,

    /// Segment point used as the hazard join target.  Default: `Start`.
    pub join_anchor: JoinAnchor,

    /// Nearest-neighbour count for densification, including the node itself
    /// (4 → 3 neighbours).  0 or 1 disables densification.
    pub densify_k: usize,

    /// Skip densification candidates farther than this (metres).
    /// `None` links the k nearest regardless of distance.
    pub densify_max_m: Option<f64>,

    /// Maximum geodesic distance (metres) from a query point to the node it
    /// snaps to.  Default: 50.
    pub snap_max_m: f64,

    /// Also insert the reverse edge of every segment sub-segment.
    pub bidirectional: bool,

    /// Cost multipliers per severity tier.
    pub penalties: PenaltyTable,

    /// Policy for classifying a segment's continuous hazard scalar.  `None`
    /// leaves unlabelled segments at `Severity::None`.
    pub severity_thresholds: Option<SeverityThresholds>,

    /// Mark a segment's edges flooded at build time when its joined
    /// `flood_height` reaches this value.
    pub flood_height_threshold_m: Option<f64>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            precision:                5,
            hazard_join_max_m:        200.0,
            join_anchor:              JoinAnchor::Start,
            densify_k:                4,
            densify_max_m:            None,
            snap_max_m:               50.0,
            bidirectional:            false,
            penalties:                PenaltyTable::default(),
            severity_thresholds:      None,
            flood_height_threshold_m: None,
        }
    }
}

impl NetworkConfig {
    /// Check every field; returns the first violation found.
    pub fn validate(&self) -> CoreResult<()> {
        if self.precision > MAX_PRECISION {
            return Err(CoreError::Config(format!(
                "precision {} exceeds maximum {MAX_PRECISION}",
                self.precision
            )));
        }
        non_negative("hazard_join_max_m", self.hazard_join_max_m)?;
        non_negative("snap_max_m", self.snap_max_m)?;
        if let Some(d) = self.densify_max_m {
            non_negative("densify_max_m", d)?;
        }
        if let Some(h) = self.flood_height_threshold_m {
            if !h.is_finite() {
                return Err(CoreError::Config(format!(
                    "flood_height_threshold_m must be finite (got {h})"
                )));
            }
        }
        if let Some(t) = &self.severity_thresholds {
            t.validate()?;
        }
        self.penalties.validate()
    }

    /// `true` when densification is enabled (`densify_k > 1`).
    #[inline]
    pub fn densify_enabled(&self) -> bool {
        self.densify_k > 1
    }
}

fn non_negative(name: &str, value: f64) -> CoreResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(CoreError::Config(format!("{name} must be finite and >= 0 (got {value})")))
    }
}
