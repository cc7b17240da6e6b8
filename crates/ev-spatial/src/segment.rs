//! Road segments as handed over by the ingestion stage.

use ev_core::{Coordinate, HazardAttributes, JoinAnchor, Severity, SeverityThresholds};

use crate::GeometryError;

/// One physical road stretch: an ordered polyline plus scalar attributes.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoadSegment {
    /// Raw (un-normalized) vertices in travel order.
    pub coords:        Vec<Coordinate>,
    /// Total physical length in metres.
    pub length_m:      f64,
    /// Continuous hazard risk, e.g. mean flood variance over the segment.
    pub hazard_scalar: Option<f64>,
    /// Categorical hazard level, when the source data labels one.
    pub hazard_level:  Option<Severity>,
    /// Nearest hazard sample, filled in by the hazard join.
    pub hazard:        Option<HazardAttributes>,
}

impl RoadSegment {
    pub fn new(coords: Vec<Coordinate>, length_m: f64) -> Self {
        Self {
            coords,
            length_m,
            hazard_scalar: None,
            hazard_level:  None,
            hazard:        None,
        }
    }

    /// Build a segment whose length is the geodesic length of its polyline.
    pub fn from_polyline(coords: Vec<Coordinate>) -> Self {
        let length_m = polyline_length_m(&coords);
        Self::new(coords, length_m)
    }

    pub fn with_hazard_scalar(mut self, scalar: f64) -> Self {
        self.hazard_scalar = Some(scalar);
        self
    }

    pub fn with_hazard_level(mut self, level: Severity) -> Self {
        self.hazard_level = Some(level);
        self
    }

    /// Check the geometry is usable by the graph builder.
    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.coords.len() < 2 {
            return Err(GeometryError::TooFewPoints(self.coords.len()));
        }
        if let Some(i) = self.coords.iter().position(|c| !c.is_finite()) {
            return Err(GeometryError::NonFiniteCoordinate(i));
        }
        if !self.length_m.is_finite() || self.length_m <= 0.0 {
            return Err(GeometryError::InvalidLength(self.length_m));
        }
        Ok(())
    }

    /// Length share of each sub-segment: the total length amortized equally
    /// over `coords.len() - 1` pieces.
    #[inline]
    pub fn sub_segment_length_m(&self) -> f64 {
        self.length_m / (self.coords.len().saturating_sub(1).max(1)) as f64
    }

    /// Representative point used as the hazard join target.
    ///
    /// Returns `None` for an empty polyline.
    pub fn anchor(&self, anchor: JoinAnchor) -> Option<Coordinate> {
        match anchor {
            JoinAnchor::Start => self.coords.first().copied(),
            JoinAnchor::Midpoint => self.coords.get(self.coords.len() / 2).copied(),
            JoinAnchor::Centroid => {
                if self.coords.is_empty() {
                    return None;
                }
                let n = self.coords.len() as f64;
                let (lon, lat) = self
                    .coords
                    .iter()
                    .fold((0.0, 0.0), |(lon, lat), c| (lon + c.lon, lat + c.lat));
                Some(Coordinate::new(lon / n, lat / n))
            }
        }
    }

    /// Severity of this segment's edges.
    ///
    /// An explicit level wins; otherwise the continuous scalar is classified
    /// by `thresholds`; otherwise `Severity::None`.
    pub fn severity(&self, thresholds: Option<&SeverityThresholds>) -> Severity {
        if let Some(level) = self.hazard_level {
            return level;
        }
        match (self.hazard_scalar, thresholds) {
            (Some(s), Some(t)) => t.classify(s),
            _ => Severity::None,
        }
    }
}

/// Sum of haversine distances between consecutive vertices.
pub fn polyline_length_m(coords: &[Coordinate]) -> f64 {
    coords.windows(2).map(|w| w[0].distance_m(w[1])).sum()
}
