//! Nearest-sample hazard join.
//!
//! Every target is compared against every sample (O(targets × samples)),
//! which is fine at the size of the point-sampled flood datasets involved.
//! The metric and the distance cut-off are fields of [`HazardJoin`], so an
//! indexed search can replace the scan without changing the contract.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use ev_core::{Coordinate, HazardAttributes, HazardSample, JoinAnchor};

use crate::RoadSegment;

// ── Distance metric ───────────────────────────────────────────────────────────

/// Distance in metres between two coordinates.
pub trait DistanceMetric: Send + Sync {
    fn distance_m(&self, a: Coordinate, b: Coordinate) -> f64;
}

/// Great-circle distance on a spherical Earth.
#[derive(Copy, Clone, Debug, Default)]
pub struct Haversine;

impl DistanceMetric for Haversine {
    #[inline]
    fn distance_m(&self, a: Coordinate, b: Coordinate) -> f64 {
        a.distance_m(b)
    }
}

// ── Join ──────────────────────────────────────────────────────────────────────

/// Counts returned by [`HazardJoin::annotate_segments`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct JoinReport {
    pub matched:   usize,
    pub unmatched: usize,
}

/// Nearest-sample lookup over a borrowed sample set.
pub struct HazardJoin<'a, M: DistanceMetric = Haversine> {
    samples:        &'a [HazardSample],
    metric:         M,
    max_distance_m: f64,
}

impl<'a> HazardJoin<'a, Haversine> {
    pub fn new(samples: &'a [HazardSample], max_distance_m: f64) -> Self {
        Self::with_metric(samples, max_distance_m, Haversine)
    }
}

impl<'a, M: DistanceMetric> HazardJoin<'a, M> {
    pub fn with_metric(samples: &'a [HazardSample], max_distance_m: f64, metric: M) -> Self {
        Self { samples, metric, max_distance_m }
    }

    pub fn max_distance_m(&self) -> f64 {
        self.max_distance_m
    }

    /// Attributes of the sample nearest to `target`, if it lies within
    /// `max_distance_m` (inclusive).  On equal distances the earlier sample
    /// wins.
    pub fn nearest(&self, target: Coordinate) -> Option<HazardAttributes> {
        let mut best: Option<(usize, f64)> = None;
        for (i, s) in self.samples.iter().enumerate() {
            let d = self.metric.distance_m(target, s.position);
            if !d.is_nan() && best.is_none_or(|(_, bd)| d < bd) {
                best = Some((i, d));
            }
        }

        let (i, distance_m) = best?;
        if distance_m > self.max_distance_m {
            log::trace!(
                "no hazard sample within {} m of {target} (nearest {distance_m:.1} m)",
                self.max_distance_m
            );
            return None;
        }

        let s = &self.samples[i];
        Some(HazardAttributes {
            sample: i,
            distance_m,
            flood_height:  s.flood_height,
            elevation:     s.elevation,
            precipitation: s.precipitation,
        })
    }

    /// Join every segment at its `anchor` point and store the result in
    /// [`RoadSegment::hazard`] (overwriting any previous join).
    pub fn annotate_segments(&self, segments: &mut [RoadSegment], anchor: JoinAnchor) -> JoinReport {
        let annotate = |seg: &mut RoadSegment| -> bool {
            seg.hazard = seg.anchor(anchor).and_then(|p| self.nearest(p));
            seg.hazard.is_some()
        };

        #[cfg(feature = "parallel")]
        let matched = segments.par_iter_mut().map(annotate).filter(|&m| m).count();

        #[cfg(not(feature = "parallel"))]
        let matched = segments.iter_mut().map(annotate).filter(|&m| m).count();

        let report = JoinReport { matched, unmatched: segments.len() - matched };
        log::info!(
            "hazard join: {} of {} segments matched a sample within {} m",
            report.matched,
            segments.len(),
            self.max_distance_m
        );
        report
    }
}

/// One-shot haversine join of a single target.  See [`HazardJoin::nearest`].
pub fn join(
    target: Coordinate,
    samples: &[HazardSample],
    max_distance_m: f64,
) -> Option<HazardAttributes> {
    HazardJoin::new(samples, max_distance_m).nearest(target)
}
