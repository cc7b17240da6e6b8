//! Synthetic riverside road grid and flood survey.
//!
//! A 6 × 6 street grid (~215 m blocks) east of Manila with a river running
//! north–south between the third and fourth avenues.  Streets alternate
//! direction like a one-way downtown grid, and a few segments were
//! "digitized" a couple of metres short of the junction so the raw graph is
//! fragmented until densification stitches it back together.

use ev_core::{Coordinate, HazardSample};
use ev_spatial::RoadSegment;

pub const GRID:    usize = 6;
pub const SPACING: f64   = 0.002;

const ORIGIN_LON: f64 = 121.090;
const ORIGIN_LAT: f64 = 14.630;

/// River centreline longitude.
const RIVER_LON: f64 = ORIGIN_LON + 2.5 * SPACING;

pub fn grid_point(i: usize, j: usize) -> Coordinate {
    Coordinate::new(ORIGIN_LON + i as f64 * SPACING, ORIGIN_LAT + j as f64 * SPACING)
}

/// Start vertex of the `n`-th segment, nudged ~3 m off the junction for
/// every seventh segment.
fn digitized_start(p: Coordinate, n: usize) -> Coordinate {
    if n % 7 == 3 {
        Coordinate::new(p.lon + 0.00003, p.lat)
    } else {
        p
    }
}

fn street(n: usize, from: Coordinate, to: Coordinate) -> RoadSegment {
    let mid = Coordinate::new((from.lon + to.lon) / 2.0, (from.lat + to.lat) / 2.0);
    RoadSegment::from_polyline(vec![digitized_start(from, n), mid, to])
}

/// Every block edge as one segment.  Even rows run east, odd rows west;
/// even columns run north, odd columns south.
pub fn road_segments() -> Vec<RoadSegment> {
    let mut segments = Vec::with_capacity(2 * GRID * (GRID - 1));

    for j in 0..GRID {
        for i in 0..GRID - 1 {
            let (a, b) = (grid_point(i, j), grid_point(i + 1, j));
            let (from, to) = if j % 2 == 0 { (a, b) } else { (b, a) };
            segments.push(street(segments.len(), from, to));
        }
    }
    for i in 0..GRID {
        for j in 0..GRID - 1 {
            let (a, b) = (grid_point(i, j), grid_point(i, j + 1));
            let (from, to) = if i % 2 == 0 { (a, b) } else { (b, a) };
            segments.push(street(segments.len(), from, to));
        }
    }
    segments
}

/// Flood survey on a half-block lattice.  Depth falls off linearly with
/// distance from the river and is zero two blocks away.
pub fn hazard_samples() -> Vec<HazardSample> {
    let steps = 2 * (GRID - 1) + 1;
    let mut samples = Vec::with_capacity(steps * steps);
    for i in 0..steps {
        for j in 0..steps {
            let position = Coordinate::new(
                ORIGIN_LON + i as f64 * SPACING / 2.0,
                ORIGIN_LAT + j as f64 * SPACING / 2.0,
            );
            let blocks = (position.lon - RIVER_LON).abs() / SPACING;
            let flood_height = (2.4 - 1.2 * blocks).max(0.0);
            let elevation = 8.0 + 4.0 * blocks;
            samples.push(HazardSample::new(position, flood_height, elevation, 85.0));
        }
    }
    samples
}

/// Evacuation centres, given as street addresses would be: near, not on,
/// a junction.
pub fn evacuation_centres() -> [Coordinate; 3] {
    let nudge = |p: Coordinate| Coordinate::new(p.lon + 0.00008, p.lat - 0.00005);
    [
        nudge(grid_point(0, 0)),
        nudge(grid_point(0, GRID - 1)),
        nudge(grid_point(GRID - 1, GRID - 1)),
    ]
}
