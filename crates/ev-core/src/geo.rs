//! Geographic coordinate type, normalization, and distance utilities.
//!
//! `Coordinate` uses `f64` longitude/latitude.  Node identity depends on
//! rounding to 5–6 decimal places (≈ 1 m – 10 cm), which single precision
//! cannot represent at longitudes above 100°.
//!
//! # Node identity
//!
//! Two raw coordinates are the same node exactly when their [`CoordKey`]s at
//! the network precision are equal.  The key holds each axis scaled by
//! `10^precision` and rounded half away from zero, so equality never depends
//! on floating-point comparison of the rounded values.

use std::fmt;

/// Mean Earth radius in metres (IUGG).
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Highest supported rounding precision.  Beyond 9 decimals the scaled
/// integer key would exceed the resolution of the input data anyway.
pub const MAX_PRECISION: u32 = 9;

/// A WGS-84 `(longitude, latitude)` pair in degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    pub lon: f64,
    pub lat: f64,
}

impl Coordinate {
    #[inline]
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// `true` if both axes are finite numbers.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.lon.is_finite() && self.lat.is_finite()
    }

    /// Round both axes to `precision` decimal digits.  See [`normalize`].
    #[inline]
    pub fn normalized(self, precision: u32) -> Coordinate {
        normalize(self, precision)
    }

    /// Canonical identity of this coordinate at `precision`.
    #[inline]
    pub fn key(self, precision: u32) -> CoordKey {
        CoordKey::new(self, precision)
    }

    /// Haversine great-circle distance in metres.
    pub fn distance_m(self, other: Coordinate) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_M * c
    }

    /// Squared planar distance in degree space.  Used for nearest-neighbour
    /// ordering only; never reported as a distance.
    #[inline]
    pub fn planar_distance_2(self, other: Coordinate) -> f64 {
        let dlon = self.lon - other.lon;
        let dlat = self.lat - other.lat;
        dlon * dlon + dlat * dlat
    }

    /// `[lon, lat]` array form, as stored in the R-tree.
    #[inline]
    pub fn to_array(self) -> [f64; 2] {
        [self.lon, self.lat]
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from([lon, lat]: [f64; 2]) -> Self {
        Self { lon, lat }
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((lon, lat): (f64, f64)) -> Self {
        Self { lon, lat }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.7}, {:.7})", self.lon, self.lat)
    }
}

// ── Normalization ─────────────────────────────────────────────────────────────

#[inline]
fn scale(precision: u32) -> f64 {
    10f64.powi(precision.min(MAX_PRECISION) as i32)
}

/// Round each axis of `coord` to `precision` decimal digits.
///
/// Precision above [`MAX_PRECISION`] is clamped.  The result is the
/// representative coordinate of the node that `coord` belongs to.
pub fn normalize(coord: Coordinate, precision: u32) -> Coordinate {
    CoordKey::new(coord, precision).to_coordinate(precision)
}

/// Hashable canonical identity of a coordinate at a fixed precision.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CoordKey {
    pub lon: i64,
    pub lat: i64,
}

impl CoordKey {
    pub fn new(coord: Coordinate, precision: u32) -> Self {
        let s = scale(precision);
        Self {
            lon: (coord.lon * s).round() as i64,
            lat: (coord.lat * s).round() as i64,
        }
    }

    /// The normalized coordinate this key stands for.
    pub fn to_coordinate(self, precision: u32) -> Coordinate {
        let s = scale(precision);
        Coordinate::new(self.lon as f64 / s, self.lat as f64 / s)
    }
}
