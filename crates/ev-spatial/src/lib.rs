//! `ev-spatial` — hazard-aware road graph, spatial indexing, and routing.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`segment`]   | `RoadSegment` (input polylines)                           |
//! | [`join`]      | `HazardJoin`, `DistanceMetric`, `join`                    |
//! | [`builder`]   | `RoadNetworkBuilder`, `EdgeAttrs`, `BuildReport`          |
//! | [`densify`]   | nearest-neighbour densification, `DensifyReport`          |
//! | [`network`]   | `RoadNetwork` (CSR + R-tree), `Snap`, `EdgeOrigin`        |
//! | [`cost`]      | `CostModel`, `CostView`, `FloodOverrides`                 |
//! | [`router`]    | `Router` trait, `DijkstraRouter`, `Route`                 |
//! | [`error`]     | `SpatialError`, `GeometryError`, `SpatialResult<T>`       |
//!
//! # Pipeline
//!
//! ```text
//! segments + samples ─▶ HazardJoin::annotate_segments
//!                    ─▶ build_network (builder + densify)
//!                    ─▶ CostModel::view (penalties + flood overrides)
//!                    ─▶ Router::route_many / route_from_point
//! ```
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                    |
//! |------------|-----------------------------------------------------------|
//! | `parallel` | Runs the per-segment hazard join on Rayon.                |
//! | `serde`    | Derives `Serialize`/`Deserialize` on public types.        |

pub mod builder;
pub mod cost;
pub mod densify;
pub mod error;
pub mod join;
pub mod network;
pub mod router;
pub mod segment;


pub use builder::{BuildReport, EdgeAttrs, EdgeInsert, RoadNetworkBuilder};
pub use cost::{CostModel, CostView, FloodOverrides};
pub use densify::DensifyReport;
pub use error::{GeometryError, SpatialError, SpatialResult};
pub use join::{join, DistanceMetric, HazardJoin, Haversine, JoinReport};
pub use network::{EdgeOrigin, RoadNetwork, Snap};
pub use router::{cheapest, route_between, route_from_point, DestinationRoute, DijkstraRouter, Route, Router};
pub use segment::RoadSegment;

use ev_core::NetworkConfig;

/// Build a frozen network from segments in one pass: validate `config`, add
/// every segment (malformed ones are logged and skipped), densify when
/// `config.densify_k > 1`, and freeze.
///
/// Only an invalid configuration is an error; bad records are reported in
/// the returned [`BuildReport`].
pub fn build_network(
    segments: &[RoadSegment],
    config:   &NetworkConfig,
) -> SpatialResult<(RoadNetwork, BuildReport)> {
    config.validate()?;

    let mut builder = RoadNetworkBuilder::from_segments(segments, config);
    if config.densify_enabled() {
        builder.densify(config.densify_k, config.densify_max_m);
    }

    let report = *builder.report();
    Ok((builder.build(), report))
}
