//! `ev-core` — foundational types for the evacuation routing engine.
//!
//! This crate is a dependency of every other `ev-*` crate.  It has no `ev-*`
//! dependencies and minimal external ones (only `thiserror`, plus optional
//! `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`ids`]     | `NodeId`, `EdgeId`, `SegmentId`                           |
//! | [`geo`]     | `Coordinate`, `CoordKey`, `normalize`, haversine distance |
//! | [`hazard`]  | `HazardSample`, `HazardAttributes`, `Severity`, penalties |
//! | [`config`]  | `NetworkConfig`, `JoinAnchor`                             |
//! | [`error`]   | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod hazard;
pub mod ids;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{JoinAnchor, NetworkConfig};
pub use error::{CoreError, CoreResult};
pub use geo::{normalize, CoordKey, Coordinate};
pub use hazard::{HazardAttributes, HazardSample, PenaltyTable, Severity, SeverityThresholds};
pub use ids::{EdgeId, NodeId, SegmentId};
