//! Spatial-subsystem error types.

use thiserror::Error;

use ev_core::{Coordinate, CoreError, NodeId};

/// Errors produced by `ev-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("no node at {0} in network")]
    NodeNotFound(Coordinate),

    #[error("{0} is not a node of this network")]
    UnknownNode(NodeId),

    #[error("no path from {from} to {to}")]
    NoPath { from: NodeId, to: NodeId },

    #[error("{query} is {distance_m:.1} m from the road network (max {max_distance_m:.1} m)")]
    SnapOutOfRange {
        query:          Coordinate,
        distance_m:     f64,
        max_distance_m: f64,
    },

    #[error("network has no nodes")]
    EmptyNetwork,

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Why a road segment's geometry was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("polyline has {0} coordinate(s), need at least 2")]
    TooFewPoints(usize),

    #[error("coordinate {0} is not finite")]
    NonFiniteCoordinate(usize),

    #[error("length {0} is not a finite positive number")]
    InvalidLength(f64),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
