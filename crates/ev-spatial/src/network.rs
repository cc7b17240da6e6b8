//! Frozen road network and query snapping.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `NodeId n`, its outgoing edges occupy the slice:
//!
//! ```text
//! edge_from[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! All edge arrays are sorted by source node and indexed by `EdgeId`.  The
//! sort is stable, so the edges of one node keep their insertion order; the
//! router's tie-breaking between equal-cost paths follows that order.
//!
//! # Node identity
//!
//! A node *is* its normalized coordinate.  `node_index` maps the
//! [`CoordKey`] at the network precision to the dense `NodeId`, and every
//! coordinate lookup is normalized with that same precision.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) over `[lon, lat]` maps arbitrary coordinates to
//! the nearest node.  It is built once by the densifier (or by
//! [`RoadNetworkBuilder::build`](crate::RoadNetworkBuilder::build) when
//! densification is off) and reused for every snap.

use rstar::{RTree, AABB};
use rstar::primitives::GeomWithData;
use rustc_hash::FxHashMap;

use ev_core::geo::EARTH_RADIUS_M;
use ev_core::{CoordKey, Coordinate, EdgeId, NodeId, SegmentId, Severity};

use crate::{SpatialError, SpatialResult};

/// R-tree entry: a `[lon, lat]` point tagged with its node.
pub(crate) type NodeEntry = GeomWithData<[f64; 2], NodeId>;
pub(crate) type NodeIndex = RTree<NodeEntry>;

pub(crate) fn bulk_load_index(nodes: &[Coordinate]) -> NodeIndex {
    let entries: Vec<NodeEntry> = nodes
        .iter()
        .enumerate()
        .map(|(i, pos)| NodeEntry::new(pos.to_array(), NodeId::from_index(i)))
        .collect();
    RTree::bulk_load(entries)
}

// ── Edge provenance ───────────────────────────────────────────────────────────

/// Where an edge came from.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EdgeOrigin {
    /// A sub-segment of an input road segment.
    Segment(SegmentId),
    /// A nearest-neighbour link added by densification.
    Densified,
    /// Added directly through the builder API.
    Manual,
}

impl EdgeOrigin {
    pub fn as_str(self) -> &'static str {
        match self {
            EdgeOrigin::Segment(_) => "segment",
            EdgeOrigin::Densified  => "densified",
            EdgeOrigin::Manual     => "manual",
        }
    }
}

// ── Snap ──────────────────────────────────────────────────────────────────────

/// Result of snapping a query coordinate onto the network.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Snap {
    pub node:       NodeId,
    /// Normalized coordinate of `node`.
    pub position:   Coordinate,
    /// Geodesic distance from the query to `position`, metres.
    pub distance_m: f64,
}

// ── RoadNetwork ───────────────────────────────────────────────────────────────

/// Directed, hazard-annotated road graph in CSR format plus a spatial index.
///
/// All edge fields are `pub` for direct indexed access on hot paths.  Do not
/// construct directly; use [`RoadNetworkBuilder`](crate::RoadNetworkBuilder)
/// or [`build_network`](crate::build_network).
///
/// The network is immutable once built.  Query-time flooding is expressed as
/// a [`CostView`](crate::CostView), never by mutating the graph.
pub struct RoadNetwork {
    // ── Node data ─────────────────────────────────────────────────────────
    /// Normalized position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<Coordinate>,

    // ── CSR edge adjacency ────────────────────────────────────────────────
    /// CSR row pointer.  Outgoing edges of node `n` are at EdgeIds
    /// `node_out_start[n] .. node_out_start[n+1]`.
    /// Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    // ── Edge data (indexed by EdgeId = position in sorted order) ──────────
    /// Source node of each edge.  Redundant with CSR but required for
    /// route reconstruction.
    pub edge_from: Vec<NodeId>,

    /// Destination node of each edge.
    pub edge_to: Vec<NodeId>,

    /// Physical length share in metres.  This is the base traversal cost.
    pub edge_length_m: Vec<f64>,

    /// Continuous hazard scalar inherited from the source segment.
    pub edge_hazard_scalar: Vec<Option<f64>>,

    /// Resolved severity tier.
    pub edge_severity: Vec<Severity>,

    /// Flooded at build time (from the joined flood height).
    pub edge_flooded: Vec<bool>,

    pub edge_origin: Vec<EdgeOrigin>,

    precision:   u32,
    node_index:  FxHashMap<CoordKey, NodeId>,
    spatial_idx: NodeIndex,
}

impl RoadNetwork {
    /// Construct an empty network with no nodes or edges.
    ///
    /// Every snap against an empty network fails with
    /// [`SpatialError::EmptyNetwork`].
    pub fn empty(precision: u32) -> Self {
        crate::RoadNetworkBuilder::new(precision).build()
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        precision:          u32,
        node_pos:           Vec<Coordinate>,
        node_index:         FxHashMap<CoordKey, NodeId>,
        node_out_start:     Vec<u32>,
        edge_from:          Vec<NodeId>,
        edge_to:            Vec<NodeId>,
        edge_length_m:      Vec<f64>,
        edge_hazard_scalar: Vec<Option<f64>>,
        edge_severity:      Vec<Severity>,
        edge_flooded:       Vec<bool>,
        edge_origin:        Vec<EdgeOrigin>,
        spatial_idx:        NodeIndex,
    ) -> Self {
        Self {
            node_pos,
            node_out_start,
            edge_from,
            edge_to,
            edge_length_m,
            edge_hazard_scalar,
            edge_severity,
            edge_flooded,
            edge_origin,
            precision,
            node_index,
            spatial_idx,
        }
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    /// Decimal precision used for node identity.
    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    // ── Nodes ─────────────────────────────────────────────────────────────

    /// The node whose normalized coordinate equals `coord` normalized.
    pub fn node_at(&self, coord: Coordinate) -> Option<NodeId> {
        self.node_index.get(&coord.key(self.precision)).copied()
    }

    /// Like [`node_at`](Self::node_at), failing with `NodeNotFound`.
    pub fn require_node(&self, coord: Coordinate) -> SpatialResult<NodeId> {
        self.node_at(coord).ok_or(SpatialError::NodeNotFound(coord))
    }

    #[inline]
    pub fn node_coord(&self, node: NodeId) -> Coordinate {
        self.node_pos[node.index()]
    }

    #[inline]
    pub fn contains_node(&self, node: NodeId) -> bool {
        node.index() < self.node_pos.len()
    }

    /// Cleaned node list: every node with its normalized coordinate.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, Coordinate)> + '_ {
        self.node_pos
            .iter()
            .enumerate()
            .map(|(i, &pos)| (NodeId::from_index(i), pos))
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the `EdgeId`s of all outgoing edges from `node`.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId::from_index(i))
    }

    /// Out-degree of `node` (number of outgoing edges).
    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    /// The directed edge `from → to`, if present.
    pub fn find_edge(&self, from: NodeId, to: NodeId) -> Option<EdgeId> {
        if !self.contains_node(from) {
            return None;
        }
        self.out_edges(from).find(|e| self.edge_to[e.index()] == to)
    }

    /// Directed edge between two coordinates (both normalized first).
    pub fn edge_between(&self, from: Coordinate, to: Coordinate) -> Option<EdgeId> {
        self.find_edge(self.node_at(from)?, self.node_at(to)?)
    }

    #[inline]
    pub fn edge_endpoints(&self, edge: EdgeId) -> (NodeId, NodeId) {
        (self.edge_from[edge.index()], self.edge_to[edge.index()])
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Nearest node to `pos` by planar degree distance.
    ///
    /// Returns `None` only if the network has no nodes.
    pub fn nearest_node(&self, pos: Coordinate) -> Option<NodeId> {
        self.spatial_idx.nearest_neighbor(&pos.to_array()).map(|e| e.data)
    }

    /// Up to `k` nearest nodes to `pos`, sorted by ascending distance.
    pub fn k_nearest_nodes(&self, pos: Coordinate, k: usize) -> Vec<NodeId> {
        self.spatial_idx
            .nearest_neighbor_iter(&pos.to_array())
            .take(k)
            .map(|e| e.data)
            .collect()
    }

    /// Snap `query` to its nearest node within `max_distance_m` (geodesic).
    ///
    /// Nearness is ranked in degree space first.  Away from the equator a
    /// degree of longitude is shorter than a degree of latitude, so when the
    /// planar-nearest node is beyond the cut-off the nodes inside a
    /// `max_distance_m` envelope are re-ranked geodesically and the closest
    /// in range wins.  Fails with `SnapOutOfRange` (reporting the
    /// planar-nearest distance) only when no node is in range.
    pub fn snap(&self, query: Coordinate, max_distance_m: f64) -> SpatialResult<Snap> {
        let node = self.nearest_node(query).ok_or(SpatialError::EmptyNetwork)?;
        let nearest = self.snap_to(query, node);
        if nearest.distance_m <= max_distance_m {
            return Ok(nearest);
        }
        let candidates = self
            .spatial_idx
            .locate_in_envelope(&search_envelope(query, max_distance_m))
            .map(|e| e.data);
        self.closest_in_range(query, candidates, nearest, max_distance_m)
    }

    /// [`snap`](Self::snap) by linear scan over all nodes instead of the
    /// R-tree.  Yields the same node except between exactly equidistant
    /// planar candidates, where the lowest `NodeId` wins here.
    pub fn snap_linear(&self, query: Coordinate, max_distance_m: f64) -> SpatialResult<Snap> {
        let node = self
            .nodes()
            .min_by(|(_, a), (_, b)| {
                a.planar_distance_2(query).total_cmp(&b.planar_distance_2(query))
            })
            .map(|(id, _)| id)
            .ok_or(SpatialError::EmptyNetwork)?;
        let nearest = self.snap_to(query, node);
        if nearest.distance_m <= max_distance_m {
            return Ok(nearest);
        }
        self.closest_in_range(query, self.nodes().map(|(id, _)| id), nearest, max_distance_m)
    }

    fn snap_to(&self, query: Coordinate, node: NodeId) -> Snap {
        let position = self.node_coord(node);
        Snap { node, position, distance_m: query.distance_m(position) }
    }

    /// Geodesically closest of `candidates` (lowest `NodeId` on ties), if
    /// within range.
    fn closest_in_range(
        &self,
        query:          Coordinate,
        candidates:     impl Iterator<Item = NodeId>,
        nearest:        Snap,
        max_distance_m: f64,
    ) -> SpatialResult<Snap> {
        candidates
            .map(|n| self.snap_to(query, n))
            .filter(|s| s.distance_m <= max_distance_m)
            .min_by(|a, b| a.distance_m.total_cmp(&b.distance_m).then(a.node.cmp(&b.node)))
            .ok_or(SpatialError::SnapOutOfRange {
                query,
                distance_m: nearest.distance_m,
                max_distance_m,
            })
    }
}

/// Degree-space box around `query` that contains every point within
/// `max_distance_m` of it (1% slack; the antimeridian is not handled).
fn search_envelope(query: Coordinate, max_distance_m: f64) -> AABB<[f64; 2]> {
    let m_per_deg = EARTH_RADIUS_M.to_radians();
    let d_lat = 1.01 * max_distance_m / m_per_deg;
    let poleward = (query.lat.abs() + d_lat).min(90.0);
    let d_lon = (1.01 * max_distance_m / (m_per_deg * poleward.to_radians().cos().max(1e-9))).min(180.0);
    AABB::from_corners(
        [query.lon - d_lon, query.lat - d_lat],
        [query.lon + d_lon, query.lat + d_lat],
    )
}
