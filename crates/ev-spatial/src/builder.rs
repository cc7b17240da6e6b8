//! Graph construction from road segments.
//!
//! # Edge insertion policy
//!
//! Edges are keyed by their normalized `(from, to)` node pair and the
//! **first** proposal wins.  Overlapping segments that describe the same
//! physical stretch therefore never overwrite or average an existing edge;
//! later proposals are dropped and counted in [`BuildReport`].

use rustc_hash::{FxHashMap, FxHashSet};

use ev_core::{CoordKey, Coordinate, NetworkConfig, NodeId, SegmentId, Severity};

use crate::network::{bulk_load_index, EdgeOrigin, NodeIndex, RoadNetwork};
use crate::{GeometryError, RoadSegment};

// ── Edge attributes ───────────────────────────────────────────────────────────

/// Everything stored on a directed edge besides its endpoints.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct EdgeAttrs {
    /// Physical length share in metres; the base traversal cost.
    pub length_m:      f64,
    pub hazard_scalar: Option<f64>,
    pub severity:      Severity,
    pub flooded:       bool,
    pub origin:        EdgeOrigin,
}

impl EdgeAttrs {
    /// A hazard-free edge of the given length.
    pub fn plain(length_m: f64, origin: EdgeOrigin) -> Self {
        Self {
            length_m,
            hazard_scalar: None,
            severity: Severity::None,
            flooded: false,
            origin,
        }
    }
}

/// Outcome of proposing one directed edge.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum EdgeInsert {
    Inserted,
    /// `(from, to)` already existed; the proposal was dropped.
    Duplicate,
    /// `from == to` after normalization; never stored.
    SelfLoop,
    /// `length_m` is not a finite positive number; never stored.
    InvalidCost,
}

// ── Report ────────────────────────────────────────────────────────────────────

/// Counters accumulated while building, returned by
/// [`build_network`](crate::build_network).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub segments_used:    usize,
    /// Segments rejected for malformed geometry (logged and skipped).
    pub segments_skipped: usize,
    pub edges_inserted:   usize,
    pub duplicate_edges:  usize,
    pub self_loops:       usize,
    /// Edges refused for a non-finite or non-positive length.
    pub invalid_costs:    usize,
    /// Bidirectional pairs added by densification.
    pub densified_pairs:  usize,
}

// ── RoadNetworkBuilder ────────────────────────────────────────────────────────

struct RawEdge {
    from:  NodeId,
    to:    NodeId,
    attrs: EdgeAttrs,
}

/// Construct a [`RoadNetwork`] incrementally, then call [`build`](Self::build).
///
/// Nodes are created implicitly from normalized coordinates; adding the same
/// coordinate twice (after rounding) returns the same `NodeId`.
///
/// # Example
///
/// ```
/// use ev_core::Coordinate;
/// use ev_spatial::{RoadNetworkBuilder, RoadSegment};
///
/// let mut b = RoadNetworkBuilder::new(5);
/// let seg = RoadSegment::new(
///     vec![Coordinate::new(121.10, 14.70), Coordinate::new(121.11, 14.70)],
///     1_076.0,
/// );
/// b.add_segment(ev_core::SegmentId(0), &seg, &Default::default()).unwrap();
/// let net = b.build();
/// assert_eq!(net.node_count(), 2);
/// assert_eq!(net.edge_count(), 1); // directed
/// ```
pub struct RoadNetworkBuilder {
    precision:  u32,
    nodes:      Vec<Coordinate>,
    node_index: FxHashMap<CoordKey, NodeId>,
    raw_edges:  Vec<RawEdge>,
    edge_index: FxHashSet<(NodeId, NodeId)>,
    /// Built by the densifier; dropped whenever a node is added afterwards.
    pub(crate) spatial_idx: Option<NodeIndex>,
    pub(crate) report:      BuildReport,
}

impl RoadNetworkBuilder {
    pub fn new(precision: u32) -> Self {
        Self::with_capacity(precision, 0, 0)
    }

    /// Pre-allocate for the expected number of nodes and edges.
    pub fn with_capacity(precision: u32, nodes: usize, edges: usize) -> Self {
        Self {
            precision,
            nodes:       Vec::with_capacity(nodes),
            node_index:  FxHashMap::with_capacity_and_hasher(nodes, Default::default()),
            raw_edges:   Vec::with_capacity(edges),
            edge_index:  FxHashSet::with_capacity_and_hasher(edges, Default::default()),
            spatial_idx: None,
            report:      BuildReport::default(),
        }
    }

    /// Add every segment in order, skipping (and logging) malformed ones.
    pub fn from_segments(segments: &[RoadSegment], config: &NetworkConfig) -> Self {
        let coord_count: usize = segments.iter().map(|s| s.coords.len()).sum();
        let mut b = Self::with_capacity(config.precision, coord_count, coord_count);
        for (i, seg) in segments.iter().enumerate() {
            let id = SegmentId::from_index(i);
            if let Err(err) = b.add_segment(id, seg, config) {
                log::warn!("skipping segment {id}: {err}");
            }
        }
        log::info!(
            "built {} nodes / {} edges from {} segments ({} skipped, {} duplicate edges, {} self-loops)",
            b.node_count(),
            b.edge_count(),
            b.report.segments_used,
            b.report.segments_skipped,
            b.report.duplicate_edges,
            b.report.self_loops,
        );
        b
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.raw_edges.len()
    }

    pub fn report(&self) -> &BuildReport {
        &self.report
    }

    // ── Nodes ─────────────────────────────────────────────────────────────

    /// Return the node for `coord` (normalized), creating it if new.
    pub fn add_node(&mut self, coord: Coordinate) -> NodeId {
        self.node_for_key(coord.key(self.precision))
    }

    fn node_for_key(&mut self, key: CoordKey) -> NodeId {
        if let Some(&id) = self.node_index.get(&key) {
            return id;
        }
        let id = NodeId::from_index(self.nodes.len());
        self.nodes.push(key.to_coordinate(self.precision));
        self.node_index.insert(key, id);
        self.spatial_idx = None;
        id
    }

    /// The existing node for `coord`, if any.
    pub fn node_id(&self, coord: Coordinate) -> Option<NodeId> {
        self.node_index.get(&coord.key(self.precision)).copied()
    }

    /// Normalized position of a node added earlier.
    pub fn node_pos(&self, id: NodeId) -> Coordinate {
        self.nodes[id.index()]
    }

    pub(crate) fn nodes(&self) -> &[Coordinate] {
        &self.nodes
    }

    // ── Edges ─────────────────────────────────────────────────────────────

    pub fn has_edge(&self, from: NodeId, to: NodeId) -> bool {
        self.edge_index.contains(&(from, to))
    }

    /// `true` if an edge exists in either direction.
    pub fn connected(&self, a: NodeId, b: NodeId) -> bool {
        self.has_edge(a, b) || self.has_edge(b, a)
    }

    /// Propose a **directed** edge.  First write wins; self-loops and
    /// edges without a finite positive length are refused.
    pub fn add_directed_edge(&mut self, from: NodeId, to: NodeId, attrs: EdgeAttrs) -> EdgeInsert {
        if from == to {
            self.report.self_loops += 1;
            return EdgeInsert::SelfLoop;
        }
        if !(attrs.length_m.is_finite() && attrs.length_m > 0.0) {
            self.report.invalid_costs += 1;
            return EdgeInsert::InvalidCost;
        }
        if !self.edge_index.insert((from, to)) {
            self.report.duplicate_edges += 1;
            return EdgeInsert::Duplicate;
        }
        self.raw_edges.push(RawEdge { from, to, attrs });
        self.report.edges_inserted += 1;
        EdgeInsert::Inserted
    }

    /// Propose edges in **both directions** with the same attributes.
    pub fn add_road(&mut self, a: NodeId, b: NodeId, attrs: EdgeAttrs) -> (EdgeInsert, EdgeInsert) {
        (self.add_directed_edge(a, b, attrs), self.add_directed_edge(b, a, attrs))
    }

    /// Convert one polyline into directed edges.
    ///
    /// Each consecutive vertex pair `(a, b)` becomes an edge `a → b` costing
    /// `length_m / (coords.len() - 1)`.  Pairs that collapse to one node are
    /// skipped, and nodes are only created for pairs that yield an edge, so
    /// no isolated nodes are left behind.  Returns the number of edges
    /// inserted.
    pub fn add_segment(
        &mut self,
        id:      SegmentId,
        segment: &RoadSegment,
        config:  &NetworkConfig,
    ) -> Result<usize, GeometryError> {
        if let Err(err) = segment.validate() {
            self.report.segments_skipped += 1;
            return Err(err);
        }

        let attrs = EdgeAttrs {
            length_m:      segment.sub_segment_length_m(),
            hazard_scalar: segment.hazard_scalar,
            severity:      segment.severity(config.severity_thresholds.as_ref()),
            flooded:       born_flooded(segment, config),
            origin:        EdgeOrigin::Segment(id),
        };

        let keys: Vec<CoordKey> = segment
            .coords
            .iter()
            .map(|c| c.key(self.precision))
            .collect();

        let mut inserted = 0;
        for pair in keys.windows(2) {
            let (ka, kb) = (pair[0], pair[1]);
            if ka == kb {
                self.report.self_loops += 1;
                continue;
            }
            let a = self.node_for_key(ka);
            let b = self.node_for_key(kb);
            if self.add_directed_edge(a, b, attrs) == EdgeInsert::Inserted {
                inserted += 1;
            }
            if config.bidirectional && self.add_directed_edge(b, a, attrs) == EdgeInsert::Inserted {
                inserted += 1;
            }
        }

        self.report.segments_used += 1;
        Ok(inserted)
    }

    // ── Freeze ────────────────────────────────────────────────────────────

    /// Consume the builder and produce a [`RoadNetwork`].
    ///
    /// Time complexity: O(E log E) for the edge sort, plus O(N log N) for the
    /// R-tree bulk load when the densifier has not already built one.
    pub fn build(self) -> RoadNetwork {
        let node_count = self.nodes.len();
        let edge_count = self.raw_edges.len();

        // Stable: edges of one node keep insertion order.
        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.from.0);

        let edge_from:          Vec<NodeId>      = raw.iter().map(|e| e.from).collect();
        let edge_to:            Vec<NodeId>      = raw.iter().map(|e| e.to).collect();
        let edge_length_m:      Vec<f64>         = raw.iter().map(|e| e.attrs.length_m).collect();
        let edge_hazard_scalar: Vec<Option<f64>> = raw.iter().map(|e| e.attrs.hazard_scalar).collect();
        let edge_severity:      Vec<Severity>    = raw.iter().map(|e| e.attrs.severity).collect();
        let edge_flooded:       Vec<bool>        = raw.iter().map(|e| e.attrs.flooded).collect();
        let edge_origin:        Vec<EdgeOrigin>  = raw.iter().map(|e| e.attrs.origin).collect();

        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

        let spatial_idx = match self.spatial_idx {
            Some(idx) => idx,
            None => bulk_load_index(&self.nodes),
        };

        RoadNetwork::from_parts(
            self.precision,
            self.nodes,
            self.node_index,
            node_out_start,
            edge_from,
            edge_to,
            edge_length_m,
            edge_hazard_scalar,
            edge_severity,
            edge_flooded,
            edge_origin,
            spatial_idx,
        )
    }
}

fn born_flooded(segment: &RoadSegment, config: &NetworkConfig) -> bool {
    match (config.flood_height_threshold_m, &segment.hazard) {
        (Some(threshold), Some(h)) => h.flood_height >= threshold,
        _ => false,
    }
}
