//! Routing trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! Callers route through the [`Router`] trait, so an A* or contraction
//! hierarchy can replace the default [`DijkstraRouter`] without touching
//! graph construction.
//!
//! # Cost units
//!
//! Costs are `f64` read from a [`CostView`]: metres scaled by the hazard
//! penalty.  `Route::length_m` reports the unpenalized physical length.
//!
//! # Tie-breaking
//!
//! Between equal-cost paths the result depends on heap order (cost, then
//! `NodeId`) and on CSR edge order (insertion order per node).  It is
//! deterministic for one build but not guaranteed across implementations.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use ev_core::{Coordinate, EdgeId, NodeId};

use crate::cost::CostView;
use crate::network::{RoadNetwork, Snap};
use crate::{SpatialError, SpatialResult};

// ── Route ─────────────────────────────────────────────────────────────────────

/// A successful routing result: the node sequence from source to destination.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Nodes in travel order, source first.  A trivial route has one node.
    pub nodes: Vec<NodeId>,
    /// Edges in travel order; `edges.len() == nodes.len() - 1`.
    pub edges: Vec<EdgeId>,
    /// Sum of the view's edge costs.
    pub total_cost: f64,
    /// Sum of physical edge lengths, metres.
    pub length_m: f64,
}

impl Route {
    /// `true` if the source and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn source(&self) -> NodeId {
        self.nodes[0]
    }

    pub fn destination(&self) -> NodeId {
        self.nodes[self.nodes.len() - 1]
    }

    /// Normalized coordinates along the route, for rendering or for driving
    /// an agent.
    pub fn coordinates(&self, network: &RoadNetwork) -> Vec<Coordinate> {
        self.nodes.iter().map(|&n| network.node_coord(n)).collect()
    }

    /// Number of edges on the route that are flooded in `costs`.
    pub fn flooded_edges(&self, costs: &CostView) -> usize {
        self.edges.iter().filter(|&&e| costs.is_flooded(e)).count()
    }
}

/// Per-destination result of a coordinate-level query.
#[derive(Debug)]
pub struct DestinationRoute {
    pub destination: Coordinate,
    pub result:      SpatialResult<Route>,
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable routing engine.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so one router can serve queries
/// against a shared, immutable network from several threads.
pub trait Router: Send + Sync {
    /// Minimum-cost route from `from` to `to`.
    ///
    /// `from == to` yields a trivial route rather than an error.
    fn route(
        &self,
        network: &RoadNetwork,
        costs:   &CostView,
        from:    NodeId,
        to:      NodeId,
    ) -> SpatialResult<Route>;

    /// Routes from one source to several destinations, in input order.
    ///
    /// The default runs [`route`](Self::route) per destination.
    fn route_many(
        &self,
        network:      &RoadNetwork,
        costs:        &CostView,
        from:         NodeId,
        destinations: &[NodeId],
    ) -> Vec<SpatialResult<Route>> {
        destinations
            .iter()
            .map(|&to| self.route(network, costs, from, to))
            .collect()
    }
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Binary-heap Dijkstra over the CSR graph.
///
/// `route_many` runs a single search that stops once every destination has
/// been settled.
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route(
        &self,
        network: &RoadNetwork,
        costs:   &CostView,
        from:    NodeId,
        to:      NodeId,
    ) -> SpatialResult<Route> {
        self.route_many(network, costs, from, &[to])
            .pop()
            .unwrap_or(Err(SpatialError::NoPath { from, to }))
    }

    fn route_many(
        &self,
        network:      &RoadNetwork,
        costs:        &CostView,
        from:         NodeId,
        destinations: &[NodeId],
    ) -> Vec<SpatialResult<Route>> {
        if !network.contains_node(from) {
            return destinations
                .iter()
                .map(|_| Err(SpatialError::UnknownNode(from)))
                .collect();
        }

        let targets: Vec<NodeId> = destinations
            .iter()
            .copied()
            .filter(|&d| network.contains_node(d))
            .collect();
        let tree = dijkstra(network, costs, from, &targets);

        destinations
            .iter()
            .map(|&to| {
                if !network.contains_node(to) {
                    Err(SpatialError::UnknownNode(to))
                } else {
                    tree.reconstruct(network, from, to)
                }
            })
            .collect()
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

/// Heap entry.  Ordered so `BinaryHeap` (a max-heap) pops the cheapest
/// entry first; the `NodeId` secondary key makes ties deterministic.
#[derive(Copy, Clone)]
struct State {
    cost: f64,
    node: NodeId,
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for State {}

impl Ord for State {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for State {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Shortest-path tree from one source.
struct SearchTree {
    dist:      Vec<f64>,
    prev_edge: Vec<EdgeId>,
}

fn dijkstra(network: &RoadNetwork, costs: &CostView, from: NodeId, targets: &[NodeId]) -> SearchTree {
    let n = network.node_count();
    let mut dist      = vec![f64::INFINITY; n];
    let mut prev_edge = vec![EdgeId::INVALID; n];
    let mut settled   = vec![false; n];

    let mut pending = vec![false; n];
    let mut remaining = 0usize;
    for t in targets {
        if !pending[t.index()] {
            pending[t.index()] = true;
            remaining += 1;
        }
    }

    dist[from.index()] = 0.0;
    let mut heap = BinaryHeap::new();
    heap.push(State { cost: 0.0, node: from });

    while let Some(State { cost, node }) = heap.pop() {
        if settled[node.index()] {
            continue;
        }
        settled[node.index()] = true;

        if pending[node.index()] {
            pending[node.index()] = false;
            remaining -= 1;
            if remaining == 0 {
                break;
            }
        }

        for edge in network.out_edges(node) {
            let neighbor = network.edge_to[edge.index()];
            let new_cost = cost + costs.cost(edge);

            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev_edge[neighbor.index()] = edge;
                heap.push(State { cost: new_cost, node: neighbor });
            }
        }
    }

    log::trace!("dijkstra from {from}: {} of {n} nodes settled", settled.iter().filter(|&&s| s).count());
    SearchTree { dist, prev_edge }
}

impl SearchTree {
    fn reconstruct(&self, network: &RoadNetwork, from: NodeId, to: NodeId) -> SpatialResult<Route> {
        let total_cost = self.dist[to.index()];
        if !total_cost.is_finite() {
            return Err(SpatialError::NoPath { from, to });
        }

        let mut edges = Vec::new();
        let mut cur = to;
        while cur != from {
            let e = self.prev_edge[cur.index()];
            edges.push(e);
            cur = network.edge_from[e.index()];
        }
        edges.reverse();

        let mut nodes = Vec::with_capacity(edges.len() + 1);
        nodes.push(from);
        nodes.extend(edges.iter().map(|e| network.edge_to[e.index()]));

        let length_m = edges.iter().map(|e| network.edge_length_m[e.index()]).sum();
        Ok(Route { nodes, edges, total_cost, length_m })
    }
}

// ── Coordinate-level queries ──────────────────────────────────────────────────

/// Route from `source` to every destination, all given as coordinates.
///
/// Coordinates are normalized with the network precision and must match a
/// node exactly; a missing source or destination yields
/// [`SpatialError::NodeNotFound`] for the affected destinations.  Results
/// are returned in destination order.
pub fn route_between<R: Router + ?Sized>(
    router:       &R,
    network:      &RoadNetwork,
    costs:        &CostView,
    source:       Coordinate,
    destinations: &[Coordinate],
) -> Vec<DestinationRoute> {
    let Some(from) = network.node_at(source) else {
        return destinations
            .iter()
            .map(|&destination| DestinationRoute {
                destination,
                result: Err(SpatialError::NodeNotFound(source)),
            })
            .collect();
    };

    let resolved: Vec<Option<NodeId>> = destinations.iter().map(|&d| network.node_at(d)).collect();
    let known: Vec<NodeId> = resolved.iter().flatten().copied().collect();
    let mut routed = router.route_many(network, costs, from, &known).into_iter();

    destinations
        .iter()
        .zip(resolved)
        .map(|(&destination, node)| {
            let result = match node {
                Some(_) => routed
                    .next()
                    .unwrap_or(Err(SpatialError::NodeNotFound(destination))),
                None => Err(SpatialError::NodeNotFound(destination)),
            };
            DestinationRoute { destination, result }
        })
        .collect()
}

/// Snap an arbitrary `query` point onto the network, then route from the
/// snapped node.  Fails as a whole only when the snap is rejected.
pub fn route_from_point<R: Router + ?Sized>(
    router:       &R,
    network:      &RoadNetwork,
    costs:        &CostView,
    query:        Coordinate,
    max_snap_m:   f64,
    destinations: &[Coordinate],
) -> SpatialResult<(Snap, Vec<DestinationRoute>)> {
    let snap = network.snap(query, max_snap_m)?;
    log::debug!("snapped {query} to {} ({:.1} m)", snap.node, snap.distance_m);
    let routes = route_between(router, network, costs, snap.position, destinations);
    Ok((snap, routes))
}

/// The cheapest successful route among `routes`, if any.
pub fn cheapest(routes: &[DestinationRoute]) -> Option<(&DestinationRoute, &Route)> {
    routes
        .iter()
        .filter_map(|r| r.result.as_ref().ok().map(|route| (r, route)))
        .min_by(|(_, a), (_, b)| a.total_cost.total_cmp(&b.total_cost))
}
