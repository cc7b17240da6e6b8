//! Hazard-weighted edge costs and query-time flood overrides.
//!
//! # Cost formula
//!
//! ```text
//! cost(e) = edge_length_m[e] * penalties.multiplier(severity(e), flooded(e))
//! ```
//!
//! Every multiplier is finite and at least 1.0, so a flooded edge is heavily
//! discouraged but stays traversable as a last resort.
//!
//! # Overrides
//!
//! A [`CostView`] is computed in full from the network, a [`CostModel`] and a
//! [`FloodOverrides`] set before any routing call reads it.  The network is
//! never mutated; discarding the view revokes the overrides.

use ev_core::{Coordinate, CoreResult, EdgeId, NetworkConfig, PenaltyTable, Severity};

use crate::RoadNetwork;

// ── Overrides ─────────────────────────────────────────────────────────────────

/// Edges to treat as flooded for one set of queries.
#[derive(Clone, Debug, Default)]
pub struct FloodOverrides {
    edges:            Vec<(Coordinate, Coordinate)>,
    replace_attached: bool,
}

impl FloodOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the directed edge `from → to` flooded.
    pub fn flood(mut self, from: Coordinate, to: Coordinate) -> Self {
        self.edges.push((from, to));
        self
    }

    /// Mark both `a → b` and `b → a` flooded.
    pub fn flood_both(self, a: Coordinate, b: Coordinate) -> Self {
        self.flood(a, b).flood(b, a)
    }

    /// Ignore the severity and flooded flags attached at build time; only
    /// this override set contributes hazard penalties.
    pub fn replace_attached(mut self) -> Self {
        self.replace_attached = true;
        self
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

// ── Model ─────────────────────────────────────────────────────────────────────

/// Maps edges to final traversal costs using a validated [`PenaltyTable`].
#[derive(Clone, Debug, Default)]
pub struct CostModel {
    penalties: PenaltyTable,
}

impl CostModel {
    /// Fails if `penalties` is not finite, `>= 1.0` and monotonic.
    pub fn new(penalties: PenaltyTable) -> CoreResult<Self> {
        penalties.validate()?;
        Ok(Self { penalties })
    }

    pub fn from_config(config: &NetworkConfig) -> CoreResult<Self> {
        Self::new(config.penalties)
    }

    pub fn penalties(&self) -> &PenaltyTable {
        &self.penalties
    }

    /// Final cost of one edge given its hazard state.
    #[inline]
    pub fn cost(&self, length_m: f64, severity: Severity, flooded: bool) -> f64 {
        length_m * self.penalties.multiplier(severity, flooded)
    }

    /// Costs with only the attributes attached at build time.
    pub fn base_view(&self, network: &RoadNetwork) -> CostView {
        self.view(network, &FloodOverrides::default())
    }

    /// Compute every edge's cost under `overrides`.
    ///
    /// Override pairs are normalized with the network precision.  Pairs that
    /// name no existing edge are counted in
    /// [`CostView::unresolved_overrides`] and otherwise ignored.
    pub fn view(&self, network: &RoadNetwork, overrides: &FloodOverrides) -> CostView {
        let n = network.edge_count();
        let (severity, mut flooded) = if overrides.replace_attached {
            (vec![Severity::None; n], vec![false; n])
        } else {
            (network.edge_severity.clone(), network.edge_flooded.clone())
        };

        let mut unresolved = 0;
        for &(from, to) in &overrides.edges {
            match network.edge_between(from, to) {
                Some(e) => flooded[e.index()] = true,
                None => {
                    log::warn!("flood override {from} -> {to} matches no edge");
                    unresolved += 1;
                }
            }
        }

        let costs = (0..n)
            .map(|i| self.cost(network.edge_length_m[i], severity[i], flooded[i]))
            .collect();

        CostView { costs, flooded, unresolved }
    }
}

// ── View ──────────────────────────────────────────────────────────────────────

/// Per-edge final costs for a batch of routing queries.
#[derive(Clone, Debug)]
pub struct CostView {
    costs:      Vec<f64>,
    flooded:    Vec<bool>,
    unresolved: usize,
}

impl CostView {
    /// Physical length as cost; no hazard penalties at all.
    pub fn distance_only(network: &RoadNetwork) -> Self {
        Self {
            costs:      network.edge_length_m.clone(),
            flooded:    vec![false; network.edge_count()],
            unresolved: 0,
        }
    }

    #[inline]
    pub fn cost(&self, edge: EdgeId) -> f64 {
        self.costs[edge.index()]
    }

    /// Whether `edge` is flooded in this view (attached or overridden).
    #[inline]
    pub fn is_flooded(&self, edge: EdgeId) -> bool {
        self.flooded[edge.index()]
    }

    pub fn len(&self) -> usize {
        self.costs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }

    /// Override pairs that matched no edge.
    pub fn unresolved_overrides(&self) -> usize {
        self.unresolved
    }
}
