//! Nearest-neighbour densification.
//!
//! Independently digitized segments often stop a few metres short of each
//! other, even after rounding, which leaves the raw graph split into many
//! components.  Densification links every node to its `k - 1` nearest
//! neighbours with a bidirectional pair weighted by geodesic distance,
//! stitching those gaps without hand-authored topology.
//!
//! No node receives more than `k - 1` densified links in one pass, whether
//! they came from its own query or from its neighbours' queries.
//!
//! The R-tree built here is kept in the builder and moved into the frozen
//! [`RoadNetwork`](crate::RoadNetwork), where it serves query snapping.

use ev_core::NodeId;

use crate::builder::{EdgeAttrs, EdgeInsert, RoadNetworkBuilder};
use crate::network::{bulk_load_index, EdgeOrigin};

/// Counters returned by [`RoadNetworkBuilder::densify`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DensifyReport {
    /// Neighbour candidates examined, summed over all nodes.
    pub candidates:     usize,
    /// Candidates beyond `max_distance_m`.
    pub too_far:        usize,
    /// Candidates already connected in at least one direction.
    pub already_linked: usize,
    /// Candidates skipped because an endpoint already had `k - 1`
    /// densified links from this pass.
    pub saturated:      usize,
    /// Bidirectional pairs added.
    pub pairs_added:    usize,
}

impl RoadNetworkBuilder {
    /// Link each node to its `k - 1` nearest other nodes.
    ///
    /// A candidate already connected in either direction is left alone, as
    /// is one where either endpoint already gained `k - 1` densified links
    /// in this pass; otherwise both directions are added (subject to
    /// first-write-wins).  `k <= 1` is a no-op apart from building the
    /// spatial index.
    ///
    /// Neighbours at exactly equal distance are visited in R-tree order,
    /// which is not guaranteed to be stable across index implementations.
    pub fn densify(&mut self, k: usize, max_distance_m: Option<f64>) -> DensifyReport {
        let idx = match self.spatial_idx.take() {
            Some(idx) => idx,
            None => bulk_load_index(self.nodes()),
        };

        let mut report = DensifyReport::default();
        let per_node = k.saturating_sub(1);

        if per_node > 0 {
            let mut added = vec![0usize; self.node_count()];
            for i in 0..self.node_count() {
                let node = NodeId::from_index(i);
                let pos = self.node_pos(node);

                let neighbours: Vec<NodeId> = idx
                    .nearest_neighbor_iter(&pos.to_array())
                    .map(|e| e.data)
                    .filter(|&n| n != node)
                    .take(per_node)
                    .collect();

                for other in neighbours {
                    report.candidates += 1;

                    let distance_m = pos.distance_m(self.node_pos(other));
                    if max_distance_m.is_some_and(|max| distance_m > max) {
                        report.too_far += 1;
                        continue;
                    }
                    if self.connected(node, other) {
                        report.already_linked += 1;
                        continue;
                    }
                    if added[node.index()] >= per_node || added[other.index()] >= per_node {
                        report.saturated += 1;
                        continue;
                    }

                    let attrs = EdgeAttrs::plain(distance_m, EdgeOrigin::Densified);
                    if self.add_road(node, other, attrs) == (EdgeInsert::Inserted, EdgeInsert::Inserted) {
                        added[node.index()] += 1;
                        added[other.index()] += 1;
                        report.pairs_added += 1;
                    }
                }
            }
        }

        self.spatial_idx = Some(idx);
        self.report.densified_pairs += report.pairs_added;
        log::info!(
            "densify(k = {k}): {} candidates, {} pairs added, {} already linked, {} too far, {} saturated",
            report.candidates,
            report.pairs_added,
            report.already_linked,
            report.too_far,
            report.saturated,
        );
        report
    }
}
