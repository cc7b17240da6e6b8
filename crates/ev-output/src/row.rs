//! Plain data row types written by output backends.

use ev_spatial::{CostView, RoadNetwork};

/// One node of the cleaned node list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeRow {
    pub lon: f64,
    pub lat: f64,
}

/// One directed edge with its provenance and final cost.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeRow {
    pub from_lon: f64,
    pub from_lat: f64,
    pub to_lon:   f64,
    pub to_lat:   f64,
    pub length_m: f64,
    /// Final cost under the view the rows were built with.
    pub cost:     f64,
    pub severity: &'static str,
    pub flooded:  bool,
    pub origin:   &'static str,
}

/// Node rows in `NodeId` order.
pub fn node_rows(network: &RoadNetwork) -> impl Iterator<Item = NodeRow> + '_ {
    network.nodes().map(|(_, p)| NodeRow { lon: p.lon, lat: p.lat })
}

/// Edge rows in `EdgeId` order (grouped by source node).
///
/// `costs` must have been computed for `network`.
pub fn edge_rows<'a>(network: &'a RoadNetwork, costs: &'a CostView) -> impl Iterator<Item = EdgeRow> + 'a {
    (0..network.edge_count()).map(move |i| {
        let from = network.node_pos[network.edge_from[i].index()];
        let to   = network.node_pos[network.edge_to[i].index()];
        let e    = ev_core::EdgeId::from_index(i);
        EdgeRow {
            from_lon: from.lon,
            from_lat: from.lat,
            to_lon:   to.lon,
            to_lat:   to.lat,
            length_m: network.edge_length_m[i],
            cost:     costs.cost(e),
            severity: network.edge_severity[i].as_str(),
            flooded:  costs.is_flooded(e),
            origin:   network.edge_origin[i].as_str(),
        }
    })
}
