//! The `NetworkWriter` trait implemented by backend writers.

use ev_spatial::{CostView, RoadNetwork};

use crate::{edge_rows, node_rows, EdgeRow, NodeRow, OutputResult};

/// Trait implemented by network output backends.
pub trait NetworkWriter {
    /// Write a batch of node rows.
    fn write_nodes(&mut self, rows: &[NodeRow]) -> OutputResult<()>;

    /// Write a batch of edge rows.
    fn write_edges(&mut self, rows: &[EdgeRow]) -> OutputResult<()>;

    /// Flush all underlying handles.
    ///
    /// Idempotent; safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}

/// Write every node and edge of `network` to `writer`, then finish it.
pub fn export<W: NetworkWriter + ?Sized>(
    network: &RoadNetwork,
    costs:   &CostView,
    writer:  &mut W,
) -> OutputResult<()> {
    let nodes: Vec<NodeRow> = node_rows(network).collect();
    let edges: Vec<EdgeRow> = edge_rows(network, costs).collect();
    writer.write_nodes(&nodes)?;
    writer.write_edges(&edges)?;
    writer.finish()?;
    log::info!("exported {} nodes and {} edges", nodes.len(), edges.len());
    Ok(())
}
