//! CSV output backend.
//!
//! [`CsvExporter`] creates two files in the output directory:
//! - `nodes.csv`  (`lon,lat`)
//! - `edges.csv`  (`from_lon,from_lat,to_lon,to_lat,length_m,cost,severity,flooded,origin`)
//!
//! [`write_nodes`] and [`write_edges`] produce the same content on any
//! `io::Write`.

use std::fs::File;
use std::io;
use std::path::Path;

use csv::Writer;
use ev_spatial::{CostView, RoadNetwork};

use crate::writer::NetworkWriter;
use crate::{edge_rows, node_rows, EdgeRow, NodeRow, OutputResult};

const NODE_HEADER: [&str; 2] = ["lon", "lat"];
const EDGE_HEADER: [&str; 9] = [
    "from_lon", "from_lat", "to_lon", "to_lat", "length_m", "cost", "severity", "flooded", "origin",
];

/// Write the cleaned node list of `network` as CSV.
pub fn write_nodes<W: io::Write>(network: &RoadNetwork, writer: W) -> OutputResult<()> {
    let mut w = Writer::from_writer(writer);
    w.write_record(NODE_HEADER)?;
    for row in node_rows(network) {
        write_node(&mut w, &row)?;
    }
    w.flush()?;
    Ok(())
}

/// Write every directed edge of `network` with its cost under `costs`.
pub fn write_edges<W: io::Write>(network: &RoadNetwork, costs: &CostView, writer: W) -> OutputResult<()> {
    let mut w = Writer::from_writer(writer);
    w.write_record(EDGE_HEADER)?;
    for row in edge_rows(network, costs) {
        write_edge(&mut w, &row)?;
    }
    w.flush()?;
    Ok(())
}

fn write_node<W: io::Write>(w: &mut Writer<W>, row: &NodeRow) -> OutputResult<()> {
    w.write_record(&[row.lon.to_string(), row.lat.to_string()])?;
    Ok(())
}

fn write_edge<W: io::Write>(w: &mut Writer<W>, row: &EdgeRow) -> OutputResult<()> {
    w.write_record(&[
        row.from_lon.to_string(),
        row.from_lat.to_string(),
        row.to_lon.to_string(),
        row.to_lat.to_string(),
        row.length_m.to_string(),
        row.cost.to_string(),
        row.severity.to_owned(),
        (row.flooded as u8).to_string(),
        row.origin.to_owned(),
    ])?;
    Ok(())
}

/// Writes a network to `nodes.csv` and `edges.csv`.
pub struct CsvExporter {
    nodes:    Writer<File>,
    edges:    Writer<File>,
    finished: bool,
}

impl CsvExporter {
    /// Create (or truncate) the two CSV files in `dir` and write the header
    /// rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut nodes = Writer::from_path(dir.join("nodes.csv"))?;
        nodes.write_record(NODE_HEADER)?;

        let mut edges = Writer::from_path(dir.join("edges.csv"))?;
        edges.write_record(EDGE_HEADER)?;

        Ok(Self { nodes, edges, finished: false })
    }
}

impl NetworkWriter for CsvExporter {
    fn write_nodes(&mut self, rows: &[NodeRow]) -> OutputResult<()> {
        for row in rows {
            write_node(&mut self.nodes, row)?;
        }
        Ok(())
    }

    fn write_edges(&mut self, rows: &[EdgeRow]) -> OutputResult<()> {
        for row in rows {
            write_edge(&mut self.edges, row)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.nodes.flush()?;
        self.edges.flush()?;
        Ok(())
    }
}
