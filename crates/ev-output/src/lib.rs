//! `ev-output` — node and edge list writers for a built road network.
//!
//! | Item                        | Output                                        |
//! |-----------------------------|-----------------------------------------------|
//! | [`write_nodes`]             | `lon,lat` per node, in `NodeId` order          |
//! | [`write_edges`]             | one row per directed edge with its final cost |
//! | [`CsvExporter`]             | `nodes.csv` and `edges.csv` in a directory    |
//!
//! Backends implement [`NetworkWriter`]; [`export`] drives one from a
//! network and a cost view.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ev_output::{export, CsvExporter};
//!
//! let mut out = CsvExporter::new(Path::new("./output"))?;
//! export(&network, &costs, &mut out)?;
//! ```

pub mod csv;
pub mod error;
pub mod row;
pub mod writer;


pub use csv::{write_edges, write_nodes, CsvExporter};
pub use error::{OutputError, OutputResult};
pub use row::{edge_rows, node_rows, EdgeRow, NodeRow};
pub use writer::{export, NetworkWriter};
