//! Error type shared by every stage of the conversion.
//!
//! All variants are fatal: the conversion stops at the first one and no
//! partial document is produced. Each message names the module and, where
//! it applies, the port, cell or net at fault.

use crate::netlist::NetId;
use gatediagram_layout::LayoutError;
use thiserror::Error;

/// Result alias used throughout this crate.
pub type Result<T> = std::result::Result<T, DiagramError>;

#[derive(Error, Debug)]
pub enum DiagramError {
    #[error("module `{module}`: {} has direction `{direction}`, expected {expected}", port_ref(.cell, .port))]
    InvalidPortDirection {
        module: String,
        cell: Option<String>,
        port: String,
        direction: String,
        expected: String,
    },

    #[error("module `{module}`: {} is {width} bits wide; only single-bit ports are supported", port_ref(.cell, .port))]
    InvalidPortWidth {
        module: String,
        cell: Option<String>,
        port: String,
        width: usize,
    },

    #[error("module `{module}`: cell `{cell}` connects port `{port}`, which type `{cell_type}` does not have")]
    MissingPortMapping {
        module: String,
        cell: String,
        cell_type: String,
        port: String,
    },

    #[error("module hierarchy is recursive; cannot order {}", .modules.join(", "))]
    CyclicDependency { modules: Vec<String> },

    #[error("netlist has {} top-level modules ({}); exactly one is required", .roots.len(), .roots.join(", "))]
    AmbiguousRoot { roots: Vec<String> },

    #[error("netlist defines no modules")]
    EmptyNetlist,

    #[error("module `{module}`: net {net} is driven by both {first} and {second}")]
    MultipleDrivers {
        module: String,
        net: NetId,
        first: String,
        second: String,
    },

    #[error("module `{module}`: net {net} has {listeners} listener(s) but no driver")]
    UnresolvedNet {
        module: String,
        net: NetId,
        listeners: usize,
    },

    #[error("module `{module}`: layout failed: {source}")]
    Layout {
        module: String,
        #[source]
        source: LayoutError,
    },

    #[error("viewer name `{viewer}` is not a dotted JavaScript identifier")]
    InvalidViewerName { viewer: String },

    #[error("failed to parse netlist JSON: {0}")]
    Json(#[from] serde_json::Error),
}

fn port_ref(cell: &Option<String>, port: &str) -> String {
    match cell {
        Some(cell) => format!("port `{port}` of cell `{cell}`"),
        None => format!("port `{port}`"),
    }
}
