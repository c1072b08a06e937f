//! gatediagram — turn a gate-level JSON netlist into laid-out circuit
//! diagrams for an interactive schematic viewer.
//!
//! # Modules
//!
//! - [`netlist`] — serde model of the synthesis tool's JSON netlist
//! - [`ports`] — name → positional slot (`in0`, `out0`, ...) per device type
//! - [`deps`] — module emission order and root detection
//! - [`convert`] — devices plus one-driver/many-listeners net resolution
//! - [`diagram`] — output model and the bridge to `gatediagram-layout`
//! - [`document`] — the whole pipeline, JSON and HTML output
//! - [`config`] — YAML configuration for layout and the HTML page
//!
//! ```rust
//! let src = r#"{"modules": {"top": {
//!     "ports": {
//!         "a": {"direction": "input", "bits": [2]},
//!         "y": {"direction": "output", "bits": [3]}
//!     },
//!     "cells": {"n": {"type": "$not", "connections": {"A": [2], "Y": [3]}}}
//! }}}"#;
//! let doc = gatediagram::convert_json(src, &Default::default()).unwrap();
//! assert_eq!(doc.root.diagram.connectors.len(), 2);
//! ```

pub mod config;
pub mod convert;
pub mod deps;
pub mod diagram;
pub mod document;
pub mod error;
pub mod netlist;
pub mod ports;

pub use config::{ConfigError, DiagramConfig, HtmlConfig};
pub use diagram::{Connector, Device, DeviceId, DeviceKind, Endpoint, ModuleDiagram};
pub use document::{emit, Document, NamedDiagram};
pub use error::{DiagramError, Result};
pub use netlist::Netlist;

/// Parse a JSON netlist and emit its document.
pub fn convert_json(src: &str, config: &DiagramConfig) -> Result<Document> {
    let netlist = Netlist::from_json(src)?;
    emit(&netlist, config)
}
