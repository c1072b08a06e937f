//! Input schema: the JSON netlist written by a synthesis tool.
//!
//! ```json
//! {
//!   "modules": {
//!     "half_adder": {
//!       "ports": { "a": { "direction": "input", "bits": [2] }, ... },
//!       "cells": {
//!         "g0": {
//!           "type": "$and",
//!           "port_directions": { "A": "input", "B": "input", "Y": "output" },
//!           "connections": { "A": [2], "B": [3], "Y": [4] }
//!         }
//!       }
//!     }
//!   }
//! }
//! ```
//!
//! Every map keeps the order of the source document, which later serves as
//! the tie-break wherever two entries would otherwise compare equal. Fields
//! this crate does not use (`attributes`, `netnames`, ...) are ignored.
//! Directions stay plain strings here; they are checked where they are used
//! so an unexpected value surfaces as a [`DiagramError`] naming its owner.

use crate::error::{DiagramError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Read;

/// A single-bit net identifier.
pub type NetId = u64;

/// Parsed netlist document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Netlist {
    #[serde(default)]
    pub modules: IndexMap<String, Module>,
}

/// One module definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Module {
    #[serde(default)]
    pub ports: IndexMap<String, Port>,
    #[serde(default)]
    pub cells: IndexMap<String, Cell>,
}

/// A module's boundary port.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Port {
    pub direction: String,
    pub bits: Vec<NetId>,
}

/// An instantiated gate or sub-module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    #[serde(rename = "type")]
    pub cell_type: String,
    #[serde(default)]
    pub port_directions: IndexMap<String, String>,
    #[serde(default)]
    pub connections: IndexMap<String, Vec<NetId>>,
}

/// Direction of a port or cell connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortDirection {
    Input,
    Output,
}

impl PortDirection {
    /// Parse a direction tag; anything but `input`/`output` is rejected.
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "input" => Some(Self::Input),
            "output" => Some(Self::Output),
            _ => None,
        }
    }
}

impl fmt::Display for PortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => f.write_str("input"),
            Self::Output => f.write_str("output"),
        }
    }
}

impl Netlist {
    /// Parse a netlist from a JSON string.
    pub fn from_json(src: &str) -> Result<Self> {
        Ok(serde_json::from_str(src)?)
    }

    /// Parse a netlist from any reader.
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Whether `name` is the name of a module defined in this netlist.
    pub fn has_module(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }
}

impl Port {
    /// Checked direction of this port.
    pub fn direction(&self, module: &str, port: &str) -> Result<PortDirection> {
        parse_direction(&self.direction, module, None, port)
    }

    /// The port's only net.
    pub fn net(&self, module: &str, port: &str) -> Result<NetId> {
        single_bit(&self.bits, module, None, port)
    }
}

impl Cell {
    /// Checked direction of connection `port`, if the cell declares one.
    pub fn direction(&self, module: &str, cell: &str, port: &str) -> Option<Result<PortDirection>> {
        self.port_directions
            .get(port)
            .map(|tag| parse_direction(tag, module, Some(cell), port))
    }
}

pub(crate) fn parse_direction(
    tag: &str,
    module: &str,
    cell: Option<&str>,
    port: &str,
) -> Result<PortDirection> {
    PortDirection::parse(tag).ok_or_else(|| DiagramError::InvalidPortDirection {
        module: module.to_string(),
        cell: cell.map(str::to_string),
        port: port.to_string(),
        direction: tag.to_string(),
        expected: "`input` or `output`".to_string(),
    })
}

/// The only bit of a one-bit port or connection.
pub(crate) fn single_bit(bits: &[NetId], module: &str, cell: Option<&str>, port: &str) -> Result<NetId> {
    match bits {
        [bit] => Ok(*bit),
        _ => Err(DiagramError::InvalidPortWidth {
            module: module.to_string(),
            cell: cell.map(str::to_string),
            port: port.to_string(),
            width: bits.len(),
        }),
    }
}
