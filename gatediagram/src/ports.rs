//! Positional port slots.
//!
//! The viewer addresses device pins by position (`in0`, `in1`, `out0`, ...)
//! rather than by name. A [`PortMap`] translates names to slots for one
//! device type: inputs and outputs are numbered separately, each in
//! ascending bit-index order with declaration order breaking ties. The map
//! computed for a module is used both for the module's own boundary devices
//! and for every cell elsewhere that instantiates it, so the two always
//! agree.

use crate::diagram::DeviceKind;
use crate::error::{DiagramError, Result};
use crate::netlist::{parse_direction, single_bit, Cell, Module, NetId, Netlist, PortDirection};
use indexmap::IndexMap;
use std::fmt;

/// A positional pin on a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slot {
    In(usize),
    Out(usize),
}

impl Slot {
    /// Position within the slot's direction group.
    pub fn index(self) -> usize {
        match self {
            Slot::In(k) | Slot::Out(k) => k,
        }
    }

    pub fn direction(self) -> PortDirection {
        match self {
            Slot::In(_) => PortDirection::Input,
            Slot::Out(_) => PortDirection::Output,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::In(k) => write!(f, "in{k}"),
            Slot::Out(k) => write!(f, "out{k}"),
        }
    }
}

/// Port name → slot mapping for one device type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortMap {
    slots: IndexMap<String, Slot>,
}

impl PortMap {
    /// Build a map from `(name, direction, bit)` triples given in
    /// declaration order.
    fn from_ports<'a>(ports: impl IntoIterator<Item = (&'a str, PortDirection, NetId)>) -> Self {
        let mut inputs: Vec<(NetId, usize, &str)> = Vec::new();
        let mut outputs: Vec<(NetId, usize, &str)> = Vec::new();
        for (decl, (name, direction, bit)) in ports.into_iter().enumerate() {
            match direction {
                PortDirection::Input => inputs.push((bit, decl, name)),
                PortDirection::Output => outputs.push((bit, decl, name)),
            }
        }
        inputs.sort_unstable();
        outputs.sort_unstable();

        let mut slots = IndexMap::with_capacity(inputs.len() + outputs.len());
        for (k, (_, _, name)) in inputs.iter().enumerate() {
            slots.insert(name.to_string(), Slot::In(k));
        }
        for (k, (_, _, name)) in outputs.iter().enumerate() {
            slots.insert(name.to_string(), Slot::Out(k));
        }
        Self { slots }
    }

    /// Fixed map for a built-in gate.
    fn fixed(inputs: &[&str], outputs: &[&str]) -> Self {
        let mut slots = IndexMap::new();
        for (k, name) in inputs.iter().enumerate() {
            slots.insert(name.to_string(), Slot::In(k));
        }
        for (k, name) in outputs.iter().enumerate() {
            slots.insert(name.to_string(), Slot::Out(k));
        }
        Self { slots }
    }

    pub fn get(&self, port: &str) -> Option<Slot> {
        self.slots.get(port).copied()
    }

}

/// Fixed mapping for the built-in gates; `None` for any other kind.
pub fn gate_port_map(kind: &DeviceKind) -> Option<PortMap> {
    match kind {
        DeviceKind::And | DeviceKind::Or | DeviceKind::Xor => Some(PortMap::fixed(&["A", "B"], &["Y"])),
        DeviceKind::Not => Some(PortMap::fixed(&["A"], &["Y"])),
        _ => None,
    }
}

/// Resolve the slots of a module's boundary ports.
pub fn resolve_module_ports(name: &str, module: &Module) -> Result<PortMap> {
    let mut ports = Vec::with_capacity(module.ports.len());
    for (port_name, port) in &module.ports {
        let direction = port.direction(name, port_name)?;
        let bit = port.net(name, port_name)?;
        ports.push((port_name.as_str(), direction, bit));
    }
    Ok(PortMap::from_ports(ports))
}

/// Resolve the slots of a cell whose type is not known, from the cell's own
/// connections and their declared directions.
pub fn resolve_cell_ports(module: &str, cell_name: &str, cell: &Cell) -> Result<PortMap> {
    let mut ports = Vec::with_capacity(cell.connections.len());
    for (port_name, bits) in &cell.connections {
        let tag = cell.port_directions.get(port_name).map_or("", String::as_str);
        let direction = parse_direction(tag, module, Some(cell_name), port_name)?;
        let bit = single_bit(bits, module, Some(cell_name), port_name)?;
        ports.push((port_name.as_str(), direction, bit));
    }
    Ok(PortMap::from_ports(ports))
}

/// Port maps of every module, keyed by module name, in declaration order.
pub fn resolve_all(netlist: &Netlist) -> Result<IndexMap<String, PortMap>> {
    netlist
        .modules
        .iter()
        .map(|(name, module)| Ok((name.clone(), resolve_module_ports(name, module)?)))
        .collect()
}

/// Error for a connection that names no slot of its cell's type.
pub(crate) fn missing_port(module: &str, cell_name: &str, cell: &Cell, port: &str) -> DiagramError {
    DiagramError::MissingPortMapping {
        module: module.to_string(),
        cell: cell_name.to_string(),
        cell_type: cell.cell_type.clone(),
        port: port.to_string(),
    }
}
