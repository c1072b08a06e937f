//! Output model: one renderable diagram per module.
//!
//! Devices are numbered `dev0`, `dev1`, ... within their module. A connector
//! joins a listener endpoint to the endpoint driving the same net. Device
//! positions stay unset until [`ModuleDiagram::lay_out`] runs.

use crate::error::{DiagramError, Result};
use crate::netlist::Netlist;
use crate::ports::Slot;
use gatediagram_layout::{generate_layout, Layout, LayoutConfig, LayoutGraph};
use serde::{Serialize, Serializer};
use std::fmt;

/// What a device draws as.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DeviceKind {
    /// Input port, seen from inside the module.
    In,
    /// Output port, seen from inside the module.
    Out,
    And,
    Or,
    Xor,
    Not,
    /// Instance of another module of the same netlist.
    Instance(String),
    /// Any other cell type, drawn as a labelled box.
    Opaque(String),
}

impl DeviceKind {
    /// Classify a cell type. Built-in gates win over a module of the same
    /// name.
    pub fn from_cell_type(cell_type: &str, netlist: &Netlist) -> Self {
        match cell_type {
            "$and" => DeviceKind::And,
            "$or" => DeviceKind::Or,
            "$xor" => DeviceKind::Xor,
            "$not" => DeviceKind::Not,
            _ if netlist.has_module(cell_type) => DeviceKind::Instance(cell_type.to_string()),
            _ => DeviceKind::Opaque(cell_type.to_string()),
        }
    }

    /// Type tag written to the document.
    pub fn as_str(&self) -> &str {
        match self {
            DeviceKind::In => "In",
            DeviceKind::Out => "Out",
            DeviceKind::And => "AND",
            DeviceKind::Or => "OR",
            DeviceKind::Xor => "XOR",
            DeviceKind::Not => "NOT",
            DeviceKind::Instance(name) | DeviceKind::Opaque(name) => name,
        }
    }
}

impl fmt::Display for DeviceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DeviceKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Index of a device within its module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceId(pub usize);

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dev{}", self.0)
    }
}

impl Serialize for DeviceId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A pin of a specific device, written `dev3.in0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub device: DeviceId,
    pub slot: Slot,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.device, self.slot)
    }
}

impl Serialize for Endpoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Device {
    pub id: DeviceId,
    #[serde(rename = "type")]
    pub kind: DeviceKind,
    /// Port name for boundary devices, cell name otherwise.
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<u32>,
    /// Slot index of a boundary device within its direction group.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<usize>,
}

/// Wire from a listener to the driver of its net.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Connector {
    pub from: Endpoint,
    pub to: Endpoint,
}

/// Devices and wiring of one module, plus its canvas size once laid out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ModuleDiagram {
    pub width: u32,
    pub height: u32,
    pub devices: Vec<Device>,
    pub connectors: Vec<Connector>,
}

impl ModuleDiagram {
    /// Layout graph with one node per device and one edge per connector,
    /// pointing from the listening device to the driving one.
    pub fn layout_graph(&self, config: &LayoutConfig) -> LayoutGraph {
        let mut graph = LayoutGraph::new();
        for _ in &self.devices {
            graph.add_node(config.node_width, config.node_height);
        }
        for c in &self.connectors {
            graph.add_edge(c.from.device.0, c.to.device.0);
        }
        graph
    }

    /// Copy positions and canvas size from a finished layout.
    pub fn apply_layout(&mut self, layout: &Layout) {
        for (device, node) in self.devices.iter_mut().zip(&layout.nodes) {
            device.x = Some(node.x);
            device.y = Some(node.y);
        }
        self.width = layout.bounds.width;
        self.height = layout.bounds.height;
    }

    /// Lay out this diagram in place.
    pub fn lay_out(&mut self, module: &str, config: &LayoutConfig) -> Result<()> {
        let graph = self.layout_graph(config);
        let layout = generate_layout(&graph, config).map_err(|source| DiagramError::Layout {
            module: module.to_string(),
            source,
        })?;
        self.apply_layout(&layout);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device(n: usize, kind: DeviceKind) -> Device {
        Device {
            id: DeviceId(n),
            label: format!("d{n}"),
            kind,
            x: None,
            y: None,
            order: None,
        }
    }

    /// `a → and ← b`, `and → y`, wired listener to driver.
    fn and_diagram() -> ModuleDiagram {
        let end = |d, slot| Endpoint {
            device: DeviceId(d),
            slot,
        };
        ModuleDiagram {
            devices: vec![
                device(0, DeviceKind::In),
                device(1, DeviceKind::In),
                device(2, DeviceKind::Out),
                device(3, DeviceKind::And),
            ],
            connectors: vec![
                Connector {
                    from: end(3, Slot::In(0)),
                    to: end(0, Slot::Out(0)),
                },
                Connector {
                    from: end(3, Slot::In(1)),
                    to: end(1, Slot::Out(0)),
                },
                Connector {
                    from: end(2, Slot::In(0)),
                    to: end(3, Slot::Out(0)),
                },
            ],
            ..ModuleDiagram::default()
        }
    }

    #[test]
    fn classifies_cell_types() {
        let netlist = Netlist::from_json(r#"{"modules": {"sub": {}, "$and": {}}}"#).unwrap();
        assert_eq!(DeviceKind::from_cell_type("$and", &netlist), DeviceKind::And);
        assert_eq!(DeviceKind::from_cell_type("$not", &netlist), DeviceKind::Not);
        assert_eq!(DeviceKind::from_cell_type("sub", &netlist), DeviceKind::Instance("sub".into()));
        assert_eq!(DeviceKind::from_cell_type("$dff", &netlist), DeviceKind::Opaque("$dff".into()));
    }

    #[test]
    fn endpoints_print_as_device_dot_slot() {
        let e = Endpoint {
            device: DeviceId(3),
            slot: Slot::In(1),
        };
        assert_eq!(e.to_string(), "dev3.in1");
        assert_eq!(serde_json::to_value(e).unwrap(), "dev3.in1");
    }

    #[test]
    fn unplaced_device_omits_position() {
        let json = serde_json::to_value(device(0, DeviceKind::Xor)).unwrap();
        assert_eq!(json["id"], "dev0");
        assert_eq!(json["type"], "XOR");
        assert!(json.get("x").is_none());
        assert!(json.get("order").is_none());
    }

    #[test]
    fn layout_puts_outputs_right_of_inputs() {
        let mut diagram = and_diagram();
        diagram.lay_out("top", &LayoutConfig::default()).unwrap();

        let x = |n: usize| diagram.devices[n].x.unwrap();
        assert!(x(2) > x(3), "output should sit right of the gate");
        assert!(x(3) > x(0) && x(3) > x(1), "gate should sit right of the inputs");
        for d in &diagram.devices {
            assert!(d.x.unwrap() < diagram.width);
            assert!(d.y.unwrap() < diagram.height);
        }
    }

    #[test]
    fn edges_run_from_listener_to_driver() {
        let graph = and_diagram().layout_graph(&LayoutConfig::default());
        assert_eq!(graph.nodes.len(), 4);
        assert_eq!((graph.edges[2].from, graph.edges[2].to), (2, 3));
    }
}
