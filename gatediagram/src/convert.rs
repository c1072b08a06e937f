//! Netlist module → device diagram.
//!
//! Each port and cell becomes a device. Every connection is registered
//! against its net as either the net's single driver or one of its
//! listeners, and each listener then gets one connector back to the driver.
//! Ports are viewed from inside the module, so an input port drives and an
//! output port listens.

use crate::diagram::{Connector, Device, DeviceId, DeviceKind, Endpoint, ModuleDiagram};
use crate::error::{DiagramError, Result};
use crate::netlist::{single_bit, Module, NetId, Netlist, PortDirection};
use crate::ports::{gate_port_map, missing_port, resolve_cell_ports, PortMap, Slot};
use indexmap::IndexMap;
use log::{debug, trace, warn};
use std::borrow::Cow;
use std::collections::BTreeMap;

#[derive(Debug, Default)]
struct NetEntry {
    driver: Option<Endpoint>,
    listeners: Vec<Endpoint>,
}

/// Per-module conversion state: device numbering and the net table.
#[derive(Debug)]
pub struct ModuleBuilder<'a> {
    name: &'a str,
    devices: Vec<Device>,
    nets: BTreeMap<NetId, NetEntry>,
}

impl<'a> ModuleBuilder<'a> {
    pub fn new(name: &'a str) -> Self {
        Self {
            name,
            devices: Vec::new(),
            nets: BTreeMap::new(),
        }
    }

    /// Add a device and return its id. Ids count up from `dev0`.
    pub fn add_device(&mut self, kind: DeviceKind, label: &str, order: Option<usize>) -> DeviceId {
        let id = DeviceId(self.devices.len());
        self.devices.push(Device {
            id,
            kind,
            label: label.to_string(),
            x: None,
            y: None,
            order,
        });
        id
    }

    /// Register `endpoint` as the driver of `net`.
    pub fn drive(&mut self, net: NetId, endpoint: Endpoint) -> Result<()> {
        let entry = self.nets.entry(net).or_default();
        if let Some(first) = entry.driver {
            return Err(DiagramError::MultipleDrivers {
                module: self.name.to_string(),
                net,
                first: first.to_string(),
                second: endpoint.to_string(),
            });
        }
        entry.driver = Some(endpoint);
        Ok(())
    }

    /// Register `endpoint` as a listener on `net`.
    pub fn listen(&mut self, net: NetId, endpoint: Endpoint) {
        self.nets.entry(net).or_default().listeners.push(endpoint);
    }

    /// Register `endpoint` on `net` according to the direction of its slot.
    pub fn connect(&mut self, net: NetId, endpoint: Endpoint, direction: PortDirection) -> Result<()> {
        match direction {
            PortDirection::Output => self.drive(net, endpoint),
            PortDirection::Input => {
                self.listen(net, endpoint);
                Ok(())
            }
        }
    }

    /// Resolve every net into connectors, in ascending net order.
    pub fn finish(self) -> Result<ModuleDiagram> {
        let mut connectors = Vec::new();
        for (net, entry) in self.nets {
            if entry.listeners.is_empty() {
                trace!("module `{}`: net {} has no listeners, dropped", self.name, net);
                continue;
            }
            let driver = entry.driver.ok_or_else(|| DiagramError::UnresolvedNet {
                module: self.name.to_string(),
                net,
                listeners: entry.listeners.len(),
            })?;
            trace!(
                "module `{}`: net {} driven by {} with {} listener(s)",
                self.name,
                net,
                driver,
                entry.listeners.len()
            );
            connectors.extend(entry.listeners.into_iter().map(|from| Connector { from, to: driver }));
        }
        Ok(ModuleDiagram {
            width: 0,
            height: 0,
            devices: self.devices,
            connectors,
        })
    }
}

/// Convert one module into an unplaced diagram.
///
/// `port_maps` holds the resolved port map of every module in the netlist;
/// it supplies this module's boundary slots and the slots of every cell that
/// instantiates a module.
pub fn convert_module(
    netlist: &Netlist,
    name: &str,
    module: &Module,
    port_maps: &IndexMap<String, PortMap>,
) -> Result<ModuleDiagram> {
    let mut builder = ModuleBuilder::new(name);

    let own_ports = port_maps.get(name);
    for (port_name, port) in &module.ports {
        let direction = port.direction(name, port_name)?;
        let net = port.net(name, port_name)?;
        let order = own_ports.and_then(|map| map.get(port_name)).map(Slot::index);
        match direction {
            PortDirection::Input => {
                let device = builder.add_device(DeviceKind::In, port_name, order);
                builder.drive(
                    net,
                    Endpoint {
                        device,
                        slot: Slot::Out(0),
                    },
                )?;
            }
            PortDirection::Output => {
                let device = builder.add_device(DeviceKind::Out, port_name, order);
                builder.listen(
                    net,
                    Endpoint {
                        device,
                        slot: Slot::In(0),
                    },
                );
            }
        }
    }

    for (cell_name, cell) in &module.cells {
        let kind = DeviceKind::from_cell_type(&cell.cell_type, netlist);
        let map: Cow<'_, PortMap> = match &kind {
            DeviceKind::Instance(sub) => match port_maps.get(sub) {
                Some(map) => Cow::Borrowed(map),
                None => Cow::Owned(PortMap::default()),
            },
            DeviceKind::Opaque(ty) => {
                warn!("module `{name}`: cell `{cell_name}` has unknown type `{ty}`, drawing it as a box");
                Cow::Owned(resolve_cell_ports(name, cell_name, cell)?)
            }
            builtin => Cow::Owned(gate_port_map(builtin).unwrap_or_default()),
        };

        let device = builder.add_device(kind, cell_name, None);
        for (port_name, bits) in &cell.connections {
            let slot = map
                .get(port_name)
                .ok_or_else(|| missing_port(name, cell_name, cell, port_name))?;
            if let Some(declared) = cell.direction(name, cell_name, port_name) {
                let declared = declared?;
                if declared != slot.direction() {
                    return Err(DiagramError::InvalidPortDirection {
                        module: name.to_string(),
                        cell: Some(cell_name.to_string()),
                        port: port_name.to_string(),
                        direction: declared.to_string(),
                        expected: format!("`{}` for slot {}", slot.direction(), slot),
                    });
                }
            }
            let net = single_bit(bits, name, Some(cell_name), port_name)?;
            builder.connect(net, Endpoint { device, slot }, slot.direction())?;
        }
    }

    let diagram = builder.finish()?;
    debug!(
        "module `{}`: {} device(s), {} connector(s)",
        name,
        diagram.devices.len(),
        diagram.connectors.len()
    );
    Ok(diagram)
}
