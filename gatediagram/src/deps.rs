//! Module emission order.
//!
//! A module has to be registered with the viewer before any module that
//! instantiates it. The hierarchy is a graph with an edge from every module
//! used as a cell type to the module using it; a topological sort of that
//! graph is the emission order, and its only sink is the root.

use crate::error::{DiagramError, Result};
use crate::netlist::Netlist;
use log::debug;
use std::collections::BTreeSet;

/// Emission order: every library module, then the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleOrder {
    /// Non-root modules, each after every module it instantiates.
    pub library: Vec<String>,
    /// The one module nothing else instantiates.
    pub root: String,
}

/// `(used, using)` pairs as module indices, one per distinct instantiation
/// relationship, in declaration order of the using module and its cells.
pub fn dependency_edges(netlist: &Netlist) -> Vec<(usize, usize)> {
    let mut seen = BTreeSet::new();
    let mut edges = Vec::new();
    for (using, module) in netlist.modules.values().enumerate() {
        for cell in module.cells.values() {
            if let Some(used) = netlist.modules.get_index_of(&cell.cell_type) {
                if seen.insert((used, using)) {
                    edges.push((used, using));
                }
            }
        }
    }
    edges
}

/// Topologically order the modules of `netlist`.
///
/// Ready modules are taken in declaration order. Fails on a recursive
/// hierarchy (a module instantiating itself included), when more than one
/// module is left uninstantiated, or when there are no modules at all.
pub fn resolve_order(netlist: &Netlist) -> Result<ModuleOrder> {
    let n = netlist.modules.len();
    if n == 0 {
        return Err(DiagramError::EmptyNetlist);
    }

    let mut succ: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut in_degree = vec![0usize; n];
    for (used, using) in dependency_edges(netlist) {
        succ[used].push(using);
        in_degree[using] += 1;
    }

    let mut ready: BTreeSet<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
    let mut order = Vec::with_capacity(n);
    while let Some(next) = ready.pop_first() {
        order.push(next);
        for &s in &succ[next] {
            in_degree[s] -= 1;
            if in_degree[s] == 0 {
                ready.insert(s);
            }
        }
    }

    if order.len() < n {
        let modules = (0..n)
            .filter(|&i| in_degree[i] > 0)
            .map(|i| module_name(netlist, i))
            .collect();
        return Err(DiagramError::CyclicDependency { modules });
    }

    let roots: Vec<usize> = (0..n).filter(|&i| succ[i].is_empty()).collect();
    if roots.len() != 1 {
        return Err(DiagramError::AmbiguousRoot {
            roots: roots.into_iter().map(|i| module_name(netlist, i)).collect(),
        });
    }

    // A single sink is reachable from every module, so it sorts last.
    let root = order.pop().map(|i| module_name(netlist, i)).ok_or(DiagramError::EmptyNetlist)?;
    let library: Vec<String> = order.into_iter().map(|i| module_name(netlist, i)).collect();
    debug!("module order: {} library module(s), root `{}`", library.len(), root);
    Ok(ModuleOrder { library, root })
}

fn module_name(netlist: &Netlist, index: usize) -> String {
    netlist
        .modules
        .get_index(index)
        .map(|(name, _)| name.clone())
        .unwrap_or_default()
}
