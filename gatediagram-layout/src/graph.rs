//! Phase 0: the directed graph handed to the layout engine.
//!
//! Nodes are fixed-size boxes addressed by their insertion index. Edges are
//! plain `(from, to)` index pairs; the engine ranks edges so that `to`
//! lands on a higher rank than `from` wherever cycles allow.

use crate::error::LayoutError;
use std::collections::HashSet;

/// A box to be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutNode {
    /// Index into `LayoutGraph::nodes`.
    pub id: usize,
    pub width: u32,
    pub height: u32,
}

/// A directed edge between two layout nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutEdge {
    pub from: usize,
    pub to: usize,
}

/// Directed graph of fixed-size nodes.
#[derive(Debug, Clone, Default)]
pub struct LayoutGraph {
    pub nodes: Vec<LayoutNode>,
    pub edges: Vec<LayoutEdge>,
}

impl LayoutGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node and return its index.
    pub fn add_node(&mut self, width: u32, height: u32) -> usize {
        let id = self.nodes.len();
        self.nodes.push(LayoutNode { id, width, height });
        id
    }

    /// Add a directed edge. Indices are checked when the layout runs.
    pub fn add_edge(&mut self, from: usize, to: usize) {
        self.edges.push(LayoutEdge { from, to });
    }

    /// Reject edges that point outside the node list.
    pub(crate) fn check_edges(&self) -> Result<(), LayoutError> {
        let num_nodes = self.nodes.len();
        for (edge, e) in self.edges.iter().enumerate() {
            for node in [e.from, e.to] {
                if node >= num_nodes {
                    return Err(LayoutError::EdgeOutOfRange {
                        edge,
                        node,
                        num_nodes,
                    });
                }
            }
        }
        Ok(())
    }

    /// Deduplicated successor and predecessor lists.
    ///
    /// Self-loops are dropped: they cannot influence rank or order.
    pub(crate) fn adjacency(&self) -> (Vec<Vec<usize>>, Vec<Vec<usize>>) {
        let n = self.nodes.len();
        let mut succ = vec![Vec::new(); n];
        let mut pred = vec![Vec::new(); n];
        let mut seen: HashSet<(usize, usize)> = HashSet::new();
        for e in &self.edges {
            if e.from == e.to || !seen.insert((e.from, e.to)) {
                continue;
            }
            succ[e.from].push(e.to);
            pred[e.to].push(e.from);
        }
        (succ, pred)
    }
}
