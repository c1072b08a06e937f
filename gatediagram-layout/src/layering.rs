//! Phase 1b: Sugiyama rank assignment.
//!
//! Uses longest-path layering over a topological order of the graph with
//! its feedback edges reversed, so that every remaining edge `u → v` ends on
//! a strictly higher rank than it starts: `rank(v) >= rank(u) + 1`. A
//! reversed edge runs the other way by at least one rank. Sources and
//! isolated nodes land on rank 0.

use crate::acyclic::{feedback_edges, reverse_edges};
use crate::graph::LayoutGraph;
use std::collections::VecDeque;

/// Rank of every node in a [`LayoutGraph`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankAssignment {
    /// Rank per node, indexed like `LayoutGraph::nodes`.
    pub ranks: Vec<usize>,
    /// Total number of ranks (0 for an empty graph).
    pub num_ranks: usize,
    /// Edges turned around to break cycles.
    pub reversed: Vec<(usize, usize)>,
}

/// Assign ranks to every node of `graph`.
pub fn assign_ranks(graph: &LayoutGraph) -> RankAssignment {
    let (succ, pred) = graph.adjacency();
    let reversed = feedback_edges(&succ, &pred);
    let (dag_succ, dag_pred) = reverse_edges(&succ, &reversed);
    let order = topological_order(&dag_succ, &dag_pred);
    let ranks = longest_path_layering(&dag_pred, &order);
    let num_ranks = ranks.iter().copied().max().map(|m| m + 1).unwrap_or(0);
    RankAssignment {
        ranks,
        num_ranks,
        reversed,
    }
}

/// Kahn's algorithm over an acyclic graph. Ties are broken by node index so
/// the result is stable.
fn topological_order(succ: &[Vec<usize>], pred: &[Vec<usize>]) -> Vec<usize> {
    let n = succ.len();
    let mut in_degree: Vec<usize> = pred.iter().map(Vec::len).collect();

    let mut queue: VecDeque<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
    let mut order = Vec::with_capacity(n);
    while let Some(node) = queue.pop_front() {
        order.push(node);
        for &s in &succ[node] {
            in_degree[s] -= 1;
            if in_degree[s] == 0 {
                queue.push_back(s);
            }
        }
    }
    order
}

fn longest_path_layering(pred: &[Vec<usize>], topo_order: &[usize]) -> Vec<usize> {
    let mut rank = vec![0usize; pred.len()];
    // Each node's rank is max(predecessors' ranks) + 1
    for &node in topo_order {
        rank[node] = pred[node].iter().map(|&p| rank[p] + 1).max().unwrap_or(0);
    }
    rank
}
