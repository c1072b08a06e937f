//! Phases 2–3: edge normalization and crossing reduction.
//!
//! Edges spanning more than one rank are split into chains of zero-size
//! virtual nodes, so every segment joins two adjacent ranks. Nodes are then
//! ordered inside each rank with alternating barycenter sweeps, the
//! simplified Sugiyama crossing-minimization step. The best order seen is
//! kept.

use crate::graph::LayoutGraph;
use crate::layering::RankAssignment;
use std::collections::HashSet;

/// Ranked graph with virtual nodes and a per-rank node order.
#[derive(Debug, Clone)]
pub struct LayeredGraph {
    /// Rank per node. Real nodes keep their `LayoutGraph` index; virtual
    /// nodes are appended after them.
    pub ranks: Vec<usize>,
    /// Number of real nodes.
    pub num_real: usize,
    /// Neighbours on the next rank.
    pub down: Vec<Vec<usize>>,
    /// Neighbours on the previous rank.
    pub up: Vec<Vec<usize>>,
    /// Node order inside each rank.
    pub layers: Vec<Vec<usize>>,
}

impl LayeredGraph {
    /// Split long edges and compute the initial order.
    pub fn normalize(graph: &LayoutGraph, ranking: &RankAssignment) -> Self {
        let (succ, _) = graph.adjacency();
        let mut ranks = ranking.ranks.clone();
        let num_real = ranks.len();
        let mut down: Vec<Vec<usize>> = vec![Vec::new(); num_real];
        let mut up: Vec<Vec<usize>> = vec![Vec::new(); num_real];

        let mut seen = HashSet::new();
        for (u, targets) in succ.iter().enumerate() {
            for &v in targets {
                // Reversed feedback edges point to a lower rank; segments are
                // stored top-down either way.
                let (top, bottom) = if ranks[u] < ranks[v] { (u, v) } else { (v, u) };
                if ranks[top] == ranks[bottom] || !seen.insert((top, bottom)) {
                    continue;
                }
                let mut prev = top;
                for r in ranks[top] + 1..ranks[bottom] {
                    let dummy = ranks.len();
                    ranks.push(r);
                    down.push(Vec::new());
                    up.push(vec![prev]);
                    down[prev].push(dummy);
                    prev = dummy;
                }
                down[prev].push(bottom);
                up[bottom].push(prev);
            }
        }

        let layers = initial_order(&ranks, &down, ranking.num_ranks);
        Self {
            ranks,
            num_real,
            down,
            up,
            layers,
        }
    }

    pub fn is_virtual(&self, node: usize) -> bool {
        node >= self.num_real
    }

    /// Index of every node inside its rank.
    pub fn positions(&self) -> Vec<usize> {
        let mut pos = vec![0; self.ranks.len()];
        for layer in &self.layers {
            for (i, &node) in layer.iter().enumerate() {
                pos[node] = i;
            }
        }
        pos
    }
}

/// Depth-first order: nodes are appended to their rank on first visit,
/// starting from rank-0 nodes, so connected chains start out aligned.
fn initial_order(ranks: &[usize], down: &[Vec<usize>], num_ranks: usize) -> Vec<Vec<usize>> {
    let mut layers = vec![Vec::new(); num_ranks];
    let mut visited = vec![false; ranks.len()];

    let mut starts: Vec<usize> = (0..ranks.len()).collect();
    starts.sort_by_key(|&n| (ranks[n], n));

    for start in starts {
        let mut stack = vec![start];
        while let Some(node) = stack.pop() {
            if visited[node] {
                continue;
            }
            visited[node] = true;
            layers[ranks[node]].push(node);
            stack.extend(down[node].iter().rev().filter(|&&n| !visited[n]));
        }
    }
    layers
}

/// Reorder ranks with barycenter sweeps and return the remaining crossings.
pub fn minimize_crossings(lg: &mut LayeredGraph, sweeps: usize) -> usize {
    let num_ranks = lg.layers.len();
    let mut best = lg.layers.clone();
    let mut best_crossings = count_crossings(lg);

    for sweep in 0..sweeps {
        if best_crossings == 0 {
            break;
        }
        if sweep % 2 == 0 {
            for r in 1..num_ranks {
                reorder_rank(lg, r, true);
            }
        } else {
            for r in (0..num_ranks.saturating_sub(1)).rev() {
                reorder_rank(lg, r, false);
            }
        }
        let crossings = count_crossings(lg);
        if crossings < best_crossings {
            best = lg.layers.clone();
            best_crossings = crossings;
        }
    }

    lg.layers = best;
    best_crossings
}

/// Sort one rank by the mean position of its neighbours on the rank above
/// (`use_up`) or below. Nodes without such neighbours keep their index.
fn reorder_rank(lg: &mut LayeredGraph, rank: usize, use_up: bool) {
    let pos = lg.positions();
    let mut keyed: Vec<(f64, usize)> = lg.layers[rank]
        .iter()
        .map(|&node| {
            let neighbours = if use_up { &lg.up[node] } else { &lg.down[node] };
            let bary = if neighbours.is_empty() {
                pos[node] as f64
            } else {
                neighbours.iter().map(|&n| pos[n] as f64).sum::<f64>() / neighbours.len() as f64
            };
            (bary, node)
        })
        .collect();
    keyed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
    lg.layers[rank] = keyed.into_iter().map(|(_, node)| node).collect();
}

/// Exact number of crossing segment pairs between all adjacent ranks.
///
/// With the segments of one rank pair sorted by upper then lower position,
/// two segments cross exactly when their lower positions are inverted, so
/// each rank pair is an inversion count over a Fenwick tree.
pub fn count_crossings(lg: &LayeredGraph) -> usize {
    let pos = lg.positions();
    let mut total = 0;
    for (rank, layer) in lg.layers.iter().enumerate() {
        let mut segments: Vec<(usize, usize)> = layer
            .iter()
            .flat_map(|&u| lg.down[u].iter().map(move |&v| (u, v)))
            .map(|(u, v)| (pos[u], pos[v]))
            .collect();
        segments.sort_unstable();

        let width = lg.layers.get(rank + 1).map_or(0, Vec::len);
        let mut tree = vec![0usize; width + 1];
        for (seen, &(_, lower)) in segments.iter().enumerate() {
            // segments already inserted whose lower end is at or left of `lower`
            let mut not_crossing = 0;
            let mut i = lower + 1;
            while i > 0 {
                not_crossing += tree[i];
                i &= i - 1;
            }
            total += seen - not_crossing;

            let mut i = lower + 1;
            while i <= width {
                tree[i] += 1;
                i += i & i.wrapping_neg();
            }
        }
    }
    total
}
