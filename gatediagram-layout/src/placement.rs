//! Phase 4: coordinate assignment.
//!
//! Ranks become columns (or rows, depending on [`RankDir`]). Inside a rank
//! nodes are stacked in their crossing-reduced order, then pulled toward
//! the mean position of their neighbours without breaking that order or
//! the minimum separation. Finally the whole drawing is shifted so its
//! smallest coordinate is 0 and the canvas bounds are computed.

use crate::graph::LayoutGraph;
use crate::ordering::LayeredGraph;
use crate::types::*;

/// Alternating down/up alignment passes.
const ALIGN_PASSES: usize = 4;

/// Place all real nodes and produce the final layout.
pub fn place_nodes(
    graph: &LayoutGraph,
    lg: &LayeredGraph,
    config: &LayoutConfig,
    crossings: usize,
) -> Layout {
    let horizontal = config.rank_dir.is_horizontal();

    // (rank-axis extent, cross-axis extent) per node; virtual nodes are points
    let extents: Vec<(u32, u32)> = (0..lg.ranks.len())
        .map(|node| match graph.nodes.get(node) {
            Some(n) if horizontal => (n.width, n.height),
            Some(n) => (n.height, n.width),
            None => (0, 0),
        })
        .collect();

    let cross = cross_axis_positions(lg, &extents, config.node_sep);
    let rank_offsets = rank_axis_offsets(lg, &extents, config);

    let mut nodes = Vec::with_capacity(lg.num_real);
    for (node, n) in graph.nodes.iter().enumerate() {
        let rank = lg.ranks[node];
        let (rank_ext, _) = extents[node];
        let (offset, column) = rank_offsets[rank];
        let along = offset + (column - rank_ext) / 2;
        let across = cross[node];
        let (x, y) = if horizontal { (along, across) } else { (across, along) };
        nodes.push(PlacedNode {
            x,
            y,
            width: n.width,
            height: n.height,
            rank,
        });
    }

    let bounds = compute_bounds(&nodes, config);

    Layout {
        bounds,
        nodes,
        num_ranks: lg.layers.len(),
        crossings,
    }
}

// ---------------------------------------------------------------------------
// Cross axis
// ---------------------------------------------------------------------------

/// Integer cross-axis position per real node, normalized to start at 0.
fn cross_axis_positions(lg: &LayeredGraph, extents: &[(u32, u32)], node_sep: u32) -> Vec<u32> {
    let size = |node: usize| extents[node].1 as f64;
    let sep = node_sep as f64;
    let mut pos = vec![0.0f64; lg.ranks.len()];

    // Initial stacking in rank order
    for layer in &lg.layers {
        let mut cursor = 0.0;
        for &node in layer {
            pos[node] = cursor;
            cursor += size(node) + sep;
        }
    }

    for _ in 0..ALIGN_PASSES {
        for layer in lg.layers.iter().skip(1) {
            align_layer(layer, &lg.up, &mut pos, &size, sep);
        }
        for layer in lg.layers.iter().rev().skip(1) {
            align_layer(layer, &lg.down, &mut pos, &size, sep);
        }
    }

    let min = (0..lg.num_real)
        .map(|node| pos[node])
        .fold(f64::INFINITY, f64::min);
    let mut cross: Vec<u32> = (0..lg.num_real)
        .map(|node| (pos[node] - min).max(0.0).floor() as u32)
        .collect();

    // Flooring can eat into a gap by up to one unit; restore the separation
    // between consecutive real nodes of each rank with one integer pass.
    for layer in &lg.layers {
        let mut reals = layer.iter().copied().filter(|&n| !lg.is_virtual(n));
        let Some(mut prev) = reals.next() else {
            continue;
        };
        for node in reals {
            let earliest = cross[prev] + extents[prev].1 + node_sep;
            cross[node] = cross[node].max(earliest);
            prev = node;
        }
    }
    cross
}

/// Move each node of `layer` toward the mean centre of its `neighbours`,
/// then push nodes apart so order and separation hold.
///
/// The layer is packed once in each direction and the two results are
/// averaged. Both packings keep the separation, hence so does their mean.
fn align_layer(
    layer: &[usize],
    neighbours: &[Vec<usize>],
    pos: &mut [f64],
    size: &impl Fn(usize) -> f64,
    sep: f64,
) {
    let desired: Vec<f64> = layer
        .iter()
        .map(|&node| {
            let adj = &neighbours[node];
            if adj.is_empty() {
                return pos[node];
            }
            let centre = adj.iter().map(|&n| pos[n] + size(n) / 2.0).sum::<f64>() / adj.len() as f64;
            centre - size(node) / 2.0
        })
        .collect();

    let mut forward = desired.clone();
    for i in 1..layer.len() {
        let min = forward[i - 1] + size(layer[i - 1]) + sep;
        forward[i] = forward[i].max(min);
    }
    let mut backward = desired;
    for i in (0..layer.len().saturating_sub(1)).rev() {
        let max = backward[i + 1] - size(layer[i]) - sep;
        backward[i] = backward[i].min(max);
    }

    for (i, &node) in layer.iter().enumerate() {
        pos[node] = (forward[i] + backward[i]) / 2.0;
    }
}

// ---------------------------------------------------------------------------
// Rank axis
// ---------------------------------------------------------------------------

/// `(start, width)` of every rank's column along the rank axis.
fn rank_axis_offsets(lg: &LayeredGraph, extents: &[(u32, u32)], config: &LayoutConfig) -> Vec<(u32, u32)> {
    let num_ranks = lg.layers.len();
    let columns: Vec<u32> = lg
        .layers
        .iter()
        .map(|layer| layer.iter().map(|&n| extents[n].0).max().unwrap_or(0))
        .collect();

    let mut offsets = vec![(0, 0); num_ranks];
    let mut cursor = 0;
    for visual in 0..num_ranks {
        let rank = if config.rank_dir.is_reversed() {
            num_ranks - 1 - visual
        } else {
            visual
        };
        offsets[rank] = (cursor, columns[rank]);
        cursor += columns[rank] + config.rank_sep;
    }
    offsets
}

// ---------------------------------------------------------------------------
// Bounds
// ---------------------------------------------------------------------------

/// Canvas = largest node origin plus margin, never smaller than the
/// farthest node edge.
fn compute_bounds(nodes: &[PlacedNode], config: &LayoutConfig) -> Bounds {
    let max_x = nodes.iter().map(|n| n.x).max().unwrap_or(0);
    let max_y = nodes.iter().map(|n| n.y).max().unwrap_or(0);
    let right = nodes.iter().map(|n| n.x + n.width).max().unwrap_or(0);
    let bottom = nodes.iter().map(|n| n.y + n.height).max().unwrap_or(0);
    Bounds {
        width: (max_x + config.margin_x).max(right),
        height: (max_y + config.margin_y).max(bottom),
    }
}
