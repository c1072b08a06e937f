//! Layered (Sugiyama-style) layout engine for directed graphs of fixed-size
//! boxes.
//!
//! The engine is generic: callers describe nodes by size and edges by node
//! index, and get back a rank and a top-left position for every node plus
//! the enclosing canvas size.
//!
//! # Pipeline
//!
//! ```text
//! LayoutGraph
//!   → Cycle removal       (DFS back edges reversed for ranking only)
//!   → Rank assignment     (longest-path layering over a topological order)
//!   → Normalization       (virtual nodes on edges spanning several ranks)
//!   → Crossing reduction  (alternating barycenter sweeps)
//!   → Coordinates         (stacking, neighbour alignment, orientation)
//!   → Layout              (JSON-serializable output)
//! ```

pub mod acyclic;
pub mod error;
pub mod graph;
pub mod layering;
pub mod ordering;
pub mod placement;
pub mod types;

pub use error::LayoutError;
pub use graph::LayoutGraph;
pub use types::{Bounds, Layout, LayoutConfig, PlacedNode, RankDir, Rect};

use log::debug;

/// Compute a complete layout for `graph`.
///
/// Every edge `u → v` ends up with `rank(v) > rank(u)`, except the edges
/// reversed to break cycles, which run the other way. Self-loops are
/// ignored. Fails only when an edge names a missing node.
pub fn generate_layout(graph: &LayoutGraph, config: &LayoutConfig) -> Result<Layout, LayoutError> {
    graph.check_edges()?;

    // Phase 1: Cycle removal and rank assignment
    let ranking = layering::assign_ranks(graph);

    // Phase 2: Split long edges
    let mut layered = ordering::LayeredGraph::normalize(graph, &ranking);

    // Phase 3: Crossing reduction
    let crossings = ordering::minimize_crossings(&mut layered, config.sweeps);

    // Phase 4: Coordinates and bounds
    let layout = placement::place_nodes(graph, &layered, config, crossings);

    debug!(
        "laid out {} node(s), {} edge(s) ({} reversed) on {} rank(s) with {} virtual node(s), {} crossing(s), canvas {}x{}",
        graph.nodes.len(),
        graph.edges.len(),
        ranking.reversed.len(),
        layout.num_ranks,
        layered.ranks.len() - layered.num_real,
        crossings,
        layout.bounds.width,
        layout.bounds.height
    );

    Ok(layout)
}
