//! Configuration and output types for the layered layout engine.
//!
//! All types derive [`serde::Serialize`] and [`serde::Deserialize`] so a
//! configuration can be read from a file and a finished [`Layout`] can be
//! written out next to the graph it positions.

use serde::{Deserialize, Serialize};

/// Direction in which ranks advance across the canvas.
///
/// Rank 0 holds the sources of the layout graph. With [`RankDir::RL`] those
/// sources sit at the right edge and higher ranks grow to the left.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RankDir {
    /// Rank 0 at the right, ranks grow leftwards.
    #[default]
    RL,
    /// Rank 0 at the left, ranks grow rightwards.
    LR,
    /// Rank 0 at the top, ranks grow downwards.
    TB,
    /// Rank 0 at the bottom, ranks grow upwards.
    BT,
}

impl RankDir {
    /// Whether ranks are laid out along the x axis.
    pub fn is_horizontal(self) -> bool {
        matches!(self, RankDir::RL | RankDir::LR)
    }

    /// Whether rank 0 sits at the far end of the rank axis.
    pub fn is_reversed(self) -> bool {
        matches!(self, RankDir::RL | RankDir::BT)
    }
}

/// Tunables for [`crate::generate_layout`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Default node width used by callers that build uniform graphs.
    pub node_width: u32,
    /// Default node height used by callers that build uniform graphs.
    pub node_height: u32,
    /// Gap between adjacent ranks along the rank axis.
    pub rank_sep: u32,
    /// Gap between neighbouring nodes inside one rank.
    pub node_sep: u32,
    /// Added to the largest node x to get the canvas width.
    pub margin_x: u32,
    /// Added to the largest node y to get the canvas height.
    pub margin_y: u32,
    /// Orientation of the rank axis.
    pub rank_dir: RankDir,
    /// Number of barycenter sweeps during crossing reduction.
    pub sweeps: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: 32,
            node_height: 32,
            rank_sep: 64,
            node_sep: 16,
            margin_x: 256,
            margin_y: 64,
            rank_dir: RankDir::RL,
            sweeps: 8,
        }
    }
}

/// Complete layout, the output of [`crate::generate_layout`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layout {
    /// Canvas bounds in layout units.
    pub bounds: Bounds,
    /// One entry per graph node, indexed like [`crate::graph::LayoutGraph::nodes`].
    pub nodes: Vec<PlacedNode>,
    /// Number of distinct ranks (0 for an empty graph).
    pub num_ranks: usize,
    /// Edge crossings left after crossing reduction.
    pub crossings: usize,
}

/// Canvas dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: u32,
    pub height: u32,
}

/// A node with its final rank and top-left position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedNode {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub rank: usize,
}

impl PlacedNode {
    /// Bounding rectangle of this node.
    pub fn rect(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            w: self.width,
            h: self.height,
        }
    }
}

/// Axis-aligned rectangle (used for overlap detection).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }

    /// Whether `other` lies entirely inside `self`.
    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.x + other.w <= self.x + self.w
            && other.y + other.h <= self.y + self.h
    }
}
