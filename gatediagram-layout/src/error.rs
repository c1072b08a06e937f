use thiserror::Error;

/// Failures of the layout engine.
///
/// The only failure is a graph whose edges name nodes it does not have,
/// which means the caller built it wrongly; it is not a user-input error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("edge {edge} references node {node}, but the graph has only {num_nodes} node(s)")]
    EdgeOutOfRange {
        edge: usize,
        node: usize,
        num_nodes: usize,
    },
}
