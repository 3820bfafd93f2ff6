//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors describe rejected operations.
///
/// The engine never returns these as `Err`: a rejected operation leaves the
/// structure untouched and reports the error's message as the explanation of
/// a single no-op step.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Value {0} already exists in the tree. Duplicates are not allowed.")]
    DuplicateValue(i64),

    #[error("Value {0} was not found in the tree. Nothing to delete.")]
    ValueNotFound(i64),

    #[error("Node {0} already exists in the graph.")]
    DuplicateNode(i64),

    #[error("Node {0} does not exist in the graph.")]
    UnknownNode(i64),

    #[error("Error: one or both nodes do not exist ({source_id} - {target_id}).")]
    MissingEndpoint { source_id: i64, target_id: i64 },

    #[error("Error: edge weight must be a positive integer, got {0}.")]
    NonPositiveWeight(u64),

    #[error("Error: self loops are not supported (node {0}).")]
    SelfLoop(i64),

    #[error("No path found from {start} to {end}.")]
    Unreachable { start: i64, end: i64 },
}
