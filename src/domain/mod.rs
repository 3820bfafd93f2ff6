//! Domain layer: entities, snapshots and step records
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod entities;
pub mod error;
pub mod snapshot;
pub mod step;

pub use arena::{Side, TreeArena, TreeNode};
pub use entities::{AdjacencyMatrix, Distance, GraphEdge, GraphNode, MatrixCell};
pub use error::DomainError;
pub use snapshot::{NodeId, SnapshotNode, TreeSnapshot};
pub use step::{GraphFrame, GraphStep, Step, TreeFrame, TreeStep};
