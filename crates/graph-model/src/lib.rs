//! Graph Model - workflow graph snapshots for Flowboard
//!
//! The canonical data model shared by the type-compatibility and layout
//! engines: nodes, edges, and the graph snapshot with its mutation
//! operations. Snapshots are plain values; an external store owns them and
//! the engines transform them without retaining state.

pub mod builder;
pub mod types;

// Re-export key types
pub use builder::GraphBuilder;
pub use types::{
    EdgeId, GraphEdge, GraphNode, HandleId, NodeId, NodeKind, Position, WorkflowGraph,
};
