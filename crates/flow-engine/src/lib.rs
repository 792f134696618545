//! Flow Engine - connection rules and auto-layout for Flowboard
//!
//! Two synchronous, snapshot-in/snapshot-out engines for the graph editor:
//!
//! - `compat`: a layered rule evaluator deciding whether a proposed
//!   connection between two typed endpoints is `ok`, `warn`, or `error`.
//!   Default rules are immutable and protected; user rules overlay them.
//! - `layout`: auto-arrangement of node positions by topological depth,
//!   tolerant of cycles and dangling edge references.
//!
//! Neither engine performs I/O or retains graph state between calls; the
//! only mutable state is the caller-owned [`RuleStore`].
//!
//! # Example
//!
//! ```
//! use flow_engine::{arrange_graph, CompatibilityLevel, RuleStore};
//! use graph_model::{GraphBuilder, NodeKind};
//!
//! let store = RuleStore::builtin();
//! assert_eq!(store.evaluate("json", "bytes"), CompatibilityLevel::Warn);
//!
//! let graph = GraphBuilder::new("wf", "Demo")
//!     .add_node("in", NodeKind::Sender, (0.0, 0.0))
//!     .add_node("out", NodeKind::Receiver, (0.0, 0.0))
//!     .add_edge("in", "out")
//!     .build();
//! let arranged = arrange_graph(&graph);
//! assert_eq!(arranged.nodes.len(), 2);
//! ```

pub mod compat;
pub mod error;
pub mod layout;

// Re-export key types
pub use compat::{CompatRule, CompatibilityLevel, RuleStore, BYTES_TAG};
pub use error::{Result, RuleError};
pub use layout::{
    arrange, arrange_graph, node_depths, HORIZONTAL_SPACING, START_X, START_Y, VERTICAL_SPACING,
};

// Re-export the graph model types consumers will need
pub use graph_model::{GraphEdge, GraphNode, NodeKind, Position, WorkflowGraph};
