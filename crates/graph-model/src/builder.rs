//! Fluent builder for workflow graphs
//!
//! Provides a type-safe, fluent API for constructing graph snapshots
//! programmatically (mostly in tests and fixtures).

use crate::types::{GraphEdge, GraphNode, NodeKind, WorkflowGraph};

/// Fluent builder for constructing workflow graphs
///
/// # Example
///
/// ```
/// use graph_model::{GraphBuilder, NodeKind};
///
/// let graph = GraphBuilder::new("wf-1", "My Workflow")
///     .add_node("input-1", NodeKind::Sender, (0.0, 0.0))
///     .with_data(serde_json::json!({"name": "Input"}))
///     .add_node("output-1", NodeKind::Receiver, (200.0, 0.0))
///     .add_edge("input-1", "output-1")
///     .build();
///
/// assert_eq!(graph.nodes.len(), 2);
/// ```
pub struct GraphBuilder {
    id: String,
    name: String,
    nodes: Vec<GraphNode>,
    edges: Vec<GraphEdge>,
    edge_counter: usize,
}

impl GraphBuilder {
    /// Create a new graph builder
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            nodes: Vec::new(),
            edges: Vec::new(),
            edge_counter: 0,
        }
    }

    /// Add a node to the graph
    pub fn add_node(
        mut self,
        id: impl Into<String>,
        kind: NodeKind,
        position: impl Into<crate::types::Position>,
    ) -> Self {
        self.nodes.push(GraphNode {
            id: id.into(),
            kind,
            position: position.into(),
            data: serde_json::Value::Null,
        });
        self
    }

    /// Set data on the most recently added node
    ///
    /// Must be called immediately after `add_node`.
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        if let Some(node) = self.nodes.last_mut() {
            node.data = data;
        }
        self
    }

    /// Add an edge between two nodes (auto-generates edge ID)
    pub fn add_edge(mut self, source: impl Into<String>, target: impl Into<String>) -> Self {
        self.edge_counter += 1;
        self.edges.push(GraphEdge {
            id: format!("edge-{}", self.edge_counter),
            source: source.into(),
            source_handle: None,
            target: target.into(),
            data: None,
        });
        self
    }

    /// Add an edge from a specific source handle (auto-generates edge ID)
    pub fn add_edge_from(
        mut self,
        source: impl Into<String>,
        source_handle: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        self.edge_counter += 1;
        self.edges.push(GraphEdge {
            id: format!("edge-{}", self.edge_counter),
            source: source.into(),
            source_handle: Some(source_handle.into()),
            target: target.into(),
            data: None,
        });
        self
    }

    /// Add an edge with an explicit ID
    pub fn add_edge_with_id(
        mut self,
        edge_id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        self.edges.push(GraphEdge {
            id: edge_id.into(),
            source: source.into(),
            source_handle: None,
            target: target.into(),
            data: None,
        });
        self
    }

    /// Build the graph
    pub fn build(self) -> WorkflowGraph {
        let mut graph = WorkflowGraph::new(self.id, self.name);
        graph.nodes = self.nodes;
        graph.edges = self.edges;
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_basic() {
        let graph = GraphBuilder::new("wf-1", "Test Workflow")
            .add_node("input-1", NodeKind::Sender, (0.0, 0.0))
            .with_data(serde_json::json!({"name": "Hello"}))
            .add_node("output-1", NodeKind::Receiver, (200.0, 0.0))
            .add_edge("input-1", "output-1")
            .build();

        assert_eq!(graph.id, "wf-1");
        assert_eq!(graph.name, "Test Workflow");
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.edges.len(), 1);
        assert_eq!(graph.nodes[0].data, serde_json::json!({"name": "Hello"}));
    }

    #[test]
    fn test_builder_auto_edge_ids() {
        let graph = GraphBuilder::new("wf", "Test")
            .add_node("a", NodeKind::Sender, (0.0, 0.0))
            .add_node("b", NodeKind::Plugin, (100.0, 0.0))
            .add_node("c", NodeKind::Receiver, (200.0, 0.0))
            .add_edge("a", "b")
            .add_edge("b", "c")
            .build();

        assert_eq!(graph.edges[0].id, "edge-1");
        assert_eq!(graph.edges[1].id, "edge-2");
    }

    #[test]
    fn test_builder_edge_with_handle() {
        let graph = GraphBuilder::new("wf", "Test")
            .add_node("a", NodeKind::Sender, (0.0, 0.0))
            .add_node("b", NodeKind::Receiver, (100.0, 0.0))
            .add_edge_from("a", "file_output", "b")
            .build();

        assert_eq!(graph.edges[0].source_handle.as_deref(), Some("file_output"));
    }
}
