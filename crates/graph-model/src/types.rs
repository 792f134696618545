//! Core types for workflow graphs
//!
//! These types define the canonical graph snapshot shared by the
//! compatibility and layout engines: nodes, edges, and their metadata.

use serde::{Deserialize, Serialize};

/// Unique identifier for a node
pub type NodeId = String;

/// Unique identifier for an edge
pub type EdgeId = String;

/// Unique identifier for a source handle on a node
pub type HandleId = String;

/// The kind of a node
///
/// A closed set: every node on the canvas is one of these, and grouping
/// logic matches exhaustively on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Emits data into the graph
    Sender,
    /// Consumes data from the graph
    Receiver,
    /// Transforms data in flight
    Plugin,
    /// Anything the editor does not classify
    Other,
}

/// Position of a node on the canvas
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    /// Create a position from coordinates
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Position {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// A node instance in a graph
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    /// Unique identifier for this node instance
    pub id: NodeId,
    /// Kind of the node
    pub kind: NodeKind,
    /// Position on the canvas
    pub position: Position,
    /// Custom data/configuration for this instance
    pub data: serde_json::Value,
}

/// An edge connecting two nodes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    /// Unique identifier for this edge
    pub id: EdgeId,
    /// Source node ID
    pub source: NodeId,
    /// Source handle ID, if the source node exposes multiple outputs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_handle: Option<HandleId>,
    /// Target node ID
    pub target: NodeId,
    /// Optional edge metadata (color, labels, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl GraphEdge {
    /// True if this edge touches the given node id on either end
    pub fn touches(&self, node_id: &str) -> bool {
        self.source == node_id || self.target == node_id
    }
}

/// A complete workflow graph snapshot
///
/// Snapshots are supplied by an external store, transformed by the engines,
/// and handed back for persistence. The engines never retain one between
/// calls. Id uniqueness is the responsibility of the external id generator;
/// edges referencing absent node ids are tolerated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowGraph {
    /// Unique identifier for this graph
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Nodes in the graph
    pub nodes: Vec<GraphNode>,
    /// Edges connecting nodes
    pub edges: Vec<GraphEdge>,
}

impl WorkflowGraph {
    /// Create a new empty graph
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Add a node to the graph
    pub fn add_node(&mut self, node: GraphNode) {
        self.nodes.push(node);
    }

    /// Remove a node and every edge touching it
    ///
    /// A no-op if the id is unknown.
    pub fn remove_node(&mut self, node_id: &str) {
        let before = self.nodes.len();
        self.nodes.retain(|n| n.id != node_id);
        if self.nodes.len() != before {
            self.edges.retain(|e| !e.touches(node_id));
        }
    }

    /// Add an edge, replacing any existing edge with the same id
    pub fn add_or_replace_edge(&mut self, edge: GraphEdge) {
        if let Some(existing) = self.edges.iter_mut().find(|e| e.id == edge.id) {
            *existing = edge;
        } else {
            self.edges.push(edge);
        }
    }

    /// Find a node by ID
    pub fn find_node(&self, id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Find a node by ID (mutable)
    pub fn find_node_mut(&mut self, id: &str) -> Option<&mut GraphNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    /// Get edges coming into a node
    pub fn incoming_edges<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a GraphEdge> + 'a {
        self.edges.iter().filter(move |e| e.target == node_id)
    }

    /// Get edges going out of a node
    pub fn outgoing_edges<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a GraphEdge> + 'a {
        self.edges.iter().filter(move |e| e.source == node_id)
    }
}
