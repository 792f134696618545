//! Auto-layout for workflow graphs
//!
//! Recomputes node positions from topological depth, arranging the graph
//! left-to-right by causal distance from its root nodes. Pure
//! snapshot-in/snapshot-out: only `position` changes, edges are untouched,
//! and no structurally valid input can fail. Edges referencing absent
//! nodes are ignored for depth purposes rather than raised as errors.

use std::collections::{BTreeMap, HashMap, HashSet};

use graph_model::{GraphEdge, GraphNode, NodeId, NodeKind, Position, WorkflowGraph};

/// X coordinate of the first depth column
pub const START_X: f64 = 150.0;
/// Y coordinate of the first row in each column
pub const START_Y: f64 = 150.0;
/// Horizontal distance between depth columns
pub const HORIZONTAL_SPACING: f64 = 400.0;
/// Vertical distance between rows within a column
pub const VERTICAL_SPACING: f64 = 200.0;

/// Left-to-right ordering priority within a depth column
fn kind_rank(kind: NodeKind) -> u8 {
    match kind {
        NodeKind::Sender => 0,
        NodeKind::Plugin => 1,
        NodeKind::Receiver => 2,
        NodeKind::Other => 3,
    }
}

/// Compute the topological depth of every node
///
/// Depth is 0 for nodes with no resolvable incoming edge, otherwise
/// `1 + max(depth(p))` over distinct predecessors. Computed iteratively
/// with a memoized depth table and in-progress marking: a predecessor that
/// is still in progress closes a cycle and contributes depth 0 instead of
/// being expanded further. O(V+E) on any input, cycles included.
pub fn node_depths(nodes: &[GraphNode], edges: &[GraphEdge]) -> HashMap<NodeId, usize> {
    let present: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();

    // Distinct predecessors per node, skipping dangling edges.
    let mut preds: HashMap<&str, Vec<&str>> = HashMap::new();
    for edge in edges {
        if present.contains(edge.source.as_str()) && present.contains(edge.target.as_str()) {
            let entry = preds.entry(edge.target.as_str()).or_default();
            if !entry.contains(&edge.source.as_str()) {
                entry.push(edge.source.as_str());
            }
        }
    }

    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        InProgress,
        Done,
    }

    let mut marks: HashMap<&str, Mark> = HashMap::new();
    let mut depths: HashMap<NodeId, usize> = HashMap::new();

    for start in nodes {
        if marks.contains_key(start.id.as_str()) {
            continue;
        }

        // Frames are (node id, expanded): a node is pushed unexpanded,
        // expanded once to enqueue its predecessors, then finalized when
        // it resurfaces with every resolvable predecessor done.
        let mut stack: Vec<(&str, bool)> = vec![(start.id.as_str(), false)];
        while let Some((id, expanded)) = stack.pop() {
            if expanded {
                let depth = preds
                    .get(id)
                    .map(|ps| {
                        ps.iter()
                            // In-progress predecessors (cycle members) have
                            // no depth yet and count as 0.
                            .map(|p| depths.get(*p).copied().unwrap_or(0) + 1)
                            .max()
                            .unwrap_or(0)
                    })
                    .unwrap_or(0);
                depths.insert(id.to_string(), depth);
                marks.insert(id, Mark::Done);
                continue;
            }

            if marks.contains_key(id) {
                // Duplicate frame: already resolved (or being resolved)
                // from another path.
                continue;
            }
            marks.insert(id, Mark::InProgress);
            stack.push((id, true));
            if let Some(ps) = preds.get(id) {
                for p in ps {
                    if !marks.contains_key(*p) {
                        stack.push((p, false));
                    }
                }
            }
        }
    }

    depths
}

/// Arrange nodes left-to-right by topological depth
///
/// Returns the full node list with updated positions; length, ids, and
/// data are unchanged. Within a depth column nodes are stable-sorted by
/// kind priority (senders, then plugins, then receivers). Nodes touching
/// no edge at all are placed in a separate region to the right of the
/// deepest used column, sub-grouped by kind.
pub fn arrange(nodes: &[GraphNode], edges: &[GraphEdge]) -> Vec<GraphNode> {
    let depths = node_depths(nodes, edges);

    // Connectivity is judged on the raw edge list, so a node whose only
    // edge dangles stays in the depth columns.
    let connected: HashSet<&str> = edges
        .iter()
        .flat_map(|e| [e.source.as_str(), e.target.as_str()])
        .collect();

    let mut columns: BTreeMap<usize, Vec<&GraphNode>> = BTreeMap::new();
    let mut isolated: Vec<&GraphNode> = Vec::new();
    for node in nodes {
        if connected.contains(node.id.as_str()) {
            let depth = depths.get(node.id.as_str()).copied().unwrap_or(0);
            columns.entry(depth).or_default().push(node);
        } else {
            isolated.push(node);
        }
    }

    let mut positions: HashMap<&str, Position> = HashMap::new();
    for (column, group) in columns.values_mut().enumerate() {
        group.sort_by_key(|n| kind_rank(n.kind));
        let x = START_X + column as f64 * HORIZONTAL_SPACING;
        for (row, node) in group.iter().enumerate() {
            positions.insert(
                node.id.as_str(),
                Position::new(x, START_Y + row as f64 * VERTICAL_SPACING),
            );
        }
    }

    // Two spare columns of gap between the connected layout and the
    // isolated region; kinds fan out into per-kind sub-columns.
    let isolated_x = START_X + (columns.len() + 2) as f64 * HORIZONTAL_SPACING;
    for (row, node) in isolated.iter().enumerate() {
        positions.insert(
            node.id.as_str(),
            Position::new(
                isolated_x + kind_rank(node.kind) as f64 * HORIZONTAL_SPACING,
                START_Y + row as f64 * VERTICAL_SPACING,
            ),
        );
    }

    log::debug!(
        "arranged {} node(s) across {} depth column(s), {} isolated",
        nodes.len(),
        columns.len(),
        isolated.len()
    );

    nodes
        .iter()
        .map(|node| {
            let mut out = node.clone();
            if let Some(pos) = positions.get(node.id.as_str()) {
                out.position = *pos;
            }
            out
        })
        .collect()
}

/// Arrange a whole graph snapshot, returning a new snapshot
///
/// Convenience for callers that hold a [`WorkflowGraph`]: nodes are
/// re-positioned, everything else is carried over verbatim.
pub fn arrange_graph(graph: &WorkflowGraph) -> WorkflowGraph {
    let mut out = graph.clone();
    out.nodes = arrange(&graph.nodes, &graph.edges);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use graph_model::GraphBuilder;

    fn position_of<'a>(nodes: &'a [GraphNode], id: &str) -> &'a Position {
        &nodes.iter().find(|n| n.id == id).unwrap().position
    }

    #[test]
    fn test_chain_depths_and_columns() {
        let graph = GraphBuilder::new("wf", "Chain")
            .add_node("1", NodeKind::Sender, (0.0, 0.0))
            .add_node("2", NodeKind::Plugin, (0.0, 0.0))
            .add_node("3", NodeKind::Receiver, (0.0, 0.0))
            .add_edge("1", "2")
            .add_edge("2", "3")
            .build();

        let depths = node_depths(&graph.nodes, &graph.edges);
        assert_eq!(depths["1"], 0);
        assert_eq!(depths["2"], 1);
        assert_eq!(depths["3"], 2);

        let arranged = arrange(&graph.nodes, &graph.edges);
        assert_eq!(position_of(&arranged, "1").x, START_X);
        assert_eq!(position_of(&arranged, "2").x, START_X + HORIZONTAL_SPACING);
        assert_eq!(
            position_of(&arranged, "3").x,
            START_X + 2.0 * HORIZONTAL_SPACING
        );
        assert!(position_of(&arranged, "1").x < position_of(&arranged, "2").x);
        assert!(position_of(&arranged, "2").x < position_of(&arranged, "3").x);
    }

    #[test]
    fn test_depth_takes_longest_path() {
        let graph = GraphBuilder::new("wf", "Diamond")
            .add_node("a", NodeKind::Sender, (0.0, 0.0))
            .add_node("b", NodeKind::Plugin, (0.0, 0.0))
            .add_node("c", NodeKind::Receiver, (0.0, 0.0))
            .add_edge("a", "b")
            .add_edge("a", "c")
            .add_edge("b", "c")
            .build();

        let depths = node_depths(&graph.nodes, &graph.edges);
        assert_eq!(depths["a"], 0);
        assert_eq!(depths["b"], 1);
        assert_eq!(depths["c"], 2);
    }

    #[test]
    fn test_cycle_terminates_with_finite_depths() {
        let graph = GraphBuilder::new("wf", "Cycle")
            .add_node("a", NodeKind::Plugin, (0.0, 0.0))
            .add_node("b", NodeKind::Plugin, (0.0, 0.0))
            .add_edge("a", "b")
            .add_edge("b", "a")
            .build();

        let depths = node_depths(&graph.nodes, &graph.edges);
        // The member that closes the cycle resolves first against a
        // zero-depth back-reference; its partner stacks on top of it.
        assert_eq!(depths["b"], 1);
        assert_eq!(depths["a"], 2);

        // And layout still assigns every node a position.
        let arranged = arrange(&graph.nodes, &graph.edges);
        assert_eq!(arranged.len(), 2);
    }

    #[test]
    fn test_dangling_edges_are_ignored() {
        let graph = GraphBuilder::new("wf", "Dangling")
            .add_node("a", NodeKind::Sender, (0.0, 0.0))
            .add_edge("a", "ghost")
            .add_edge("phantom", "a")
            .build();

        let depths = node_depths(&graph.nodes, &graph.edges);
        assert_eq!(depths["a"], 0);

        // The node still counts as connected, so it keeps its column.
        let arranged = arrange(&graph.nodes, &graph.edges);
        assert_eq!(position_of(&arranged, "a").x, START_X);
    }

    #[test]
    fn test_kind_priority_within_column() {
        let graph = GraphBuilder::new("wf", "Roots")
            .add_node("r", NodeKind::Receiver, (0.0, 0.0))
            .add_node("s", NodeKind::Sender, (0.0, 0.0))
            .add_node("sink", NodeKind::Plugin, (0.0, 0.0))
            .add_edge("r", "sink")
            .add_edge("s", "sink")
            .build();

        let arranged = arrange(&graph.nodes, &graph.edges);
        // Both roots share depth 0; the sender sorts above the receiver.
        assert_eq!(position_of(&arranged, "s").y, START_Y);
        assert_eq!(
            position_of(&arranged, "r").y,
            START_Y + VERTICAL_SPACING
        );
        assert_eq!(position_of(&arranged, "s").x, position_of(&arranged, "r").x);
    }

    #[test]
    fn test_isolated_nodes_go_right_of_deepest_column() {
        let graph = GraphBuilder::new("wf", "Isolated")
            .add_node("a", NodeKind::Sender, (0.0, 0.0))
            .add_node("b", NodeKind::Receiver, (0.0, 0.0))
            .add_node("lone", NodeKind::Plugin, (0.0, 0.0))
            .add_edge("a", "b")
            .build();

        let arranged = arrange(&graph.nodes, &graph.edges);
        let deepest_connected = position_of(&arranged, "b").x;
        assert!(position_of(&arranged, "lone").x > deepest_connected);
    }

    #[test]
    fn test_isolated_nodes_subgroup_by_kind() {
        let graph = GraphBuilder::new("wf", "Isolated Kinds")
            .add_node("s", NodeKind::Sender, (0.0, 0.0))
            .add_node("p", NodeKind::Plugin, (0.0, 0.0))
            .add_node("r", NodeKind::Receiver, (0.0, 0.0))
            .build();

        let arranged = arrange(&graph.nodes, &graph.edges);
        let sx = position_of(&arranged, "s").x;
        let px = position_of(&arranged, "p").x;
        let rx = position_of(&arranged, "r").x;
        assert_eq!(px, sx + HORIZONTAL_SPACING);
        assert_eq!(rx, sx + 2.0 * HORIZONTAL_SPACING);
    }

    #[test]
    fn test_arrange_preserves_everything_but_positions() {
        let graph = GraphBuilder::new("wf", "Preserve")
            .add_node("a", NodeKind::Sender, (17.0, 42.0))
            .with_data(serde_json::json!({"name": "A"}))
            .add_node("b", NodeKind::Receiver, (3.0, 9.0))
            .add_edge_from("a", "out", "b")
            .build();

        let arranged = arrange_graph(&graph);
        assert_eq!(arranged.id, graph.id);
        assert_eq!(arranged.edges.len(), 1);
        assert_eq!(arranged.edges[0].source_handle.as_deref(), Some("out"));
        assert_eq!(arranged.nodes.len(), graph.nodes.len());
        assert_eq!(arranged.nodes[0].id, "a");
        assert_eq!(arranged.nodes[0].data, serde_json::json!({"name": "A"}));
        assert_ne!(arranged.nodes[0].position, graph.nodes[0].position);
    }
}
