// Test-only helpers for `roadrouter-lib` unit tests
#![allow(dead_code)]

use std::collections::HashMap;

use crate::graph::{Edge, Graph, Node, NodeId};

/// Builder to assemble small graphs in tests.
#[derive(Default)]
pub struct GraphBuilder {
    nodes: HashMap<NodeId, Node>,
    edges: Vec<Edge>,
}

impl GraphBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(mut self, id: NodeId, latitude: f64, longitude: f64) -> Self {
        self.nodes.insert(id, Node::new(id, latitude, longitude));
        self
    }

    pub fn edge(mut self, edge: Edge) -> Self {
        self.edges.push(edge);
        self
    }

    /// Nodes `ids` placed along the equator `spacing_deg` apart, joined by
    /// bidirectional edges whose length is the great-circle distance.
    pub fn line(mut self, ids: &[NodeId], spacing_deg: f64) -> Self {
        for (index, &id) in ids.iter().enumerate() {
            self = self.node(id, 0.0, index as f64 * spacing_deg);
        }
        for pair in ids.windows(2) {
            let a = self.nodes[&pair[0]].coordinates();
            let b = self.nodes[&pair[1]].coordinates();
            self.edges.push(Edge::new(pair[0], pair[1], a.distance_to(&b)));
        }
        self
    }

    pub fn build(self) -> Graph {
        Graph::new(self.nodes, self.edges)
    }
}
