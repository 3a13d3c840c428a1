//! Road-network graph: nodes, directed or two-way edges, and an adjacency index.

use std::collections::HashMap;

use crate::geometry::Coordinates;
use crate::traffic::TrafficOverride;

/// Stable integer key of a road-network node.
pub type NodeId = i64;

/// Reserved identifier that makes [`Graph::outgoing_edges`] return every edge.
///
/// No real node may use this id; it exists for callers that want to enumerate
/// the whole edge list through the same accessor.
pub const ALL_EDGES: NodeId = -1;

/// Intersection or endpoint in the road network.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub latitude: f64,
    pub longitude: f64,
}

impl Node {
    pub fn new(id: NodeId, latitude: f64, longitude: f64) -> Self {
        Self {
            id,
            latitude,
            longitude,
        }
    }

    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

/// Road segment between two nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
    /// Physical length in metres.
    pub distance: f64,
    /// Posted speed limit; units are inferred by the cost model.
    pub max_speed: Option<f64>,
    pub highway_type: Option<String>,
    pub name: Option<String>,
    pub oneway: bool,
    /// Traffic adjustment attached at ingestion time.
    pub traffic: Option<TrafficOverride>,
}

impl Edge {
    /// Bidirectional edge with no optional attributes.
    pub fn new(source: NodeId, target: NodeId, distance: f64) -> Self {
        Self {
            source,
            target,
            distance,
            max_speed: None,
            highway_type: None,
            name: None,
            oneway: false,
            traffic: None,
        }
    }

    pub fn with_max_speed(mut self, speed: f64) -> Self {
        self.max_speed = Some(speed);
        self
    }

    pub fn with_highway(mut self, highway: impl Into<String>) -> Self {
        self.highway_type = Some(highway.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn one_way(mut self) -> Self {
        self.oneway = true;
        self
    }

    /// Node reached when leaving `from` along this edge, if that direction is allowed.
    pub fn traverse_from(&self, from: NodeId) -> Option<NodeId> {
        if self.source == from {
            Some(self.target)
        } else if !self.oneway && self.target == from {
            Some(self.source)
        } else {
            None
        }
    }

    /// Whether this edge can be used to travel from `from` to `to`.
    pub fn connects(&self, from: NodeId, to: NodeId) -> bool {
        self.traverse_from(from) == Some(to)
    }
}

/// Road network used by the planners.
///
/// Owns the node map and the edge list; the adjacency index only stores offsets
/// into the edge list so a bidirectional edge is kept once but reachable from
/// both endpoints.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: HashMap<NodeId, Node>,
    edges: Vec<Edge>,
    adjacency: HashMap<NodeId, Vec<usize>>,
}

impl Graph {
    /// Build a graph from owned node and edge collections.
    pub fn new(nodes: HashMap<NodeId, Node>, edges: Vec<Edge>) -> Self {
        let mut graph = Self::default();
        graph.initialize(nodes, edges);
        graph
    }

    /// Replace the graph contents and rebuild the adjacency index.
    pub fn initialize(&mut self, nodes: HashMap<NodeId, Node>, edges: Vec<Edge>) {
        self.nodes = nodes;
        self.edges = edges;
        self.adjacency = build_adjacency(&self.nodes, &self.edges);
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.values()
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn edge(&self, offset: usize) -> Option<&Edge> {
        self.edges.get(offset)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Edges touching `id`, including bidirectional edges that end at `id`.
    ///
    /// Unknown ids yield an empty list. [`ALL_EDGES`] yields the full edge list.
    pub fn outgoing_edges(&self, id: NodeId) -> Vec<&Edge> {
        if id == ALL_EDGES {
            return self.edges.iter().collect();
        }
        self.edge_offsets(id)
            .iter()
            .map(|&offset| &self.edges[offset])
            .collect()
    }

    /// Traversable neighbours of `id` as `(neighbour, edge offset, edge)`.
    pub fn neighbours(&self, id: NodeId) -> impl Iterator<Item = (NodeId, usize, &Edge)> + '_ {
        self.edge_offsets(id).iter().filter_map(move |&offset| {
            let edge = &self.edges[offset];
            edge.traverse_from(id).map(|next| (next, offset, edge))
        })
    }

    /// Edge that allows travel from `from` to `to`.
    ///
    /// Forward edges out of `from` are preferred; a bidirectional edge stored
    /// in the `to -> from` direction is accepted otherwise.
    pub fn edge_between(&self, from: NodeId, to: NodeId) -> Option<&Edge> {
        let forward = self
            .edge_offsets(from)
            .iter()
            .map(|&offset| &self.edges[offset])
            .find(|edge| edge.source == from && edge.target == to);
        forward.or_else(|| {
            self.edge_offsets(to)
                .iter()
                .map(|&offset| &self.edges[offset])
                .find(|edge| !edge.oneway && edge.source == to && edge.target == from)
        })
    }

    /// Great-circle distance in metres between two nodes, `None` if either is unknown.
    pub fn straight_line_distance(&self, from: NodeId, to: NodeId) -> Option<f64> {
        let a = self.node(from)?;
        let b = self.node(to)?;
        Some(a.coordinates().distance_to(&b.coordinates()))
    }

    fn edge_offsets(&self, id: NodeId) -> &[usize] {
        self.adjacency
            .get(&id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

fn build_adjacency(nodes: &HashMap<NodeId, Node>, edges: &[Edge]) -> HashMap<NodeId, Vec<usize>> {
    let mut adjacency: HashMap<NodeId, Vec<usize>> = HashMap::with_capacity(nodes.len());
    for (offset, edge) in edges.iter().enumerate() {
        adjacency.entry(edge.source).or_default().push(offset);
        if !edge.oneway && edge.target != edge.source {
            adjacency.entry(edge.target).or_default().push(offset);
        }
    }
    adjacency
}
