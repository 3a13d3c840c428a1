//! Common test utilities and fixture helpers.
//!
//! Provides the path to the shared street-grid fixture plus small synthetic
//! graphs used across the integration suites.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use roadrouter_lib::{Config, Edge, Graph, Node, NodeId};

/// Path to fixtures directory shared with the CLI tests.
#[allow(dead_code)]
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

/// Validated configuration for the street-grid fixture.
#[allow(dead_code)]
pub fn fixture_config() -> Config {
    Config::from_path(&fixtures_dir().join("roadrouter.toml")).expect("fixture config loads")
}

/// Build a graph from `(id, lat, lon)` triples and edges.
#[allow(dead_code)]
pub fn graph(nodes: &[(NodeId, f64, f64)], edges: Vec<Edge>) -> Graph {
    let nodes: HashMap<NodeId, Node> = nodes
        .iter()
        .map(|&(id, lat, lon)| (id, Node::new(id, lat, lon)))
        .collect();
    Graph::new(nodes, edges)
}

/// Nodes 1, 2, 3 along the equator one degree apart, joined by 1000 m edges.
#[allow(dead_code)]
pub fn three_node_line() -> Graph {
    graph(
        &[(1, 0.0, 0.0), (2, 0.0, 1.0), (3, 0.0, 2.0)],
        vec![Edge::new(1, 2, 1_000.0), Edge::new(2, 3, 1_000.0)],
    )
}

/// Deterministic pseudo-random sequence for synthetic graphs.
#[allow(dead_code)]
pub struct Lcg(u64);

#[allow(dead_code)]
impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Uniform value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }

    pub fn below(&mut self, bound: usize) -> usize {
        (self.next_f64() * bound as f64) as usize % bound
    }
}

/// Random graph whose edge lengths are never shorter than the great-circle
/// distance between their endpoints, as in a real road network.
///
/// At most one edge joins any pair of nodes and there are no self-loops, so
/// `Graph::edge_between` identifies the edge used for every hop.
#[allow(dead_code)]
pub fn random_road_graph(seed: u64, node_count: usize, edge_count: usize) -> Graph {
    let mut rng = Lcg::new(seed);
    let nodes: HashMap<NodeId, Node> = (0..node_count as NodeId)
        .map(|id| {
            let lat = 37.70 + rng.next_f64() * 0.1;
            let lon = -122.50 + rng.next_f64() * 0.1;
            (id, Node::new(id, lat, lon))
        })
        .collect();

    let mut edges = Vec::with_capacity(edge_count);
    let mut joined = HashSet::new();
    for _ in 0..edge_count * 4 {
        if edges.len() == edge_count {
            break;
        }
        let source = rng.below(node_count) as NodeId;
        let target = rng.below(node_count) as NodeId;
        if source == target || !joined.insert((source.min(target), source.max(target))) {
            continue;
        }
        let crow = nodes[&source].coordinates().distance_to(&nodes[&target].coordinates());
        let mut edge = Edge::new(source, target, crow * (1.0 + rng.next_f64()));
        if rng.next_f64() < 0.3 {
            edge = edge.one_way();
        }
        if rng.next_f64() < 0.5 {
            edge = edge.with_max_speed(15.0 + rng.next_f64() * 40.0);
        }
        edges.push(edge);
    }
    Graph::new(nodes, edges)
}
