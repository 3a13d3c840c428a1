//! Loading road networks from JSON exports.
//!
//! Two files describe a network:
//!
//! - `nodes.json`: an object keyed by stringified node id, each value holding
//!   `lat` and `lon` in degrees.
//! - `edges.json`: an array of `{"u", "v", "distance", "maxspeed"?,
//!   "highway"?, "name"?, "oneway"?}` records, `distance` in metres.
//!
//! OpenStreetMap exports are loose about the optional attributes, so
//! `maxspeed` may be a number or text such as `"30 mph"`, and `oneway` may be
//! a boolean or the string `"yes"`.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::graph::{Edge, Graph, Node, NodeId, ALL_EDGES};

/// Restricts which edges are kept while loading.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NetworkFilter {
    /// Allowed highway types; `None` keeps every edge.
    pub allowed_highways: Option<HashSet<String>>,
}

impl NetworkFilter {
    pub fn allow_all() -> Self {
        Self::default()
    }

    pub fn only<I, S>(highways: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed_highways: Some(highways.into_iter().map(Into::into).collect()),
        }
    }

    /// Edges without a highway tag always pass.
    pub fn allows(&self, highway_type: Option<&str>) -> bool {
        match (&self.allowed_highways, highway_type) {
            (Some(allowed), Some(highway)) => allowed.contains(highway),
            _ => true,
        }
    }
}

/// Nodes and edges read from disk, before the adjacency index is built.
#[derive(Debug, Clone, Default)]
pub struct RoadNetwork {
    pub nodes: HashMap<NodeId, Node>,
    pub edges: Vec<Edge>,
}

impl RoadNetwork {
    pub fn into_graph(self) -> Graph {
        Graph::new(self.nodes, self.edges)
    }
}

#[derive(Debug, Deserialize)]
struct RawNode {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct RawEdge {
    u: NodeId,
    v: NodeId,
    distance: f64,
    #[serde(default)]
    maxspeed: Value,
    #[serde(default)]
    highway: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    oneway: Value,
}

impl RawEdge {
    fn into_edge(self) -> Result<Edge> {
        if !(self.distance.is_finite() && self.distance >= 0.0) {
            return Err(Error::InvalidEdgeLength {
                from: self.u,
                to: self.v,
                distance: self.distance,
            });
        }
        Ok(Edge {
            source: self.u,
            target: self.v,
            distance: self.distance,
            max_speed: parse_max_speed(&self.maxspeed),
            highway_type: self.highway,
            name: self.name,
            oneway: parse_oneway(&self.oneway),
            traffic: None,
        })
    }
}

/// Load and filter a network from its two JSON files.
pub fn load_network(
    nodes_path: &Path,
    edges_path: &Path,
    filter: &NetworkFilter,
) -> Result<RoadNetwork> {
    let raw_nodes: HashMap<String, RawNode> = read_json(nodes_path)?;
    let nodes = parse_nodes(raw_nodes)?;

    let raw_edges: Vec<RawEdge> = read_json(edges_path)?;
    let total_edges = raw_edges.len();
    let mut edges = Vec::with_capacity(total_edges);
    for raw in raw_edges {
        let edge = raw.into_edge()?;
        if filter.allows(edge.highway_type.as_deref()) {
            edges.push(edge);
        }
    }

    let dangling = edges
        .iter()
        .filter(|edge| !nodes.contains_key(&edge.source) || !nodes.contains_key(&edge.target))
        .count();
    if dangling > 0 {
        warn!(dangling, "edges reference nodes missing from the nodes file");
    }

    info!(
        nodes = nodes.len(),
        edges = edges.len(),
        filtered = total_edges - edges.len(),
        "loaded road network"
    );
    Ok(RoadNetwork { nodes, edges })
}

/// Parse the `nodes.json` object.
pub fn parse_nodes_json(text: &str) -> Result<HashMap<NodeId, Node>> {
    parse_nodes(serde_json::from_str(text)?)
}

/// Parse the `edges.json` array without filtering.
pub fn parse_edges_json(text: &str) -> Result<Vec<Edge>> {
    let raw: Vec<RawEdge> = serde_json::from_str(text)?;
    raw.into_iter().map(RawEdge::into_edge).collect()
}

fn parse_nodes(raw: HashMap<String, RawNode>) -> Result<HashMap<NodeId, Node>> {
    raw.into_iter()
        .map(|(key, node)| {
            let id = key
                .trim()
                .parse::<NodeId>()
                .ok()
                .filter(|&id| id != ALL_EDGES)
                .ok_or_else(|| Error::InvalidNodeId { raw: key.clone() })?;
            Ok((id, Node::new(id, node.lat, node.lon)))
        })
        .collect()
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(Error::NetworkFileNotFound {
            path: path.to_path_buf(),
        });
    }
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

fn parse_max_speed(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => leading_number(text),
        // Some exports store conflicting limits as a list; the first one wins.
        Value::Array(values) => values.first().and_then(parse_max_speed),
        _ => None,
    }
}

fn leading_number(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let end = text
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (i == 0 && (c == '-' || c == '+'))))
        .map_or(text.len(), |(i, _)| i);
    text[..end].parse().ok()
}

fn parse_oneway(value: &Value) -> bool {
    match value {
        Value::Bool(flag) => *flag,
        Value::String(text) => text == "yes",
        _ => false,
    }
}

/// Highway and speed-limit composition of an edge list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NetworkSummary {
    pub total_edges: usize,
    pub edges_with_highway: usize,
    pub edges_with_max_speed: usize,
    pub edges_with_both: usize,
    /// Edge count per highway type.
    pub highway_counts: BTreeMap<String, usize>,
    /// Edge count per posted speed limit, keyed by its textual value.
    pub speed_counts: BTreeMap<String, usize>,
    /// Distinct speed limits seen on each highway type.
    pub speeds_by_highway: BTreeMap<String, BTreeSet<String>>,
}

impl NetworkSummary {
    pub fn from_edges(edges: &[Edge]) -> Self {
        let mut summary = Self {
            total_edges: edges.len(),
            ..Self::default()
        };

        for edge in edges {
            let highway = edge.highway_type.as_deref();
            let speed = edge.max_speed.map(|speed| speed.to_string());

            if let Some(highway) = highway {
                summary.edges_with_highway += 1;
                *summary.highway_counts.entry(highway.to_string()).or_default() += 1;
            }
            if let Some(speed) = &speed {
                summary.edges_with_max_speed += 1;
                *summary.speed_counts.entry(speed.clone()).or_default() += 1;
            }
            if let (Some(highway), Some(speed)) = (highway, speed) {
                summary.edges_with_both += 1;
                summary
                    .speeds_by_highway
                    .entry(highway.to_string())
                    .or_default()
                    .insert(speed);
            }
        }

        summary
    }

    pub fn edges_missing_highway(&self) -> usize {
        self.total_edges - self.edges_with_highway
    }

    pub fn edges_missing_max_speed(&self) -> usize {
        self.total_edges - self.edges_with_max_speed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn edge_lengths_must_be_finite_and_non_negative() {
        let edges = parse_edges_json(r#"[{"u": 1, "v": 2, "distance": 0.0}]"#).unwrap();
        assert_eq!(edges[0].distance, 0.0);

        let err = parse_edges_json(
            r#"[{"u": 1, "v": 2, "distance": -5.0}, {"u": 3, "v": 4, "distance": 10.0}]"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidEdgeLength { from: 1, to: 2, distance } if distance == -5.0
        ));
    }

    #[test]
    fn reserved_node_id_is_rejected() {
        let err = parse_nodes_json(r#"{"-1": {"lat": 0.0, "lon": 0.0}}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidNodeId { raw } if raw == "-1"));

        let nodes = parse_nodes_json(r#"{"-7": {"lat": 1.0, "lon": 2.0}}"#).unwrap();
        assert!(nodes.contains_key(&-7));
    }

    #[test]
    fn max_speed_accepts_numbers_and_text() {
        assert_eq!(parse_max_speed(&json!(30)), Some(30.0));
        assert_eq!(parse_max_speed(&json!(42.5)), Some(42.5));
        assert_eq!(parse_max_speed(&json!("30 mph")), Some(30.0));
        assert_eq!(parse_max_speed(&json!(" 50")), Some(50.0));
        assert_eq!(parse_max_speed(&json!(["25 mph", "35 mph"])), Some(25.0));
        assert_eq!(parse_max_speed(&json!("signals")), None);
        assert_eq!(parse_max_speed(&json!("")), None);
        assert_eq!(parse_max_speed(&Value::Null), None);
    }

    #[test]
    fn oneway_accepts_bool_and_yes() {
        assert!(parse_oneway(&json!(true)));
        assert!(parse_oneway(&json!("yes")));
        assert!(!parse_oneway(&json!("no")));
        assert!(!parse_oneway(&json!("-1")));
        assert!(!parse_oneway(&Value::Null));
    }

    #[test]
    fn parses_edge_records() {
        let edges = parse_edges_json(
            r#"[
                {"u": 1, "v": 2, "distance": 120.5, "maxspeed": "25 mph",
                 "highway": "residential", "name": "Elm Street", "oneway": "yes"},
                {"u": 2, "v": 3, "distance": 80.0}
            ]"#,
        )
        .unwrap();

        assert_eq!(
            edges[0],
            Edge::new(1, 2, 120.5)
                .with_max_speed(25.0)
                .with_highway("residential")
                .with_name("Elm Street")
                .one_way()
        );
        assert_eq!(edges[1], Edge::new(2, 3, 80.0));
    }

    #[test]
    fn rejects_non_numeric_node_keys() {
        let err = parse_nodes_json(r#"{"abc": {"lat": 0.0, "lon": 0.0}}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidNodeId { raw } if raw == "abc"));

        let nodes = parse_nodes_json(r#"{"-7": {"lat": 1.5, "lon": 2.5}}"#).unwrap();
        assert_eq!(nodes[&-7], Node::new(-7, 1.5, 2.5));
    }

    #[test]
    fn filter_keeps_untagged_edges() {
        let filter = NetworkFilter::only(["primary"]);
        assert!(filter.allows(Some("primary")));
        assert!(!filter.allows(Some("footway")));
        assert!(filter.allows(None));
        assert!(NetworkFilter::allow_all().allows(Some("footway")));
    }

    #[test]
    fn summary_counts_attributes() {
        let edges = vec![
            Edge::new(1, 2, 1.0).with_highway("primary").with_max_speed(45.0),
            Edge::new(2, 3, 1.0).with_highway("primary").with_max_speed(35.0),
            Edge::new(3, 4, 1.0).with_highway("residential"),
            Edge::new(4, 5, 1.0),
        ];
        let summary = NetworkSummary::from_edges(&edges);

        assert_eq!(summary.total_edges, 4);
        assert_eq!(summary.edges_with_highway, 3);
        assert_eq!(summary.edges_with_max_speed, 2);
        assert_eq!(summary.edges_with_both, 2);
        assert_eq!(summary.edges_missing_highway(), 1);
        assert_eq!(summary.edges_missing_max_speed(), 2);
        assert_eq!(summary.highway_counts["primary"], 2);
        assert_eq!(summary.speed_counts["45"], 1);
        assert_eq!(
            summary.speeds_by_highway["primary"],
            BTreeSet::from(["35".to_string(), "45".to_string()])
        );
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nodes.json");
        let err = load_network(&missing, &missing, &NetworkFilter::allow_all()).unwrap_err();
        assert!(matches!(err, Error::NetworkFileNotFound { path } if path == missing));
    }
}
