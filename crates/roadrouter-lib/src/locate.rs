//! Matching coordinates to graph nodes.

use crate::geometry::Coordinates;
use crate::graph::{Graph, NodeId};

/// Find the node closest to `coords` by great-circle distance.
///
/// Scans every node. Equal distances resolve to the lower node id so the
/// answer does not depend on hash-map iteration order. Returns `None` only for
/// a graph without nodes.
pub fn nearest_node(graph: &Graph, coords: &Coordinates) -> Option<NodeId> {
    let mut best: Option<(f64, NodeId)> = None;
    for node in graph.nodes() {
        let distance = coords.distance_to(&node.coordinates());
        let closer = match best {
            None => true,
            Some((best_distance, best_id)) => {
                distance < best_distance || (distance == best_distance && node.id < best_id)
            }
        };
        if closer {
            best = Some((distance, node.id));
        }
    }
    best.map(|(_, id)| id)
}
