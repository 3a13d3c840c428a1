//! Best-first search over a [`Graph`] shared by the A* and Dijkstra planners.
//!
//! Edge costs must be non-negative; edges whose cost is negative or NaN are
//! never relaxed.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use tracing::debug;

use crate::cost::CostModel;
use crate::graph::{Graph, NodeId};
use crate::routing::PlanFailure;

/// Path found by the search together with totals recomputed from its edges.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub nodes: Vec<NodeId>,
    /// Offsets into [`Graph::edges`] of the edges taken, one per hop.
    pub edges: Vec<usize>,
    /// Sum of edge lengths in metres.
    pub total_distance_m: f64,
    /// Sum of per-edge travel times in seconds.
    pub total_time_s: f64,
    /// Sum of edge costs in the model's unit.
    pub total_cost: f64,
}

/// Outcome of one best-first search.
#[derive(Debug, Clone, PartialEq)]
pub struct PathSearch {
    pub route: std::result::Result<Route, PlanFailure>,
    /// Number of entries popped from the frontier.
    pub nodes_explored: usize,
}

/// Run A* search between two known node ids using `model` for costs and heuristic.
pub fn find_route_a_star(
    graph: &Graph,
    start: NodeId,
    goal: NodeId,
    model: &CostModel,
) -> PathSearch {
    best_first(graph, start, goal, model, |node| {
        model.heuristic(graph, node, goal)
    })
}

/// Run Dijkstra's algorithm: the same search with a zero heuristic.
pub fn find_route_dijkstra(
    graph: &Graph,
    start: NodeId,
    goal: NodeId,
    model: &CostModel,
) -> PathSearch {
    best_first(graph, start, goal, model, |_| 0.0)
}

#[derive(Debug, Clone, Copy)]
struct NodeState {
    g: f64,
    /// Predecessor node and the offset of the edge taken from it.
    parent: Option<(NodeId, usize)>,
}

fn best_first<H>(
    graph: &Graph,
    start: NodeId,
    goal: NodeId,
    model: &CostModel,
    heuristic: H,
) -> PathSearch
where
    H: Fn(NodeId) -> f64,
{
    let mut states: HashMap<NodeId, NodeState> = HashMap::new();
    let mut frontier = BinaryHeap::new();
    let mut nodes_explored = 0usize;

    states.insert(start, NodeState { g: 0.0, parent: None });
    frontier.push(FrontierEntry::new(start, 0.0, heuristic(start)));

    while let Some(entry) = frontier.pop() {
        nodes_explored += 1;

        let current_g = match states.get(&entry.node) {
            Some(state) if entry.g.0 > state.g => continue,
            Some(state) => state.g,
            None => continue,
        };

        if entry.node == goal {
            debug!(
                nodes_explored,
                frontier = frontier.len(),
                visited = states.len(),
                "search reached goal"
            );
            return PathSearch {
                route: reconstruct_route(graph, &states, start, goal, model),
                nodes_explored,
            };
        }

        for (next, offset, edge) in graph.neighbours(entry.node) {
            let cost = model.edge_cost(edge);
            // Relaxation only terminates for non-negative costs.
            if !(cost >= 0.0) {
                continue;
            }
            let tentative_g = current_g + cost;
            let improves = states
                .get(&next)
                .map_or(true, |state| tentative_g < state.g);
            if improves {
                states.insert(
                    next,
                    NodeState {
                        g: tentative_g,
                        parent: Some((entry.node, offset)),
                    },
                );
                frontier.push(FrontierEntry::new(next, tentative_g, heuristic(next)));
            }
        }
    }

    debug!(nodes_explored, visited = states.len(), "frontier exhausted");
    PathSearch {
        route: Err(PlanFailure::Unreachable),
        nodes_explored,
    }
}

fn reconstruct_route(
    graph: &Graph,
    states: &HashMap<NodeId, NodeState>,
    start: NodeId,
    goal: NodeId,
    model: &CostModel,
) -> std::result::Result<Route, PlanFailure> {
    let mut nodes = vec![goal];
    let mut offsets = Vec::new();
    let mut current = goal;

    // A valid chain visits each recorded node at most once.
    while let Some((parent, offset)) = states
        .get(&current)
        .ok_or(PlanFailure::BrokenPredecessorChain)?
        .parent
    {
        if nodes.len() > states.len() {
            return Err(PlanFailure::BrokenPredecessorChain);
        }
        nodes.push(parent);
        offsets.push(offset);
        current = parent;
    }

    if current != start {
        return Err(PlanFailure::BrokenPredecessorChain);
    }

    nodes.reverse();
    offsets.reverse();

    let mut route = Route {
        nodes,
        edges: Vec::with_capacity(offsets.len()),
        total_distance_m: 0.0,
        total_time_s: 0.0,
        total_cost: 0.0,
    };
    for (pair, &offset) in route.nodes.windows(2).zip(&offsets) {
        let edge = graph
            .edge(offset)
            .filter(|edge| edge.connects(pair[0], pair[1]))
            .ok_or(PlanFailure::MissingPathEdge {
                from: pair[0],
                to: pair[1],
            })?;
        route.total_distance_m += edge.distance;
        route.total_time_s += model.edge_time_s(edge);
        route.total_cost += model.edge_cost(edge);
        route.edges.push(offset);
    }

    Ok(route)
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct FrontierEntry {
    node: NodeId,
    g: FloatOrd,
    f: FloatOrd,
}

impl FrontierEntry {
    fn new(node: NodeId, g: f64, h: f64) -> Self {
        Self {
            node,
            g: FloatOrd(g),
            f: FloatOrd(g + h),
        }
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so BinaryHeap pops the lowest f first, then the lowest id.
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.node.cmp(&self.node))
            .then_with(|| other.g.cmp(&self.g))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
