//! Planner strategies and the factory that selects them.

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::cost::CostModel;
use crate::error::{suggest, Error, Result};
use crate::geometry::Coordinates;
use crate::graph::{Graph, NodeId};
use crate::locate::nearest_node;
use crate::path::{find_route_a_star, find_route_dijkstra, PathSearch};

use super::{PlanFailure, PlannerResult};

/// Trait for route planning strategies.
///
/// Implementations resolve both coordinates to nodes, search, and report the
/// outcome as a [`PlannerResult`]. Failures are values, never panics.
pub trait Planner: Send + Sync {
    /// Plan a route between two coordinates.
    fn plan(&self, graph: &Graph, start: &Coordinates, goal: &Coordinates) -> PlannerResult;

    /// Display name of the algorithm.
    fn name(&self) -> &'static str;
}

/// A* search guided by the cost model's heuristic.
#[derive(Debug, Clone, Default)]
pub struct AStarPlanner {
    model: CostModel,
}

impl AStarPlanner {
    pub fn new(model: CostModel) -> Self {
        Self { model }
    }

    pub fn cost_model(&self) -> &CostModel {
        &self.model
    }
}

impl Planner for AStarPlanner {
    fn plan(&self, graph: &Graph, start: &Coordinates, goal: &Coordinates) -> PlannerResult {
        plan_between(self.name(), &self.model, graph, start, goal, find_route_a_star)
    }

    fn name(&self) -> &'static str {
        "A*"
    }
}

/// Dijkstra's algorithm; explores more nodes but needs no heuristic.
#[derive(Debug, Clone, Default)]
pub struct DijkstraPlanner {
    model: CostModel,
}

impl DijkstraPlanner {
    pub fn new(model: CostModel) -> Self {
        Self { model }
    }

    pub fn cost_model(&self) -> &CostModel {
        &self.model
    }
}

impl Planner for DijkstraPlanner {
    fn plan(&self, graph: &Graph, start: &Coordinates, goal: &Coordinates) -> PlannerResult {
        plan_between(self.name(), &self.model, graph, start, goal, find_route_dijkstra)
    }

    fn name(&self) -> &'static str {
        "Dijkstra"
    }
}

fn plan_between(
    name: &'static str,
    model: &CostModel,
    graph: &Graph,
    start: &Coordinates,
    goal: &Coordinates,
    search: fn(&Graph, NodeId, NodeId, &CostModel) -> PathSearch,
) -> PlannerResult {
    let cost_function = model.cost_function();
    let Some(start_id) = nearest_node(graph, start) else {
        return PlannerResult::failed(name, cost_function, PlanFailure::StartUnresolved);
    };
    let Some(goal_id) = nearest_node(graph, goal) else {
        return PlannerResult::failed(name, cost_function, PlanFailure::GoalUnresolved);
    };
    debug!(
        planner = name,
        %cost_function,
        start = start_id,
        goal = goal_id,
        "resolved route endpoints"
    );

    let PathSearch {
        route,
        nodes_explored,
    } = search(graph, start_id, goal_id, model);

    match route {
        Ok(route) => PlannerResult::found(name, cost_function, route, nodes_explored),
        Err(failure) => {
            debug!(planner = name, %failure, "planning failed");
            let mut result = PlannerResult::failed(name, cost_function, failure);
            result.start = Some(start_id);
            result.goal = Some(goal_id);
            result.nodes_explored = nodes_explored;
            result
        }
    }
}

/// Planner variants selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlannerKind {
    #[default]
    AStar,
    Dijkstra,
}

impl PlannerKind {
    /// Build the planner for this variant.
    pub fn create(self, model: CostModel) -> Box<dyn Planner> {
        match self {
            PlannerKind::AStar => Box::new(AStarPlanner::new(model)),
            PlannerKind::Dijkstra => Box::new(DijkstraPlanner::new(model)),
        }
    }
}

impl fmt::Display for PlannerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            PlannerKind::AStar => "astar",
            PlannerKind::Dijkstra => "dijkstra",
        };
        f.write_str(value)
    }
}

impl FromStr for PlannerKind {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "astar" | "a-star" | "a*" | "a_star" => Ok(PlannerKind::AStar),
            "dijkstra" => Ok(PlannerKind::Dijkstra),
            _ => Err(Error::UnknownPlanner {
                name: raw.to_string(),
                suggestions: suggest(raw, &["astar", "dijkstra"]),
            }),
        }
    }
}

/// Select the planner for `kind` configured with `model`.
pub fn create_planner(kind: PlannerKind, model: CostModel) -> Box<dyn Planner> {
    kind.create(model)
}
