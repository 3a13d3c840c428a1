//! Route planning over a road [`Graph`](crate::Graph).
//!
//! This module provides:
//! - [`Planner`] - the strategy trait every algorithm implements
//! - [`AStarPlanner`] and [`DijkstraPlanner`] - the available strategies
//! - [`PlannerKind`] and [`create_planner`] - the factory used by configuration
//! - [`PlannerResult`] - the outcome of one planning call
//!
//! # Strategy Pattern
//!
//! Planners only expose `plan` and `name`. Each one owns the
//! [`CostModel`](crate::CostModel) it was built with, so no configuration
//! object is shared with the search and every call allocates its own search
//! state. A single graph can therefore be planned over from several threads.
//!
//! # Example
//!
//! ```ignore
//! use roadrouter_lib::{create_planner, Coordinates, CostModel, PlannerKind};
//!
//! let planner = create_planner(PlannerKind::AStar, CostModel::time(25.0));
//! let result = planner.plan(&graph, &Coordinates::new(0.0, 0.0), &Coordinates::new(0.0, 2.0));
//! if result.success {
//!     println!("{} nodes, {:.1} km", result.path.len(), result.total_distance_m / 1000.0);
//! }
//! ```

mod planner;

pub use planner::{create_planner, AStarPlanner, DijkstraPlanner, Planner, PlannerKind};

use serde::Serialize;
use thiserror::Error;

use crate::cost::CostFunction;
use crate::graph::NodeId;
use crate::path::Route;

/// Why a planning call did not produce a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlanFailure {
    /// No node could be matched to the start coordinate (empty graph).
    #[error("start coordinate could not be matched to a node")]
    StartUnresolved,
    /// No node could be matched to the goal coordinate (empty graph).
    #[error("goal coordinate could not be matched to a node")]
    GoalUnresolved,
    /// The frontier emptied before the goal was reached.
    #[error("goal is unreachable from start")]
    Unreachable,
    /// Predecessor links did not lead back to the start node.
    #[error("predecessor chain does not lead back to the start node")]
    BrokenPredecessorChain,
    /// A consecutive pair in the path has no connecting edge.
    #[error("no edge connects {from} to {to} on the reconstructed path")]
    MissingPathEdge { from: NodeId, to: NodeId },
}

/// Result of one `plan` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannerResult {
    pub success: bool,
    /// Name of the planner that produced the result.
    pub planner: &'static str,
    pub cost_function: CostFunction,
    /// Node matched to the start coordinate, when one was found.
    pub start: Option<NodeId>,
    /// Node matched to the goal coordinate, when one was found.
    pub goal: Option<NodeId>,
    /// Node ids from start to goal; empty on failure.
    pub path: Vec<NodeId>,
    /// Offsets into [`Graph::edges`](crate::Graph::edges) of the edges taken,
    /// one per hop.
    #[serde(skip)]
    pub path_edges: Vec<usize>,
    pub total_distance_m: f64,
    pub total_time_s: f64,
    /// Total in the cost function's unit (kilometres or seconds).
    pub total_cost: f64,
    pub nodes_explored: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<PlanFailure>,
}

impl PlannerResult {
    pub(crate) fn found(
        planner: &'static str,
        cost_function: CostFunction,
        route: Route,
        nodes_explored: usize,
    ) -> Self {
        Self {
            success: true,
            planner,
            cost_function,
            start: route.nodes.first().copied(),
            goal: route.nodes.last().copied(),
            path: route.nodes,
            path_edges: route.edges,
            total_distance_m: route.total_distance_m,
            total_time_s: route.total_time_s,
            total_cost: route.total_cost,
            nodes_explored,
            failure: None,
        }
    }

    pub(crate) fn failed(
        planner: &'static str,
        cost_function: CostFunction,
        failure: PlanFailure,
    ) -> Self {
        Self {
            success: false,
            planner,
            cost_function,
            start: None,
            goal: None,
            path: Vec::new(),
            path_edges: Vec::new(),
            total_distance_m: 0.0,
            total_time_s: 0.0,
            total_cost: 0.0,
            nodes_explored: 0,
            failure: Some(failure),
        }
    }

    /// Label of the cost function used, as written in configuration.
    pub fn cost_function_label(&self) -> &'static str {
        self.cost_function.label()
    }

    /// Number of edges on the path.
    pub fn hop_count(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}
