//! Road network routing library.
//!
//! This crate loads a road network from JSON, turns it into an in-memory
//! [`Graph`], and plans routes between two coordinates with A* or Dijkstra
//! under a distance or travel-time cost model. Higher-level consumers (the
//! CLI) should only depend on the items exported here instead of
//! reimplementing behavior.
//!

#![deny(warnings)]

pub mod config;
pub mod cost;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod locate;
pub mod network;
pub mod output;
pub mod path;
pub mod routing;
pub mod traffic;

#[cfg(test)]
mod test_helpers;

pub use config::Config;
pub use cost::{CostFunction, CostModel, HighwaySpeeds, SpeedLookup};
pub use error::{Error, Result};
pub use geometry::Coordinates;
pub use graph::{Edge, Graph, Node, NodeId, ALL_EDGES};
pub use locate::nearest_node;
pub use network::{load_network, NetworkFilter, NetworkSummary, RoadNetwork};
pub use output::{export_route_csv, RouteStep, RouteSummary};
pub use path::{find_route_a_star, find_route_dijkstra, PathSearch, Route};
pub use routing::{
    create_planner, AStarPlanner, DijkstraPlanner, PlanFailure, Planner, PlannerKind,
    PlannerResult,
};
pub use traffic::{apply_traffic_overrides, EdgeKey, TrafficOverride, TrafficOverrides};
