//! Route summaries for display and JSON, and CSV export of planned routes.

use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::{BufWriter, Write as _};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::cost::CostFunction;
use crate::error::{Error, Result};
use crate::geometry::{meters_to_km, meters_to_miles, Coordinates};
use crate::graph::{Edge, Graph, NodeId};
use crate::routing::PlannerResult;

/// Node on a planned route with its resolved position.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteStep {
    pub index: usize,
    pub id: NodeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinates: Option<Coordinates>,
    /// Name of the road used to reach this node.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub road: Option<String>,
    /// Length of the edge used to reach this node, in metres.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leg_distance_m: Option<f64>,
}

impl RouteStep {
    fn display_road(&self) -> &str {
        self.road.as_deref().unwrap_or("<unnamed>")
    }
}

/// Edge used for `hop`, preferring the one recorded by the search.
fn leg_edge<'g>(graph: &'g Graph, result: &PlannerResult, hop: usize) -> Option<&'g Edge> {
    let (from, to) = (result.path[hop], result.path[hop + 1]);
    match result.path_edges.get(hop) {
        Some(&offset) => graph.edge(offset).filter(|edge| edge.connects(from, to)),
        None => graph.edge_between(from, to),
    }
}

/// Structured representation of a successful plan for display and JSON output.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteSummary {
    pub planner: &'static str,
    pub cost_function: CostFunction,
    pub hops: usize,
    pub start: NodeId,
    pub goal: NodeId,
    pub distance_km: f64,
    pub distance_miles: f64,
    pub time_minutes: f64,
    pub nodes_explored: usize,
    pub steps: Vec<RouteStep>,
}

impl RouteSummary {
    /// Convert a [`PlannerResult`] into a summary with coordinates and road names.
    pub fn from_result(graph: &Graph, result: &PlannerResult) -> Result<Self> {
        let (Some(&start), Some(&goal)) = (result.path.first(), result.path.last()) else {
            return Err(Error::EmptyRoute);
        };

        let steps = result
            .path
            .iter()
            .enumerate()
            .map(|(index, &id)| {
                let edge = index
                    .checked_sub(1)
                    .and_then(|hop| leg_edge(graph, result, hop));
                RouteStep {
                    index,
                    id,
                    coordinates: graph.node(id).map(|node| node.coordinates()),
                    road: edge.and_then(|edge| edge.name.clone()),
                    leg_distance_m: edge.map(|edge| edge.distance),
                }
            })
            .collect();

        Ok(Self {
            planner: result.planner,
            cost_function: result.cost_function,
            hops: result.hop_count(),
            start,
            goal,
            distance_km: meters_to_km(result.total_distance_m),
            distance_miles: meters_to_miles(result.total_distance_m),
            time_minutes: result.total_time_s / 60.0,
            nodes_explored: result.nodes_explored,
            steps,
        })
    }

    /// Plain-text rendering, one line per step.
    pub fn render(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(
            buffer,
            "Route: {} -> {} ({} hops, planner: {}, cost: {})",
            self.start, self.goal, self.hops, self.planner, self.cost_function
        );
        let _ = writeln!(
            buffer,
            "Total: {:.2} km ({:.2} miles), {:.1} minutes",
            self.distance_km, self.distance_miles, self.time_minutes
        );
        for step in &self.steps {
            match step.coordinates {
                Some(coords) => {
                    let _ = writeln!(
                        buffer,
                        "{:>4}: {} ({:.6}, {:.6}) via {}",
                        step.index,
                        step.id,
                        coords.latitude,
                        coords.longitude,
                        step.display_road()
                    );
                }
                None => {
                    let _ = writeln!(buffer, "{:>4}: {}", step.index, step.id);
                }
            }
        }
        buffer
    }
}

/// File name used by [`export_route_csv`].
pub fn route_file_name(cost_function: CostFunction, start: &Coordinates, end: &Coordinates) -> String {
    format!(
        "route_{}_{:.6}_{:.6}_to_{:.6}_{:.6}.csv",
        cost_function, start.latitude, start.longitude, end.latitude, end.longitude
    )
}

/// Write the route as CSV into `dir`, returning the file path.
///
/// The file begins with `# key: value` metadata lines followed by a
/// `node_id,latitude,longitude` table. Nodes missing from the graph are
/// skipped.
pub fn export_route_csv(
    dir: &Path,
    graph: &Graph,
    result: &PlannerResult,
    start: &Coordinates,
    end: &Coordinates,
) -> Result<PathBuf> {
    if result.path.len() < 2 {
        return Err(Error::EmptyRoute);
    }

    fs::create_dir_all(dir)?;
    let path = dir.join(route_file_name(result.cost_function, start, end));
    let mut file = BufWriter::new(File::create(&path)?);

    writeln!(file, "# cost_function: {}", result.cost_function)?;
    writeln!(
        file,
        "# total_distance_km: {}",
        meters_to_km(result.total_distance_m)
    )?;
    writeln!(file, "# total_time_minutes: {}", result.total_time_s / 60.0)?;
    writeln!(file, "# path_nodes: {}", result.path.len())?;

    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(["node_id", "latitude", "longitude"])?;
    for node in result.path.iter().filter_map(|&id| graph.node(id)) {
        writer.write_record([
            node.id.to_string(),
            format!("{:.6}", node.latitude),
            format!("{:.6}", node.longitude),
        ])?;
    }
    writer.flush()?;

    info!(path = %path.display(), nodes = result.path.len(), "exported route");
    Ok(path)
}
