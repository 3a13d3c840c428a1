//! Route command handler for planning between two coordinates.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{anyhow, bail, Context, Result};
use clap::Args;
use tracing::{debug, info, warn};

use roadrouter_lib::{
    apply_traffic_overrides, create_planner, export_route_csv, load_network, Config, Coordinates,
    CostFunction, Graph, PlannerKind, RouteSummary,
};

use crate::output::{OutputFormat, RouteReport};

/// Arguments for the route command.
#[derive(Args, Debug, Clone)]
pub struct RouteCommandArgs {
    /// Start latitude; defaults to `[defaults.start]` in the configuration.
    #[arg(long, requires = "start_lon", allow_negative_numbers = true)]
    pub start_lat: Option<f64>,
    /// Start longitude.
    #[arg(long, requires = "start_lat", allow_negative_numbers = true)]
    pub start_lon: Option<f64>,
    /// End latitude; defaults to `[defaults.end]` in the configuration.
    #[arg(long, requires = "end_lon", allow_negative_numbers = true)]
    pub end_lat: Option<f64>,
    /// End longitude.
    #[arg(long, requires = "end_lat", allow_negative_numbers = true)]
    pub end_lon: Option<f64>,
    /// Cost function to plan with; repeat or separate with commas.
    #[arg(long = "cost-function", value_name = "NAME", value_delimiter = ',')]
    pub cost_functions: Vec<CostFunction>,
    /// Planner to use instead of the configured one (astar or dijkstra).
    #[arg(long)]
    pub planner: Option<PlannerKind>,
    /// Fallback speed in mph for edges without a known speed.
    #[arg(long, value_name = "MPH")]
    pub default_speed: Option<f64>,
    /// Directory for exported CSV routes.
    #[arg(long, default_value = "results")]
    pub output_dir: PathBuf,
    /// Skip writing CSV files.
    #[arg(long)]
    pub no_export: bool,
}

impl RouteCommandArgs {
    fn start(&self, config: &Config) -> Result<Coordinates> {
        match (self.start_lat, self.start_lon) {
            (Some(lat), Some(lon)) => Ok(Coordinates::new(lat, lon)),
            _ => config.default_start.ok_or_else(|| {
                anyhow!("no start coordinate: pass --start-lat/--start-lon or set [defaults.start]")
            }),
        }
    }

    fn end(&self, config: &Config) -> Result<Coordinates> {
        match (self.end_lat, self.end_lon) {
            (Some(lat), Some(lon)) => Ok(Coordinates::new(lat, lon)),
            _ => config.default_end.ok_or_else(|| {
                anyhow!("no end coordinate: pass --end-lat/--end-lon or set [defaults.end]")
            }),
        }
    }
}

/// Handle the route subcommand.
///
/// Plans once per cost function, prints every report, and fails if any plan
/// did not find a route.
pub fn handle_route_command(
    config_path: &Path,
    format: OutputFormat,
    args: &RouteCommandArgs,
) -> Result<()> {
    let mut config = Config::from_path(config_path)
        .with_context(|| format!("failed to load configuration from {}", config_path.display()))?;

    if let Some(speed) = args.default_speed {
        if !(speed.is_finite() && speed > 0.0) {
            bail!("--default-speed must be positive, got {speed}");
        }
        config.default_speed_mph = speed;
    }
    let kind = args.planner.unwrap_or(config.planner);
    let mut cost_functions = config.cost_functions.clone();
    if !args.cost_functions.is_empty() {
        cost_functions.clear();
        for cost_function in &args.cost_functions {
            if !cost_functions.contains(cost_function) {
                cost_functions.push(*cost_function);
            }
        }
    }
    let start = args.start(&config)?;
    let end = args.end(&config)?;

    let graph = load_graph(&config)?;
    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        planner = %kind,
        "planning route"
    );

    let mut reports = Vec::with_capacity(cost_functions.len());
    for cost_function in cost_functions {
        let planner = create_planner(kind, config.cost_model(cost_function));
        let started = Instant::now();
        let result = planner.plan(&graph, &start, &end);
        let planning_time_ms = started.elapsed().as_secs_f64() * 1_000.0;
        debug!(
            %cost_function,
            success = result.success,
            nodes_explored = result.nodes_explored,
            planning_time_ms,
            "plan finished"
        );

        let summary = RouteSummary::from_result(&graph, &result).ok();
        let export_path = if args.no_export || result.path.len() < 2 {
            None
        } else {
            let path = export_route_csv(&args.output_dir, &graph, &result, &start, &end)
                .with_context(|| {
                    format!("failed to export route to {}", args.output_dir.display())
                })?;
            Some(path)
        };

        reports.push(RouteReport {
            result,
            total_nodes: graph.node_count(),
            planning_time_ms,
            summary,
            export_path,
        });
    }

    print!("{}", format.render_reports(&reports)?);

    let failed: Vec<_> = reports
        .iter()
        .filter(|report| !report.result.success)
        .map(|report| report.result.cost_function_label())
        .collect();
    if !failed.is_empty() {
        bail!("no route found for cost function(s): {}", failed.join(", "));
    }
    Ok(())
}

/// Load the configured network with traffic overrides attached.
pub fn load_graph(config: &Config) -> Result<Graph> {
    let mut network = load_network(&config.nodes_file, &config.edges_file, &config.network)
        .with_context(|| {
            format!(
                "failed to load road network from {} and {}",
                config.nodes_file.display(),
                config.edges_file.display()
            )
        })?;

    let applied = apply_traffic_overrides(&mut network.edges, &config.traffic);
    if applied < config.traffic.len() {
        warn!(
            applied,
            configured = config.traffic.len(),
            "some traffic overrides matched no edge"
        );
    }
    Ok(network.into_graph())
}
