//! Output formatting for planning reports and network summaries.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

use roadrouter_lib::geometry::{meters_to_km, meters_to_miles};
use roadrouter_lib::{NetworkSummary, PlannerResult, RouteSummary};

use crate::terminal::{format_with_separators, ColorPalette};

/// How command results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable statistics.
    #[default]
    Text,
    /// A single JSON document on stdout.
    Json,
}

/// One planning run as shown to the user.
#[derive(Debug, Clone, Serialize)]
pub struct RouteReport {
    #[serde(flatten)]
    pub result: PlannerResult,
    /// Nodes in the loaded graph.
    pub total_nodes: usize,
    pub planning_time_ms: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<RouteSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_path: Option<PathBuf>,
}

impl OutputFormat {
    /// Render planning reports, one per cost function.
    pub fn render_reports(self, reports: &[RouteReport]) -> Result<String> {
        match self {
            OutputFormat::Text => {
                let palette = ColorPalette::detect();
                Ok(reports
                    .iter()
                    .map(|report| render_report_text(report, &palette))
                    .collect())
            }
            OutputFormat::Json => Ok(serde_json::to_string_pretty(reports)? + "\n"),
        }
    }

    /// Render the highway and speed-limit composition of a network.
    pub fn render_network_summary(self, summary: &NetworkSummary) -> Result<String> {
        match self {
            OutputFormat::Text => Ok(render_network_summary_text(summary)),
            OutputFormat::Json => Ok(serde_json::to_string_pretty(summary)? + "\n"),
        }
    }
}

/// Plain statistics block for one report.
pub fn render_report_text(report: &RouteReport, palette: &ColorPalette) -> String {
    let result = &report.result;
    let rule = "=".repeat(50);
    let mut buffer = String::new();

    let _ = writeln!(buffer, "{}{rule}{}", palette.gray, palette.reset);
    let _ = writeln!(
        buffer,
        "{}Planning with cost function: {}{}",
        palette.white_bold, result.cost_function, palette.reset
    );
    let _ = writeln!(buffer, "{}{rule}{}", palette.gray, palette.reset);
    let _ = writeln!(buffer, "Using planner: {}", result.planner);

    if !result.success {
        let reason = result
            .failure
            .map_or_else(|| "unknown failure".to_string(), |failure| failure.to_string());
        let _ = writeln!(
            buffer,
            "{}No route found: {reason}{}",
            palette.red, palette.reset
        );
        let _ = writeln!(
            buffer,
            "Nodes explored: {} / {}",
            format_with_separators(result.nodes_explored as u64),
            format_with_separators(report.total_nodes as u64)
        );
        return buffer;
    }

    let _ = writeln!(
        buffer,
        "{}Path found! ({:.2} ms){}",
        palette.green, report.planning_time_ms, palette.reset
    );
    let _ = writeln!(buffer);
    let _ = writeln!(buffer, "{}=== Planning Statistics ==={}", palette.cyan, palette.reset);
    let _ = writeln!(buffer, "Algorithm: {}", result.planner);
    let _ = writeln!(buffer, "Planning time: {:.2} ms", report.planning_time_ms);
    let _ = writeln!(
        buffer,
        "Nodes explored: {} / {}",
        format_with_separators(result.nodes_explored as u64),
        format_with_separators(report.total_nodes as u64)
    );
    let _ = writeln!(buffer, "Path length: {} nodes", result.path.len());
    let _ = writeln!(
        buffer,
        "Total distance: {:.2} km ({:.2} miles)",
        meters_to_km(result.total_distance_m),
        meters_to_miles(result.total_distance_m)
    );
    let _ = writeln!(
        buffer,
        "Total travel time: {:.1} minutes",
        result.total_time_s / 60.0
    );
    if report.planning_time_ms > 0.0 {
        let _ = writeln!(
            buffer,
            "Search speed: {:.2} nodes/ms",
            result.nodes_explored as f64 / report.planning_time_ms
        );
    }
    if let Some(path) = &report.export_path {
        let _ = writeln!(buffer, "Path saved to: {}", path.display());
    }
    buffer
}

fn render_network_summary_text(summary: &NetworkSummary) -> String {
    let share = |count: usize| {
        if summary.total_edges == 0 {
            0.0
        } else {
            count as f64 * 100.0 / summary.total_edges as f64
        }
    };

    let mut buffer = String::new();
    let _ = writeln!(buffer, "Total edges: {}", summary.total_edges);
    let _ = writeln!(
        buffer,
        "Edges with highway type: {} ({:.1}%)",
        summary.edges_with_highway,
        share(summary.edges_with_highway)
    );
    let _ = writeln!(
        buffer,
        "Edges with max speed: {} ({:.1}%)",
        summary.edges_with_max_speed,
        share(summary.edges_with_max_speed)
    );
    let _ = writeln!(buffer, "Edges with both: {}", summary.edges_with_both);
    let _ = writeln!(buffer, "Missing highway type: {}", summary.edges_missing_highway());
    let _ = writeln!(buffer, "Missing max speed: {}", summary.edges_missing_max_speed());

    let mut highways: Vec<_> = summary.highway_counts.iter().collect();
    highways.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    let _ = writeln!(buffer, "\nHighway types:");
    for (highway, count) in highways {
        let speeds = summary
            .speeds_by_highway
            .get(highway)
            .map(|speeds| speeds.iter().cloned().collect::<Vec<_>>().join(", "))
            .unwrap_or_default();
        if speeds.is_empty() {
            let _ = writeln!(buffer, "  {highway:<20} {count:>6}");
        } else {
            let _ = writeln!(buffer, "  {highway:<20} {count:>6}  speeds: {speeds}");
        }
    }

    let _ = writeln!(buffer, "\nSpeed limits:");
    for (speed, count) in &summary.speed_counts {
        let _ = writeln!(buffer, "  {speed:<20} {count:>6}");
    }
    buffer
}
