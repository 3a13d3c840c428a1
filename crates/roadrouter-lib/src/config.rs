//! TOML configuration for the planner and the network loader.
//!
//! The file is parsed into raw serde structures and then validated into a
//! [`Config`] holding only typed values: planner kind, cost functions, speed
//! table, traffic overrides, and resolved data paths. Nothing downstream reads
//! the TOML document again.
//!
//! ```toml
//! [data]
//! nodes_file = "nodes.json"
//! edges_file = "edges.json"
//!
//! [defaults.start]
//! lat = 37.7749
//! lon = -122.4194
//!
//! [planner]
//! type = "astar"
//! cost_functions = ["distance", "time"]
//! default_speed_mph = 25.0
//!
//! [highway_speeds]
//! residential = 25.0
//!
//! [traffic]
//! "101-102" = { speed_mph = 10.0 }
//! ```

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info};

use crate::cost::{CostFunction, CostModel, HighwaySpeeds, DEFAULT_SPEED_MPH};
use crate::error::{Error, Result};
use crate::geometry::Coordinates;
use crate::network::NetworkFilter;
use crate::routing::PlannerKind;
use crate::traffic::{EdgeKey, TrafficOverride, TrafficOverrides};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    data: RawData,
    #[serde(default)]
    defaults: RawDefaults,
    #[serde(default)]
    planner: RawPlanner,
    #[serde(default)]
    network: RawNetwork,
    #[serde(default)]
    highway_speeds: BTreeMap<String, f64>,
    #[serde(default)]
    traffic: BTreeMap<String, RawTraffic>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawData {
    nodes_file: PathBuf,
    edges_file: PathBuf,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDefaults {
    start: Option<Coordinates>,
    end: Option<Coordinates>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawPlanner {
    #[serde(rename = "type", default = "default_planner_type")]
    kind: String,
    #[serde(default)]
    cost_functions: OneOrMany,
    #[serde(default = "default_speed")]
    default_speed_mph: f64,
}

impl Default for RawPlanner {
    fn default() -> Self {
        Self {
            kind: default_planner_type(),
            cost_functions: OneOrMany::default(),
            default_speed_mph: default_speed(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl Default for OneOrMany {
    fn default() -> Self {
        OneOrMany::One(CostFunction::Distance.label().to_string())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawNetwork {
    allowed_highways: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTraffic {
    speed_mph: Option<f64>,
    multiplier: Option<f64>,
}

fn default_planner_type() -> String {
    PlannerKind::default().to_string()
}

fn default_speed() -> f64 {
    DEFAULT_SPEED_MPH
}

/// Validated configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Nodes file, resolved against the configuration file's directory.
    pub nodes_file: PathBuf,
    /// Edges file, resolved against the configuration file's directory.
    pub edges_file: PathBuf,
    pub default_start: Option<Coordinates>,
    pub default_end: Option<Coordinates>,
    pub planner: PlannerKind,
    /// Cost functions to plan with, in configured order, without duplicates.
    pub cost_functions: Vec<CostFunction>,
    pub default_speed_mph: f64,
    pub network: NetworkFilter,
    pub highway_speeds: Arc<HighwaySpeeds>,
    pub traffic: TrafficOverrides,
}

impl Config {
    /// Read and validate a configuration file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let base_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let config = Self::parse(&text, base_dir)?;
        info!(
            path = %path.display(),
            planner = %config.planner,
            cost_functions = config.cost_functions.len(),
            highway_speeds = config.highway_speeds.len(),
            traffic_overrides = config.traffic.len(),
            "loaded configuration"
        );
        Ok(config)
    }

    /// Parse configuration text, resolving relative data paths against `base_dir`.
    pub fn parse(text: &str, base_dir: &Path) -> Result<Self> {
        let raw: RawConfig = toml::from_str(text)?;
        Self::from_raw(raw, base_dir)
    }

    fn from_raw(raw: RawConfig, base_dir: &Path) -> Result<Self> {
        let planner = raw.planner.kind.parse::<PlannerKind>()?;
        let cost_functions = parse_cost_functions(raw.planner.cost_functions)?;

        let default_speed_mph = raw.planner.default_speed_mph;
        if !(default_speed_mph.is_finite() && default_speed_mph > 0.0) {
            return Err(invalid(format!(
                "planner.default_speed_mph must be positive, got {default_speed_mph}"
            )));
        }

        for (highway, speed) in &raw.highway_speeds {
            if !(speed.is_finite() && *speed > 0.0) {
                return Err(invalid(format!(
                    "highway_speeds.{highway} must be positive, got {speed}"
                )));
            }
        }

        let traffic = raw
            .traffic
            .iter()
            .map(|(key, entry)| Ok((key.parse::<EdgeKey>()?, traffic_entry(key, entry)?)))
            .collect::<Result<TrafficOverrides>>()?;

        let network = NetworkFilter {
            allowed_highways: raw
                .network
                .allowed_highways
                .map(|list| list.into_iter().collect::<HashSet<_>>()),
        };

        debug!(base_dir = %base_dir.display(), "resolving data paths");
        Ok(Self {
            nodes_file: base_dir.join(raw.data.nodes_file),
            edges_file: base_dir.join(raw.data.edges_file),
            default_start: raw.defaults.start,
            default_end: raw.defaults.end,
            planner,
            cost_functions,
            default_speed_mph,
            network,
            highway_speeds: Arc::new(raw.highway_speeds.into_iter().collect()),
            traffic,
        })
    }

    /// Cost model for `cost_function` using the configured speeds.
    pub fn cost_model(&self, cost_function: CostFunction) -> CostModel {
        CostModel::new(cost_function, self.default_speed_mph)
            .with_speed_lookup(self.highway_speeds.clone())
    }
}

fn parse_cost_functions(raw: OneOrMany) -> Result<Vec<CostFunction>> {
    let names = match raw {
        OneOrMany::One(name) => vec![name],
        OneOrMany::Many(names) => names,
    };
    let mut parsed = Vec::with_capacity(names.len());
    for name in names {
        let cost_function = name.parse::<CostFunction>()?;
        if !parsed.contains(&cost_function) {
            parsed.push(cost_function);
        }
    }
    if parsed.is_empty() {
        return Err(invalid("planner.cost_functions must not be empty"));
    }
    Ok(parsed)
}

fn traffic_entry(key: &str, entry: &RawTraffic) -> Result<TrafficOverride> {
    let positive = |value: f64| value.is_finite() && value > 0.0;
    match (entry.speed_mph, entry.multiplier) {
        (Some(speed), None) if positive(speed) => Ok(TrafficOverride::Absolute(speed)),
        (None, Some(factor)) if positive(factor) => Ok(TrafficOverride::Multiplier(factor)),
        (Some(_), Some(_)) => Err(invalid(format!(
            "traffic.\"{key}\" sets both speed_mph and multiplier"
        ))),
        (None, None) => Err(invalid(format!(
            "traffic.\"{key}\" needs speed_mph or multiplier"
        ))),
        _ => Err(invalid(format!("traffic.\"{key}\" must be positive"))),
    }
}

fn invalid(message: impl Into<String>) -> Error {
    Error::InvalidConfig {
        message: message.into(),
    }
}
