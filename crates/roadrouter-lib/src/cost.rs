//! Edge cost and heuristic evaluation for the planners.
//!
//! Two cost functions exist. [`CostFunction::Distance`] measures kilometres and
//! uses the great-circle distance as its heuristic. [`CostFunction::Time`]
//! measures seconds, resolving a speed for every edge:
//!
//! 1. the edge's posted limit, read as km/h when above
//!    [`KMH_INFERENCE_THRESHOLD`] and as mph otherwise;
//! 2. the highway-type speed table, falling back to the default speed for
//!    unlisted types;
//! 3. the default speed.
//!
//! A traffic override attached to the edge then adjusts that speed.
//!
//! The km/h inference is a magnitude heuristic kept for compatibility with
//! existing data: a genuine mph limit above 80 is misread as km/h.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{suggest, Error, Result};
use crate::geometry::{meters_to_km, meters_to_miles, KMH_TO_MPH};
use crate::graph::{Edge, Graph, NodeId};

/// Posted limits strictly above this value are treated as km/h.
pub const KMH_INFERENCE_THRESHOLD: f64 = 80.0;

/// Speed assumed when nothing else is known, in mph.
pub const DEFAULT_SPEED_MPH: f64 = 25.0;

/// Lower bound on the speed used by the time heuristic, in mph.
pub const HEURISTIC_MIN_SPEED_MPH: f64 = 55.0;

const SECONDS_PER_HOUR: f64 = 3_600.0;

/// Unit the planner optimises for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostFunction {
    #[default]
    Distance,
    Time,
}

impl CostFunction {
    pub const ALL: [CostFunction; 2] = [CostFunction::Distance, CostFunction::Time];

    pub fn label(self) -> &'static str {
        match self {
            CostFunction::Distance => "distance",
            CostFunction::Time => "time",
        }
    }
}

impl fmt::Display for CostFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CostFunction {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "distance" => Ok(CostFunction::Distance),
            "time" => Ok(CostFunction::Time),
            _ => Err(Error::UnknownCostFunction {
                name: raw.to_string(),
                suggestions: suggest(raw, &["distance", "time"]),
            }),
        }
    }
}

/// Highway-type to speed (mph) lookup.
pub trait SpeedLookup: Send + Sync {
    fn speed_mph(&self, highway_type: &str) -> Option<f64>;
}

impl SpeedLookup for HashMap<String, f64> {
    fn speed_mph(&self, highway_type: &str) -> Option<f64> {
        self.get(highway_type).copied()
    }
}

/// Speed table built from configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighwaySpeeds(HashMap<String, f64>);

impl HighwaySpeeds {
    pub fn new(speeds: HashMap<String, f64>) -> Self {
        Self(speeds)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl SpeedLookup for HighwaySpeeds {
    fn speed_mph(&self, highway_type: &str) -> Option<f64> {
        self.0.get(highway_type).copied()
    }
}

impl FromIterator<(String, f64)> for HighwaySpeeds {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Resolved cost parameters for one planning run.
#[derive(Clone)]
pub struct CostModel {
    cost_function: CostFunction,
    default_speed_mph: f64,
    speeds: Option<Arc<dyn SpeedLookup>>,
}

impl fmt::Debug for CostModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CostModel")
            .field("cost_function", &self.cost_function)
            .field("default_speed_mph", &self.default_speed_mph)
            .field("has_speed_table", &self.speeds.is_some())
            .finish()
    }
}

impl Default for CostModel {
    fn default() -> Self {
        Self::new(CostFunction::Distance, DEFAULT_SPEED_MPH)
    }
}

impl CostModel {
    /// Create a model; a non-positive default speed falls back to [`DEFAULT_SPEED_MPH`].
    pub fn new(cost_function: CostFunction, default_speed_mph: f64) -> Self {
        let default_speed_mph = if default_speed_mph.is_finite() && default_speed_mph > 0.0 {
            default_speed_mph
        } else {
            warn!(
                default_speed_mph,
                fallback = DEFAULT_SPEED_MPH,
                "ignoring non-positive default speed"
            );
            DEFAULT_SPEED_MPH
        };
        Self {
            cost_function,
            default_speed_mph,
            speeds: None,
        }
    }

    pub fn distance() -> Self {
        Self::new(CostFunction::Distance, DEFAULT_SPEED_MPH)
    }

    pub fn time(default_speed_mph: f64) -> Self {
        Self::new(CostFunction::Time, default_speed_mph)
    }

    /// Attach a highway-type speed table.
    pub fn with_speed_lookup(mut self, speeds: Arc<dyn SpeedLookup>) -> Self {
        self.speeds = Some(speeds);
        self
    }

    pub fn cost_function(&self) -> CostFunction {
        self.cost_function
    }

    pub fn default_speed_mph(&self) -> f64 {
        self.default_speed_mph
    }

    /// Cost of traversing `edge` in the active unit (km or seconds).
    pub fn edge_cost(&self, edge: &Edge) -> f64 {
        match self.cost_function {
            CostFunction::Distance => meters_to_km(edge.distance),
            CostFunction::Time => self.edge_time_s(edge),
        }
    }

    /// Travel time over `edge` in seconds, independent of the active cost function.
    pub fn edge_time_s(&self, edge: &Edge) -> f64 {
        meters_to_miles(edge.distance) / self.effective_speed_mph(edge) * SECONDS_PER_HOUR
    }

    /// Speed used for `edge` after unit inference, table lookup, and traffic.
    pub fn effective_speed_mph(&self, edge: &Edge) -> f64 {
        let base = self.base_speed_mph(edge);
        match edge.traffic {
            Some(adjustment) => adjustment.apply(base),
            None => base,
        }
    }

    fn base_speed_mph(&self, edge: &Edge) -> f64 {
        if let Some(limit) = edge.max_speed.filter(|s| s.is_finite() && *s > 0.0) {
            return if limit > KMH_INFERENCE_THRESHOLD {
                limit * KMH_TO_MPH
            } else {
                limit
            };
        }

        if let (Some(highway), Some(speeds)) = (edge.highway_type.as_deref(), &self.speeds) {
            return speeds
                .speed_mph(highway)
                .filter(|s| s.is_finite() && *s > 0.0)
                .unwrap_or(self.default_speed_mph);
        }

        self.default_speed_mph
    }

    /// Lower bound on the remaining cost from `from` to `to`.
    ///
    /// Returns 0 when either node is unknown so the search stays well defined.
    pub fn heuristic(&self, graph: &Graph, from: NodeId, to: NodeId) -> f64 {
        let Some(meters) = graph.straight_line_distance(from, to) else {
            return 0.0;
        };
        match self.cost_function {
            CostFunction::Distance => meters_to_km(meters),
            CostFunction::Time => {
                let optimistic = self.default_speed_mph.max(HEURISTIC_MIN_SPEED_MPH);
                meters_to_miles(meters) / optimistic * SECONDS_PER_HOUR
            }
        }
    }
}
