//! Per-edge traffic adjustments.
//!
//! Overrides are keyed by `"<source>-<target>"` and resolved once, when the
//! network is ingested: [`apply_traffic_overrides`] attaches the matching
//! override to each edge, and the cost model only ever reads the edge.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::graph::{Edge, NodeId};

/// Lowest effective speed an override can produce, in mph.
pub const MIN_SPEED_MPH: f64 = 1.0;

/// Adjustment applied to an edge's resolved speed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrafficOverride {
    /// Replace the resolved speed with this value (mph).
    Absolute(f64),
    /// Multiply the resolved speed.
    Multiplier(f64),
}

impl TrafficOverride {
    /// Apply the override to `speed_mph`, never going below [`MIN_SPEED_MPH`].
    pub fn apply(&self, speed_mph: f64) -> f64 {
        let adjusted = match *self {
            TrafficOverride::Absolute(speed) => speed,
            TrafficOverride::Multiplier(factor) => speed_mph * factor,
        };
        if adjusted.is_finite() {
            adjusted.max(MIN_SPEED_MPH)
        } else {
            MIN_SPEED_MPH
        }
    }
}

/// Directed `source-target` pair identifying an edge in override tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeKey {
    pub source: NodeId,
    pub target: NodeId,
}

impl EdgeKey {
    pub fn new(source: NodeId, target: NodeId) -> Self {
        Self { source, target }
    }

    pub fn of(edge: &Edge) -> Self {
        Self::new(edge.source, edge.target)
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.source, self.target)
    }
}

impl FromStr for EdgeKey {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self> {
        let invalid = || Error::InvalidTrafficKey {
            key: raw.to_string(),
        };
        let trimmed = raw.trim();
        // Skip the first character so a leading sign on the source id is not
        // mistaken for the separator.
        let split_at = trimmed
            .char_indices()
            .skip(1)
            .find(|&(_, c)| c == '-')
            .map(|(idx, _)| idx)
            .ok_or_else(invalid)?;
        let source = trimmed[..split_at].trim().parse().map_err(|_| invalid())?;
        let target = trimmed[split_at + 1..]
            .trim()
            .parse()
            .map_err(|_| invalid())?;
        Ok(Self { source, target })
    }
}

/// Override table keyed by directed edge.
#[derive(Debug, Clone, Default)]
pub struct TrafficOverrides {
    entries: HashMap<EdgeKey, TrafficOverride>,
}

impl TrafficOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: EdgeKey, value: TrafficOverride) {
        self.entries.insert(key, value);
    }

    pub fn get(&self, key: &EdgeKey) -> Option<TrafficOverride> {
        self.entries.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(EdgeKey, TrafficOverride)> for TrafficOverrides {
    fn from_iter<I: IntoIterator<Item = (EdgeKey, TrafficOverride)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Attach matching overrides to `edges`, returning how many edges were touched.
///
/// Keys are matched against the edge's stored direction only.
pub fn apply_traffic_overrides(edges: &mut [Edge], overrides: &TrafficOverrides) -> usize {
    if overrides.is_empty() {
        return 0;
    }
    let mut applied = 0;
    for edge in edges.iter_mut() {
        if let Some(value) = overrides.get(&EdgeKey::of(edge)) {
            edge.traffic = Some(value);
            applied += 1;
        }
    }
    debug!(
        applied,
        configured = overrides.len(),
        "attached traffic overrides"
    );
    applied
}
