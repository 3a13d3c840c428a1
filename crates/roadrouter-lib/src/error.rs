use std::path::PathBuf;

use thiserror::Error;

use crate::graph::NodeId;

/// Convenient result alias for the roadrouter library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
///
/// Search-time failures are not represented here: a planner always returns a
/// [`PlannerResult`](crate::PlannerResult) and reports problems through
/// [`PlanFailure`](crate::PlanFailure). This enum covers loading,
/// configuration, and export.
#[derive(Debug, Error)]
pub enum Error {
    /// A network data file could not be located.
    #[error("network file not found at {path}")]
    NetworkFileNotFound { path: PathBuf },

    /// A node key in the nodes file was not an integer.
    #[error("invalid node id {raw:?} in nodes file")]
    InvalidNodeId { raw: String },

    /// An edge in the edges file has a negative or non-finite length.
    #[error("edge {from}->{to} has invalid length {distance}; expected a finite value >= 0")]
    InvalidEdgeLength { from: NodeId, to: NodeId, distance: f64 },

    /// The configuration file was read but its contents are unusable.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// A traffic override key did not have the `source-target` shape.
    #[error("invalid traffic override key {key:?}; expected \"<source>-<target>\"")]
    InvalidTrafficKey { key: String },

    /// Raised when a planner name could not be matched.
    #[error("unknown planner type: {name}{}", format_suggestions(.suggestions))]
    UnknownPlanner {
        name: String,
        suggestions: Vec<String>,
    },

    /// Raised when a cost function name could not be matched.
    #[error("unknown cost function: {name}{}", format_suggestions(.suggestions))]
    UnknownCostFunction {
        name: String,
        suggestions: Vec<String>,
    },

    /// Raised when exporting a route that has fewer than two nodes.
    #[error("route has too few nodes to export")]
    EmptyRoute,

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for JSON parsing errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Wrapper for TOML parsing errors.
    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    /// Wrapper for CSV writer errors.
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

/// Rank `candidates` by similarity to `input`, keeping the close ones.
pub(crate) fn suggest(input: &str, candidates: &[&str]) -> Vec<String> {
    let needle = input.to_ascii_lowercase();
    let mut scored: Vec<(f64, &str)> = candidates
        .iter()
        .map(|candidate| (strsim::jaro_winkler(&needle, candidate), *candidate))
        .filter(|(score, _)| *score >= 0.7)
        .collect();
    scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
    scored
        .into_iter()
        .take(3)
        .map(|(_, name)| name.to_string())
        .collect()
}
