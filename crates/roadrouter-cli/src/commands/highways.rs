//! Highway command handler: composition of the configured edge file.

use std::path::Path;

use anyhow::{Context, Result};

use roadrouter_lib::{load_network, Config, NetworkFilter, NetworkSummary};

use crate::output::OutputFormat;

/// Print highway-type and speed-limit counts for every edge, ignoring the
/// configured highway filter.
pub fn handle_highways_command(config_path: &Path, format: OutputFormat) -> Result<()> {
    let config = Config::from_path(config_path)
        .with_context(|| format!("failed to load configuration from {}", config_path.display()))?;
    let network = load_network(
        &config.nodes_file,
        &config.edges_file,
        &NetworkFilter::allow_all(),
    )
    .with_context(|| format!("failed to load edges from {}", config.edges_file.display()))?;

    let summary = NetworkSummary::from_edges(&network.edges);
    print!("{}", format.render_network_summary(&summary)?);
    Ok(())
}
