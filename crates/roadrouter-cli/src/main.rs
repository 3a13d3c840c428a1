use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use roadrouter_cli::commands::highways::handle_highways_command;
use roadrouter_cli::commands::route::{handle_route_command, RouteCommandArgs};
use roadrouter_cli::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(author, version, about = "Road network route planner")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "roadrouter.toml")]
    config: PathBuf,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Plan a route between two coordinates, once per cost function.
    Route(RouteCommandArgs),
    /// Summarise highway types and speed limits in the edges file.
    Highways,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match &cli.command {
        Command::Route(args) => handle_route_command(&cli.config, cli.format, args),
        Command::Highways => handle_highways_command(&cli.config, cli.format),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
