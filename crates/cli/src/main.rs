use clap::{Parser, Subcommand};
use kabysdoh_domain::CliOverrides;
use kabysdoh_infrastructure::dataset::load_dataset;
use std::net::IpAddr;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

mod bootstrap;
mod commands;

#[derive(Parser)]
#[command(name = "kabysdoh")]
#[command(version)]
#[command(about = "Kabysdoh - DNS answer filter with CDN-aware substitution")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Dataset file path
    #[arg(long, value_name = "FILE")]
    dataset: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print dataset counts and matcher layout
    Inspect,

    /// Check addresses against the blocklist and CDN ranges
    Classify {
        #[arg(required = true)]
        addrs: Vec<IpAddr>,
    },

    /// Run a synthetic answer through the filter, without a resolver
    DryRun {
        qname: String,

        #[arg(required = true)]
        addrs: Vec<IpAddr>,

        /// TTL of the synthetic records
        #[arg(long, default_value_t = 300)]
        ttl: u32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cli_overrides = CliOverrides {
        dataset_path: cli.dataset.clone(),
        log_level: cli.log_level.clone(),
    };

    let config = bootstrap::load_config(cli.config.as_deref(), cli_overrides)?;

    bootstrap::init_logging(&config);

    info!("Starting Kabysdoh v{}", env!("CARGO_PKG_VERSION"));

    let dataset = Arc::new(load_dataset(Path::new(&config.dataset.path)).await?);

    match cli.command {
        Command::Inspect => commands::inspect::run(&dataset),
        Command::Classify { addrs } => commands::classify::run(&dataset, &addrs),
        Command::DryRun { qname, addrs, ttl } => {
            commands::dry_run::run(&config, dataset, &qname, &addrs, ttl)
        }
    }
}
