mod catalog;
mod resolve;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::resolve::ResolveArgs;

#[derive(Debug, Parser)]
#[command(name = "mfrscout")]
#[command(about = "Resolve electronic-component part numbers to their manufacturer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve manufacturer name, address and city/country for part numbers
    Resolve(ResolveArgs),
    /// List the manufacturer catalog used by the evidence strategy
    Catalog {
        /// Catalog file (defaults to `MFRSCOUT_CATALOG_PATH`)
        #[arg(long)]
        catalog: Option<std::path::PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = mfrscout_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Resolve(args) => resolve::run_resolve(&config, &args).await,
        Commands::Catalog { catalog } => catalog::run_catalog(&config, catalog.as_deref()),
    }
}
