use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "ocdtracker")]
#[command(about = "REST backend for tracking OCD rumination logs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Listen port (defaults to SERVER_PORT, then 8080)
        #[arg(short, long)]
        port: Option<u16>,
        /// Listen address (defaults to SERVER_HOST, then 0.0.0.0)
        #[arg(short = 'H', long)]
        host: Option<String>,
    },
    /// Create or update the database schema and exit
    Migrate,
    /// Print row counts per entity as JSON
    Stats {
        /// Restrict to one entity (account, ocdlog)
        #[arg(short, long)]
        entity: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, host } => commands::serve::run(port, host).await?,
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Stats { entity } => commands::stats::run(entity.as_deref()).await?,
    }

    Ok(())
}
