//! gatewayctl
//!
//! Registers plugin services as routes on an API gateway and keeps a catalog
//! of them.

// Use mimalloc as the global allocator for better performance
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "gatewayctl",
    author,
    version,
    about = "Plugin registration service for an API gateway",
    long_about = "gatewayctl exposes an HTTP API that publishes plugin services as gateway routes\n\
                  and records them in a catalog.",
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the registration API
    Serve(commands::serve::ServeArgs),

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => commands::serve::run(args).await,
        Commands::Version => {
            commands::version::run();
            Ok(())
        }
    }
}
