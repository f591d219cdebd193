use std::sync::Arc;

use clap::Parser;
use tokio::signal;
use tracing::{error, info};

use valuations::adapter::InMemoryQueue;
use valuations::app::App;
use valuations::config::Config;

#[derive(Parser)]
#[command(name = "valuations", about = "VIN valuation ingestion pipeline")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "config.toml")]
    config: String,
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let config = match Config::load(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            std::process::exit(1);
        }
    };

    config.init_logging();
    info!("valuations starting");

    let queue = Arc::new(InMemoryQueue::new());

    tokio::select! {
        result = App::run(config, queue) => {
            if let Err(e) = result {
                error!(error = %e, "Fatal error");
                std::process::exit(1);
            }
        }
        _ = signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    info!("valuations stopped");
}
