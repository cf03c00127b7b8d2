//! Rental CLI - command-line front end for the car rental API

mod cli;
mod logging;
mod output;

use clap::Parser;
use rental_client::ClientError;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _env = dotenvy::dotenv();
    let _log_guard = logging::init()?;

    let cli = cli::Cli::parse();
    tokio::select! {
        result = cli.run() => {
            if let Err(e) = &result {
                let category = e
                    .downcast_ref::<ClientError>()
                    .map(|c| c.code().category().name())
                    .unwrap_or("general");
                tracing::debug!(category, error = %e, "Command failed");
            }
            result
        }
        _ = tokio::signal::ctrl_c() => {
            // Dropping the running command cancels its in-flight requests
            tracing::warn!("Interrupted");
            Ok(())
        }
    }
}
