mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod output;
mod utils;

use crate::cli::{Cli, Commands};
use crate::error::{CliError, Result};
use clap::Parser;
use tracing::{debug, error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run_app().await {
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.clone())?;

    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default().into_hooks();
    eyre_hook.install().map_err(|e| CliError::Other(e.into()))?;
    std::panic::set_hook(Box::new(move |pi| {
        error!("{}", panic_hook.panic_report(pi));
    }));

    let command_result = async {
        info!("🚀 PepFold CLI v{} starting up.", env!("CARGO_PKG_VERSION"));
        debug!("Full CLI arguments parsed: {:?}", &cli);

        if let Some(num_threads) = cli.threads {
            info!(
                "Setting Rayon global thread pool to {} threads.",
                num_threads
            );
            rayon::ThreadPoolBuilder::new()
                .num_threads(num_threads)
                .build_global()
                .map_err(|e| {
                    CliError::Other(anyhow::anyhow!("Failed to build global thread pool: {}", e))
                })?;
        }

        match cli.command {
            Commands::Build(args) => {
                info!("Dispatching to 'build' command.");
                commands::build::run(args).await
            }
            Commands::Fold(args) => {
                info!("Dispatching to 'fold' command.");
                commands::fold::run(args).await
            }
        }
    }
    .await;

    match &command_result {
        Ok(_) => {
            info!("✅ Command completed successfully.");
            println!("✅ Command completed successfully.");
        }
        Err(e) => {
            error!("❌ Command failed: {}", e);
            eprintln!("❌ Command failed: {}", e);
        }
    }

    command_result
}
