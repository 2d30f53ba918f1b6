use crate::error::{CliError, Result};
use std::fs::File;
use std::path::PathBuf;
use tracing_subscriber::{
    EnvFilter,
    filter::LevelFilter,
    fmt::{self},
    prelude::*,
};

fn level_filter(verbosity: u8, quiet: bool) -> LevelFilter {
    if quiet {
        LevelFilter::ERROR
    } else {
        match verbosity {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }
}

pub fn setup_logging(verbosity: u8, quiet: bool, log_file: Option<PathBuf>) -> Result<()> {
    // `PEPFOLD_LOG` refines the verbosity flags, e.g. `PEPFOLD_LOG=pepfold::engine=trace`.
    let filter = EnvFilter::builder()
        .with_default_directive(level_filter(verbosity, quiet).into())
        .with_env_var("PEPFOLD_LOG")
        .from_env_lossy();

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(false)
        .compact();

    let subscriber = tracing_subscriber::registry().with(filter).with(stderr_layer);

    if let Some(path) = log_file {
        let file = File::create(&path).map_err(CliError::Io)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_thread_ids(true)
            .with_target(true);

        subscriber
            .with(file_layer)
            .try_init()
            .map_err(|e| CliError::Other(anyhow::anyhow!("Failed to install logger: {}", e)))?;
    } else {
        subscriber
            .try_init()
            .map_err(|e| CliError::Other(anyhow::anyhow!("Failed to install logger: {}", e)))?;
    }

    Ok(())
}
