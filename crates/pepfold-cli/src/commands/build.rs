use crate::cli::BuildArgs;
use crate::error::{CliError, Result};
use crate::output::write_coordinates_to_path;
use crate::utils::progress::CliProgressHandler;
use pepfold::engine::progress::ProgressReporter;
use pepfold::workflows::build::{self, BuildOptions};
use tracing::info;

fn options_from_args(args: &BuildArgs) -> Result<BuildOptions> {
    for (name, value) in [("phi", args.phi), ("psi", args.psi), ("omega", args.omega)] {
        if value.is_some_and(|angle| !angle.is_finite()) {
            return Err(CliError::Argument(format!(
                "--{} must be a finite angle in degrees",
                name
            )));
        }
    }
    Ok(BuildOptions {
        phi: args.phi,
        psi: args.psi,
        omega: args.omega,
        ..BuildOptions::default()
    })
}

pub async fn run(args: BuildArgs) -> Result<()> {
    let options = options_from_args(&args)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Invoking the backbone build workflow...");
    let chain = build::run(&args.sequence, &options, &reporter)?;

    write_coordinates_to_path(&chain, &args.output)?;
    println!(
        "✓ Built {} residues; coordinates written to: {}",
        chain.len(),
        args.output.display()
    );
    Ok(())
}
