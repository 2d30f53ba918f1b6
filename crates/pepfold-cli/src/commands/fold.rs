use crate::cli::FoldArgs;
use crate::config::build_config;
use crate::error::Result;
use crate::output::write_coordinates_to_path;
use crate::utils::progress::CliProgressHandler;
use pepfold::core::measurements::angles::BackboneAngles;
use pepfold::core::models::chain::Chain;
use pepfold::engine::error::EngineError;
use pepfold::engine::progress::ProgressReporter;
use pepfold::engine::state::SimulationState;
use pepfold::workflows::fold::{self, FoldResult};
use std::fmt::Write as _;
use tracing::{info, warn};

fn format_angle(angle: Option<f64>) -> String {
    angle.map_or_else(|| "-".to_string(), |a| format!("{:.1}", a))
}

/// Renders the initial and final dihedrals of every residue as an aligned table.
fn angle_summary(result: &FoldResult) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>5} {:<4} {:>17} {:>17} {:>17}",
        "#", "res", "phi (start->end)", "psi (start->end)", "omega (start->end)"
    );
    let default = BackboneAngles::default();
    for (index, residue) in result.chain.residues().iter().enumerate() {
        let before = result.initial_angles.get(index).unwrap_or(&default);
        let after = result.final_angles.get(index).unwrap_or(&default);
        let pair = |a: Option<f64>, b: Option<f64>| {
            format!("{}->{}", format_angle(a), format_angle(b))
        };
        let _ = writeln!(
            out,
            "{:>5} {:<4} {:>17} {:>17} {:>17}",
            index + 1,
            residue.amino_acid().three_letter_code(),
            pair(before.phi, after.phi),
            pair(before.psi, after.psi),
            pair(before.omega, after.omega),
        );
    }
    if let (Some(before), Some(after)) = (result.initial_compactness, result.final_compactness) {
        let _ = writeln!(
            out,
            "Radius of gyration: {:.1} pm -> {:.1} pm; bounding box: {:.3e} pm^3 -> {:.3e} pm^3",
            before.radius_of_gyration,
            after.radius_of_gyration,
            before.bounding_box_volume,
            after.bounding_box_volume
        );
    }
    out
}

pub async fn run(args: FoldArgs) -> Result<()> {
    let app_config = build_config(&args)?;
    let chain = Chain::from_sequence(&app_config.sequence).map_err(EngineError::from)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    println!(
        "Folding {} residues for {} fs...",
        chain.len(),
        app_config.core_config.simulation.duration_fs
    );
    info!("Invoking the fold workflow...");
    let job = fold::start(chain, &app_config.core_config, reporter)?;
    let token = job.cancellation_token();

    let completion = job.completion();
    tokio::pin!(completion);
    let result = tokio::select! {
        result = &mut completion => result?,
        Ok(()) = tokio::signal::ctrl_c() => {
            warn!("Interrupt received; stopping at the next step boundary.");
            token.cancel();
            completion.await?
        }
    };

    info!(
        "Workflow finished after {} steps ({} fs).",
        result.summary.steps_taken, result.summary.elapsed_fs
    );
    if result.summary.final_state == SimulationState::Cancelled {
        println!(
            "Simulation cancelled after {} of the requested steps.",
            result.summary.steps_taken
        );
    }

    write_coordinates_to_path(&result.chain, &app_config.output_path)?;
    print!("{}", angle_summary(&result));
    println!(
        "✓ Folded coordinates written to: {}",
        app_config.output_path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn args(output: PathBuf) -> FoldArgs {
        FoldArgs {
            sequence: "AAA".to_string(),
            output,
            config: None,
            duration_fs: Some(20.0),
            time_step_fs: Some(2.0),
            no_velocity_reset: false,
            data_dir: None,
            target: Some("-90,-20".to_string()),
            set_values: vec![],
        }
    }

    #[tokio::test]
    async fn fold_writes_coordinates() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("folded.csv");
        run(args(output.clone())).await.unwrap();

        let content = std::fs::read_to_string(output).unwrap();
        assert_eq!(content.lines().count(), 4);
    }

    #[tokio::test]
    async fn missing_preference_directory_fails() {
        let dir = tempdir().unwrap();
        let mut args = args(dir.path().join("folded.csv"));
        args.target = None;
        args.data_dir = Some(dir.path().join("absent"));
        let result = run(args).await;
        assert!(matches!(
            result,
            Err(CliError::PepFoldCore(EngineError::PreferenceData(_)))
        ));
    }

    #[test]
    fn summary_lists_every_residue() {
        let config = build_config(&args(PathBuf::from("unused.csv"))).unwrap();
        let result = fold::run_sequence("AGA", &config.core_config, ProgressReporter::new()).unwrap();
        let summary = angle_summary(&result);

        assert_eq!(summary.lines().count(), 5);
        assert!(summary.lines().nth(2).unwrap().contains("GLY"));
        assert!(summary.contains("Radius of gyration"));
    }

    #[test]
    fn unset_angles_render_as_dashes() {
        assert_eq!(format_angle(None), "-");
        assert_eq!(format_angle(Some(-57.04)), "-57.0");
    }
}
