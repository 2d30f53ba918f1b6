use std::sync::Arc;
use tracing::{info, instrument};

use crate::core::backbone::positioner::position_chain;
use crate::core::forcefield::bond::BondForce;
use crate::core::forcefield::compacting::CompactingForce;
use crate::core::forcefield::contributor::{ForceContributor, ForceError};
use crate::core::forcefield::ramachandran::RamachandranForceField;
use crate::core::measurements::angles::{BackboneAngles, measure_chain, refresh_chain_angles};
use crate::core::measurements::compactness::{CompactnessMeasurement, measure_compactness};
use crate::core::models::chain::Chain;
use crate::core::ramachandran::AngularPreferenceSource;
use crate::core::ramachandran::fixed::FixedTargetSurface;
use crate::core::ramachandran::table::PreferenceTable;
use crate::engine::cancellation::CancellationToken;
use crate::engine::config::{FoldConfig, ForceConfig, PreferenceConfig};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::simulator::{FoldingSimulator, SimulationHandle};
use crate::engine::state::{SimulationOutcome, SimulationState, SimulationSummary};

#[derive(Debug, Clone, PartialEq)]
pub struct FoldResult {
    pub chain: Chain,
    pub summary: SimulationSummary,
    pub initial_angles: Vec<BackboneAngles>,
    pub final_angles: Vec<BackboneAngles>,
    pub initial_compactness: Option<CompactnessMeasurement>,
    pub final_compactness: Option<CompactnessMeasurement>,
}

/// A fold running on its own simulation thread.
#[derive(Debug)]
pub struct FoldJob {
    handle: SimulationHandle,
    initial_angles: Vec<BackboneAngles>,
    initial_compactness: Option<CompactnessMeasurement>,
}

impl FoldJob {
    pub fn state(&self) -> SimulationState {
        self.handle.state()
    }

    pub fn cancel(&self) {
        self.handle.cancel();
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.handle.cancellation_token()
    }

    pub fn initial_angles(&self) -> &[BackboneAngles] {
        &self.initial_angles
    }

    /// Blocks until the simulation ends.
    pub fn wait(self) -> Result<FoldResult, EngineError> {
        let outcome = self.handle.wait();
        Self::finish(outcome, self.initial_angles, self.initial_compactness)
    }

    pub async fn completion(self) -> Result<FoldResult, EngineError> {
        let outcome = self.handle.completion().await;
        Self::finish(outcome, self.initial_angles, self.initial_compactness)
    }

    fn finish(
        outcome: SimulationOutcome,
        initial_angles: Vec<BackboneAngles>,
        initial_compactness: Option<CompactnessMeasurement>,
    ) -> Result<FoldResult, EngineError> {
        let report = outcome?;
        let mut chain = report.chain;
        refresh_chain_angles(&mut chain);

        info!(
            state = %report.summary.final_state,
            steps = report.summary.steps_taken,
            "Fold finished"
        );
        Ok(FoldResult {
            final_angles: measure_chain(&chain),
            final_compactness: measure_compactness(&chain),
            chain,
            summary: report.summary,
            initial_angles,
            initial_compactness,
        })
    }
}

pub fn preference_source(
    preference: &PreferenceConfig,
) -> Result<Arc<dyn AngularPreferenceSource>, EngineError> {
    Ok(match preference {
        PreferenceConfig::FixedTarget { phi_deg, psi_deg } => {
            Arc::new(FixedTargetSurface::new(*phi_deg, *psi_deg))
        }
        PreferenceConfig::Directory {
            path,
            resolution_deg,
        } => Arc::new(PreferenceTable::load_from_dir(path, *resolution_deg)?),
    })
}

fn contributors(
    source: Arc<dyn AngularPreferenceSource>,
    forces: &ForceConfig,
) -> Vec<Box<dyn ForceContributor>> {
    let mut contributors: Vec<Box<dyn ForceContributor>> =
        vec![Box::new(RamachandranForceField::new(source))];
    if let Some(stiffness) = forces.bond_stiffness {
        contributors.push(Box::new(BondForce::new(stiffness)));
    }
    if let Some(strength) = forces.compacting_strength.filter(|s| *s > 0.0) {
        contributors.push(Box::new(CompactingForce::new(strength)));
    }
    contributors
}

/// Validates, reconstructs and launches a fold of `chain`.
///
/// The chain may carry pre-filled positions and angles; whatever is missing is
/// reconstructed from `config.start_position` before the simulation starts.
///
/// # Errors
///
/// Fails before any simulation work if the preference data cannot be loaded, does
/// not cover every amino acid of the chain, or the backbone cannot be reconstructed.
#[instrument(skip_all, name = "fold_workflow", fields(residues = chain.len()))]
pub fn start(
    mut chain: Chain,
    config: &FoldConfig,
    reporter: ProgressReporter<'static>,
) -> Result<FoldJob, EngineError> {
    reporter.report(Progress::PhaseStart {
        name: "Preparation",
    });
    let source = preference_source(&config.preference)?;
    if let Some(residue) = chain
        .residues()
        .iter()
        .find(|r| !source.covers(r.amino_acid()))
    {
        return Err(EngineError::Force {
            contributor: RamachandranForceField::NAME,
            source: ForceError::MissingPreferenceData {
                amino_acid: residue.amino_acid(),
            },
        });
    }

    position_chain(&mut chain, Some(&config.start_position))?;
    let initial_angles = measure_chain(&chain);
    let initial_compactness = measure_compactness(&chain);
    reporter.report(Progress::PhaseFinish);

    let simulator = FoldingSimulator::new(config.simulation, contributors(source, &config.forces));
    let names: Vec<&str> = simulator.contributor_names().collect();
    info!(
        contributors = ?names,
        steps = config.simulation.total_steps(),
        "Launching folding simulation"
    );
    reporter.report(Progress::PhaseStart {
        name: "Folding simulation",
    });
    let handle = simulator.with_reporter(reporter).start(chain);

    Ok(FoldJob {
        handle,
        initial_angles,
        initial_compactness,
    })
}

/// Folds `chain` and blocks until the simulation ends.
pub fn run(
    chain: Chain,
    config: &FoldConfig,
    reporter: ProgressReporter<'static>,
) -> Result<FoldResult, EngineError> {
    start(chain, config, reporter)?.wait()
}

/// Folds a chain built from a one-letter sequence.
pub fn run_sequence(
    sequence: &str,
    config: &FoldConfig,
    reporter: ProgressReporter<'static>,
) -> Result<FoldResult, EngineError> {
    run(Chain::from_sequence(sequence)?, config, reporter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::amino_acid::AminoAcid;
    use crate::core::models::residue::Residue;
    use crate::core::ramachandran::empirical::PreferenceLoadError;
    use crate::core::utils::geometry::wrap_degrees;
    use crate::engine::config::{FoldConfigBuilder, SimulationConfig, SimulationConfigBuilder};
    use crate::engine::error::ErrorKind;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn simulation(duration: f64) -> SimulationConfig {
        SimulationConfigBuilder::new()
            .duration_fs(duration)
            .time_step_fs(2.0)
            .reset_velocity(true)
            .build()
            .unwrap()
    }

    fn write_alanine_table(dir: &Path) {
        let mut content = String::from("phi,psi,density\n");
        for a in 0..36 {
            let phi = -175.0 + 10.0 * a as f64;
            for b in 0..36 {
                let psi = -175.0 + 10.0 * b as f64;
                let d_phi = wrap_degrees(phi + 60.0);
                let d_psi = wrap_degrees(psi + 45.0);
                let density = (-(d_phi * d_phi + d_psi * d_psi) / 3200.0).exp();
                content.push_str(&format!("{phi},{psi},{density}\n"));
            }
        }
        fs::write(dir.join("ALA.csv"), content).unwrap();
    }

    #[test]
    fn fold_moves_angles_toward_the_fixed_target() {
        let config = FoldConfigBuilder::new()
            .simulation(simulation(500.0))
            .fixed_target(-90.0, -20.0)
            .bond_stiffness(0.05)
            .build()
            .unwrap();
        let result = run_sequence("AAA", &config, ProgressReporter::new()).unwrap();

        assert_eq!(result.summary.final_state, SimulationState::Completed);
        let before = result.initial_angles[1];
        let after = result.final_angles[1];
        let gap = |angle: Option<f64>, target: f64| wrap_degrees(angle.unwrap() - target).abs();
        assert!(gap(after.phi, -90.0) < gap(before.phi, -90.0));
        assert!(gap(after.psi, -20.0) < gap(before.psi, -20.0));
        assert_eq!(result.chain.residues()[1].phi, after.phi);
    }

    #[test]
    fn compacting_shrinks_an_extended_chain() {
        let config = FoldConfigBuilder::new()
            .simulation(simulation(100.0))
            .fixed_target(-150.0, 150.0)
            .bond_stiffness(0.05)
            .compacting_strength(0.5)
            .build()
            .unwrap();
        let residues = (0..8)
            .map(|_| Residue::new(AminoAcid::Alanine).with_angles(Some(-150.0), Some(150.0), None))
            .collect();
        let result = run(Chain::from_residues(residues), &config, ProgressReporter::new()).unwrap();

        let before = result.initial_compactness.unwrap().radius_of_gyration;
        let after = result.final_compactness.unwrap().radius_of_gyration;
        assert!(after < before);
    }

    #[test]
    fn empirical_tables_drive_a_fold() {
        let dir = tempdir().unwrap();
        write_alanine_table(dir.path());
        let config = FoldConfigBuilder::new()
            .simulation(simulation(50.0))
            .preference_dir(dir.path().to_path_buf())
            .build()
            .unwrap();

        let result = run_sequence("AAAA", &config, ProgressReporter::new()).unwrap();
        assert_eq!(result.summary.steps_taken, 25);
        assert!(result.chain.is_fully_positioned());
    }

    #[test]
    fn uncovered_amino_acid_is_rejected_before_simulation() {
        let dir = tempdir().unwrap();
        write_alanine_table(dir.path());
        let config = FoldConfigBuilder::new()
            .simulation(simulation(50.0))
            .preference_dir(dir.path().to_path_buf())
            .build()
            .unwrap();

        let error = run_sequence("AGA", &config, ProgressReporter::new()).unwrap_err();
        assert!(matches!(
            error,
            EngineError::Force {
                source: ForceError::MissingPreferenceData {
                    amino_acid: AminoAcid::Glycine
                },
                ..
            }
        ));
        assert_eq!(error.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn missing_data_directory_is_a_data_error() {
        let dir = tempdir().unwrap();
        let config = FoldConfigBuilder::new()
            .simulation(simulation(50.0))
            .preference_dir(dir.path().join("absent"))
            .build()
            .unwrap();

        let error = run_sequence("AAA", &config, ProgressReporter::new()).unwrap_err();
        assert!(matches!(
            error,
            EngineError::PreferenceData(PreferenceLoadError::Io { .. })
        ));
        assert_eq!(error.kind(), ErrorKind::Data);
    }

    #[test]
    fn cancelled_job_returns_partial_result() {
        let config = FoldConfigBuilder::new()
            .simulation(simulation(1.0e12))
            .fixed_target(-60.0, -45.0)
            .build()
            .unwrap();
        let job = start(
            Chain::from_sequence("AAA").unwrap(),
            &config,
            ProgressReporter::new(),
        )
        .unwrap();
        assert_eq!(job.initial_angles().len(), 3);
        job.cancel();
        let result = job.wait().unwrap();

        assert_eq!(result.summary.final_state, SimulationState::Cancelled);
        assert!(result.chain.is_fully_positioned());
    }

    #[tokio::test]
    async fn async_completion_yields_the_fold() {
        let config = FoldConfigBuilder::new()
            .simulation(simulation(20.0))
            .fixed_target(-60.0, -45.0)
            .build()
            .unwrap();
        let job = start(
            Chain::from_sequence("GAG").unwrap(),
            &config,
            ProgressReporter::new(),
        )
        .unwrap();
        let result = job.completion().await.unwrap();
        assert_eq!(result.summary.steps_taken, 10);
        assert_eq!(result.final_angles.len(), 3);
    }
}
