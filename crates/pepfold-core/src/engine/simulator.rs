use tokio::sync::oneshot;
use tracing::{debug, info, instrument, trace, warn};

use super::cancellation::CancellationToken;
use super::config::SimulationConfig;
use super::error::EngineError;
use super::integrator::{AtomVelocities, advance};
use super::progress::{Progress, ProgressReporter};
use super::state::{
    SharedState, SimulationFailure, SimulationOutcome, SimulationReport, SimulationState,
    SimulationSummary,
};
use crate::core::forcefield::contributor::ForceContributor;
use crate::core::forcefield::record::ForceMap;
use crate::core::models::chain::Chain;

/// Time-stepped integrator driving a chain under a set of force contributors.
///
/// Every step first asks each contributor for forces against the unmodified chain,
/// sums them by residue, then moves all atoms at once. The run either covers the
/// configured duration, stops early on cancellation, or fails on the first error.
pub struct FoldingSimulator {
    config: SimulationConfig,
    contributors: Vec<Box<dyn ForceContributor>>,
    reporter: ProgressReporter<'static>,
}

impl FoldingSimulator {
    pub fn new(config: SimulationConfig, contributors: Vec<Box<dyn ForceContributor>>) -> Self {
        Self {
            config,
            contributors,
            reporter: ProgressReporter::new(),
        }
    }

    pub fn with_reporter(mut self, reporter: ProgressReporter<'static>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn contributor_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.contributors.iter().map(|c| c.name())
    }

    fn gather_forces(&self, chain: &Chain, step: u64) -> Result<ForceMap, EngineError> {
        let mut total = ForceMap::zeros(chain.len());
        for contributor in &self.contributors {
            let forces = contributor
                .compute_forces(chain)
                .map_err(|source| EngineError::Force {
                    contributor: contributor.name(),
                    source,
                })?;
            total += &forces;
        }
        if let Some(residue) = total.first_non_finite() {
            return Err(EngineError::NumericalInstability { residue, step });
        }
        Ok(total)
    }

    /// Runs the simulation to completion on the calling thread.
    ///
    /// The token is polled before every step. A cancelled run is not an error: it
    /// returns a summary in the [`SimulationState::Cancelled`] state with the chain
    /// left as of the last completed step.
    ///
    /// # Errors
    ///
    /// Returns a [`SimulationFailure`] carrying the step at which the first
    /// contributor or integration error occurred. Step `0` means the chain was
    /// rejected before integration began.
    #[instrument(
        skip_all,
        name = "folding_simulation",
        fields(residues = chain.len(), steps = self.config.total_steps())
    )]
    pub fn run(
        &self,
        chain: &mut Chain,
        cancellation: &CancellationToken,
    ) -> Result<SimulationSummary, SimulationFailure> {
        if let Some(residue) = chain.first_unpositioned() {
            return Err(SimulationFailure::new(
                EngineError::Unpositioned { residue },
                0,
            ));
        }

        let total_steps = self.config.total_steps();
        let mut velocities = AtomVelocities::zeros(chain.len());
        let mut steps_taken = 0;
        let summary = |steps_taken: u64, final_state| SimulationSummary {
            steps_taken,
            elapsed_fs: steps_taken as f64 * self.config.time_step_fs,
            final_state,
        };

        info!(
            duration_fs = self.config.duration_fs,
            time_step_fs = self.config.time_step_fs,
            reset_velocity = self.config.reset_velocity,
            "Starting folding simulation"
        );
        self.reporter.report(Progress::TaskStart { total_steps });

        while steps_taken < total_steps {
            if cancellation.is_cancelled() {
                info!(steps_taken, "Simulation cancelled");
                self.reporter.report(Progress::TaskFinish);
                return Ok(summary(steps_taken, SimulationState::Cancelled));
            }

            let step = steps_taken + 1;
            let forces = self
                .gather_forces(chain, step)
                .map_err(|error| SimulationFailure::new(error, step))?;
            advance(chain, &mut velocities, &forces, &self.config, step)
                .map_err(|error| SimulationFailure::new(error, step))?;

            steps_taken = step;
            trace!(step, "Integration step complete");
            self.reporter.report(Progress::TaskIncrement);
        }

        self.reporter.report(Progress::TaskFinish);
        let summary = summary(steps_taken, SimulationState::Completed);
        info!(
            steps_taken,
            elapsed_fs = summary.elapsed_fs,
            "Folding simulation completed"
        );
        Ok(summary)
    }

    /// Moves the simulator and the chain onto a dedicated thread.
    ///
    /// The returned handle observes the state, requests cancellation, and receives
    /// the outcome exactly once.
    pub fn start(self, chain: Chain) -> SimulationHandle {
        let state = SharedState::new(SimulationState::Idle);
        let cancellation = CancellationToken::new();
        let (sender, receiver) = oneshot::channel();

        let thread_state = state.clone();
        let thread_token = cancellation.clone();
        let spawned = std::thread::Builder::new()
            .name("pepfold-simulation".to_string())
            .spawn(move || {
                thread_state.set(SimulationState::Running);
                let mut chain = chain;
                let outcome: SimulationOutcome = match self.run(&mut chain, &thread_token) {
                    Ok(summary) => {
                        thread_state.finish(summary.final_state);
                        Ok(SimulationReport { chain, summary })
                    }
                    Err(failure) => {
                        thread_state.finish(SimulationState::Failed);
                        Err(failure)
                    }
                };
                if sender.send(outcome).is_err() {
                    debug!("Simulation handle dropped before completion was delivered");
                }
            });

        if let Err(e) = spawned {
            warn!("Failed to spawn simulation thread: {}", e);
            state.finish(SimulationState::Failed);
        }

        SimulationHandle {
            state,
            cancellation,
            receiver,
        }
    }
}

impl std::fmt::Debug for FoldingSimulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FoldingSimulator")
            .field("config", &self.config)
            .field("contributors", &self.contributor_names().collect::<Vec<_>>())
            .finish()
    }
}

/// Controller for a simulation running on its own thread.
#[derive(Debug)]
pub struct SimulationHandle {
    state: SharedState,
    cancellation: CancellationToken,
    receiver: oneshot::Receiver<SimulationOutcome>,
}

impl SimulationHandle {
    pub fn state(&self) -> SimulationState {
        self.state.get()
    }

    pub fn is_finished(&self) -> bool {
        self.state().is_terminal()
    }

    /// Requests a stop at the next step boundary.
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Blocks the current thread until the outcome arrives.
    ///
    /// Must not be called from within an async runtime; use
    /// [`SimulationHandle::completion`] there.
    pub fn wait(self) -> SimulationOutcome {
        let outcome = self.receiver.blocking_recv();
        Self::settle(&self.state, outcome)
    }

    pub async fn completion(self) -> SimulationOutcome {
        let outcome = self.receiver.await;
        Self::settle(&self.state, outcome)
    }

    fn settle(
        state: &SharedState,
        outcome: Result<SimulationOutcome, oneshot::error::RecvError>,
    ) -> SimulationOutcome {
        outcome.unwrap_or_else(|_| {
            state.finish(SimulationState::Failed);
            Err(SimulationFailure::new(
                EngineError::Internal(
                    "simulation thread terminated without reporting an outcome".to_string(),
                ),
                0,
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::backbone::positioner::position_chain;
    use crate::core::forcefield::bond::BondForce;
    use crate::core::forcefield::contributor::ForceError;
    use crate::core::forcefield::ramachandran::RamachandranForceField;
    use crate::core::forcefield::record::ForceRecord;
    use crate::core::measurements::angles::measure_chain;
    use crate::core::models::residue::BackboneAtom;
    use crate::core::ramachandran::fixed::FixedTargetSurface;
    use crate::core::utils::geometry::wrap_degrees;
    use crate::engine::config::SimulationConfigBuilder;
    use nalgebra::{Point3, Vector3};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    const TARGET_PHI: f64 = -90.0;
    const TARGET_PSI: f64 = -20.0;

    fn config(duration: f64, step: f64) -> SimulationConfig {
        SimulationConfigBuilder::new()
            .duration_fs(duration)
            .time_step_fs(step)
            .reset_velocity(true)
            .build()
            .unwrap()
    }

    fn positioned(sequence: &str) -> Chain {
        let mut chain = Chain::from_sequence(sequence).unwrap();
        position_chain(&mut chain, Some(&Point3::origin())).unwrap();
        chain
    }

    fn folding_contributors() -> Vec<Box<dyn ForceContributor>> {
        vec![
            Box::new(RamachandranForceField::new(Arc::new(
                FixedTargetSurface::new(TARGET_PHI, TARGET_PSI),
            ))),
            Box::new(BondForce::default()),
        ]
    }

    struct PoisonResidue(usize);

    impl ForceContributor for PoisonResidue {
        fn name(&self) -> &'static str {
            "poison"
        }

        fn compute_forces(&self, chain: &Chain) -> Result<ForceMap, ForceError> {
            let mut forces = ForceMap::zeros(chain.len());
            forces.accumulate(self.0, BackboneAtom::CarbonAlpha, Vector3::new(f64::NAN, 0.0, 0.0));
            Ok(forces)
        }
    }

    struct CancelAfter {
        calls: AtomicUsize,
        limit: usize,
        token: CancellationToken,
    }

    impl ForceContributor for CancelAfter {
        fn name(&self) -> &'static str {
            "cancel-after"
        }

        fn compute_forces(&self, chain: &Chain) -> Result<ForceMap, ForceError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) + 1 >= self.limit {
                self.token.cancel();
            }
            Ok(ForceMap::zeros(chain.len()))
        }
    }

    struct Still;

    impl ForceContributor for Still {
        fn name(&self) -> &'static str {
            "still"
        }

        fn compute_forces(&self, chain: &Chain) -> Result<ForceMap, ForceError> {
            Ok(ForceMap::zeros(chain.len()))
        }
    }

    struct AlwaysFails;

    impl ForceContributor for AlwaysFails {
        fn name(&self) -> &'static str {
            "always-fails"
        }

        fn compute_forces(&self, _chain: &Chain) -> Result<ForceMap, ForceError> {
            Err(ForceError::UnpositionedResidue { index: 0 })
        }
    }

    #[test]
    fn middle_residue_approaches_the_target() {
        let mut chain = positioned("AAA");
        let initial = measure_chain(&chain)[1];

        let simulator = FoldingSimulator::new(config(500.0, 2.0), folding_contributors());
        let summary = simulator
            .run(&mut chain, &CancellationToken::new())
            .unwrap();
        let last = measure_chain(&chain)[1];

        assert_eq!(summary.final_state, SimulationState::Completed);
        assert_eq!(summary.steps_taken, 250);
        let phi_gap = |phi: Option<f64>| wrap_degrees(phi.unwrap() - TARGET_PHI).abs();
        let psi_gap = |psi: Option<f64>| wrap_degrees(psi.unwrap() - TARGET_PSI).abs();
        assert!(phi_gap(last.phi) < phi_gap(initial.phi));
        assert!(psi_gap(last.psi) < psi_gap(initial.psi));
    }

    #[test]
    fn long_chain_stays_finite() {
        let mut chain = positioned("MKTAYIAKQRQISFVKSHFS");
        let simulator = FoldingSimulator::new(config(100.0, 2.0), folding_contributors());
        simulator
            .run(&mut chain, &CancellationToken::new())
            .unwrap();
        assert!(chain.positions().all(|p| p.coords.iter().all(|c| c.is_finite())));
    }

    #[test]
    fn pre_cancelled_run_takes_no_steps() {
        let mut chain = positioned("AAA");
        let before = chain.clone();
        let token = CancellationToken::new();
        token.cancel();

        let summary = FoldingSimulator::new(config(500.0, 2.0), folding_contributors())
            .run(&mut chain, &token)
            .unwrap();

        assert_eq!(summary.final_state, SimulationState::Cancelled);
        assert_eq!(summary.steps_taken, 0);
        assert_eq!(summary.elapsed_fs, 0.0);
        assert_eq!(chain, before);
    }

    #[test]
    fn cancellation_stops_on_a_step_boundary() {
        let token = CancellationToken::new();
        let contributor = CancelAfter {
            calls: AtomicUsize::new(0),
            limit: 3,
            token: token.clone(),
        };
        let mut chain = positioned("AG");
        let summary = FoldingSimulator::new(config(100.0, 1.0), vec![Box::new(contributor)])
            .run(&mut chain, &token)
            .unwrap();

        assert_eq!(summary.final_state, SimulationState::Cancelled);
        assert_eq!(summary.steps_taken, 3);
        assert_eq!(summary.elapsed_fs, 3.0);
    }

    #[test]
    fn non_finite_force_fails_with_the_residue_index() {
        let mut chain = positioned("AAAA");
        let failure = FoldingSimulator::new(config(10.0, 2.0), vec![Box::new(PoisonResidue(2))])
            .run(&mut chain, &CancellationToken::new())
            .unwrap_err();

        assert_eq!(failure.step, 1);
        assert!(matches!(
            failure.error,
            EngineError::NumericalInstability { residue: 2, step: 1 }
        ));
    }

    #[test]
    fn contributor_errors_name_the_contributor() {
        let mut chain = positioned("AA");
        let failure = FoldingSimulator::new(config(10.0, 2.0), vec![Box::new(AlwaysFails)])
            .run(&mut chain, &CancellationToken::new())
            .unwrap_err();

        assert!(matches!(
            failure.error,
            EngineError::Force {
                contributor: "always-fails",
                ..
            }
        ));
    }

    #[test]
    fn unpositioned_chain_is_rejected_before_integration() {
        let mut chain = Chain::from_sequence("AAA").unwrap();
        let failure = FoldingSimulator::new(config(10.0, 2.0), folding_contributors())
            .run(&mut chain, &CancellationToken::new())
            .unwrap_err();

        assert_eq!(failure.step, 0);
        assert!(matches!(
            failure.error,
            EngineError::Unpositioned { residue: 0 }
        ));
    }

    #[test]
    fn progress_is_reported_once_per_step() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        let reporter = ProgressReporter::with_callback(Box::new(move |event| {
            sink.lock().unwrap().push(event);
        }));

        let mut chain = positioned("AAA");
        FoldingSimulator::new(config(10.0, 2.0), folding_contributors())
            .with_reporter(reporter)
            .run(&mut chain, &CancellationToken::new())
            .unwrap();

        let recorded = events.lock().unwrap();
        assert_eq!(recorded.first(), Some(&Progress::TaskStart { total_steps: 5 }));
        assert_eq!(recorded.last(), Some(&Progress::TaskFinish));
        let increments = recorded
            .iter()
            .filter(|e| **e == Progress::TaskIncrement)
            .count();
        assert_eq!(increments, 5);
    }

    #[test]
    fn handle_wait_returns_the_moved_chain() {
        let chain = positioned("AAA");
        let handle = FoldingSimulator::new(config(20.0, 2.0), folding_contributors()).start(chain);
        let report = handle.wait().unwrap();

        assert_eq!(report.summary.final_state, SimulationState::Completed);
        assert_eq!(report.summary.steps_taken, 10);
        assert_eq!(report.chain.len(), 3);
    }

    #[test]
    fn handle_reports_failure_and_terminal_state() {
        let chain = positioned("AAA");
        let handle = FoldingSimulator::new(config(10.0, 2.0), vec![Box::new(PoisonResidue(0))])
            .start(chain);
        let state = handle.state.clone();
        let failure = handle.wait().unwrap_err();

        assert!(matches!(
            failure.error,
            EngineError::NumericalInstability { residue: 0, .. }
        ));
        assert_eq!(state.get(), SimulationState::Failed);
    }

    #[test]
    fn handle_cancel_stops_a_long_run() {
        let chain = positioned("AAA");
        let handle = FoldingSimulator::new(config(1.0e12, 1.0), vec![Box::new(Still)]).start(chain);
        let state = handle.state.clone();
        handle.cancel();
        let report = handle.wait().unwrap();

        assert_eq!(report.summary.final_state, SimulationState::Cancelled);
        assert_eq!(state.get(), SimulationState::Cancelled);
    }

    #[tokio::test]
    async fn async_completion_delivers_the_report() {
        let chain = positioned("AGA");
        let handle = FoldingSimulator::new(config(500.0, 2.0), folding_contributors()).start(chain);
        let report = handle.completion().await.unwrap();

        assert_eq!(report.summary.steps_taken, 250);
        assert!(report.summary.final_state.is_terminal());
        let residues = report.chain.residues();
        assert!(residues.iter().all(|r| r.is_positioned()));
    }

    #[test]
    fn forces_from_all_contributors_are_summed() {
        struct Constant(Vector3<f64>);
        impl ForceContributor for Constant {
            fn name(&self) -> &'static str {
                "constant"
            }
            fn compute_forces(&self, chain: &Chain) -> Result<ForceMap, ForceError> {
                Ok(ForceMap::from_records(vec![
                    ForceRecord::new(self.0, self.0, self.0);
                    chain.len()
                ]))
            }
        }

        let simulator = FoldingSimulator::new(
            config(2.0, 2.0),
            vec![
                Box::new(Constant(Vector3::new(1.0, 0.0, 0.0))),
                Box::new(Constant(Vector3::new(0.0, 2.0, 0.0))),
            ],
        );
        let chain = positioned("A");
        let total = simulator.gather_forces(&chain, 1).unwrap();
        assert_eq!(total[0].carbon, Vector3::new(1.0, 2.0, 0.0));
    }
}
