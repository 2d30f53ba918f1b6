use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use thiserror::Error;

use super::error::EngineError;
use crate::core::models::chain::Chain;

/// Lifecycle of a folding run.
///
/// `Idle → Running → Completed | Cancelled | Failed`. The last three are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SimulationState {
    Idle = 0,
    Running = 1,
    Completed = 2,
    Cancelled = 3,
    Failed = 4,
}

impl SimulationState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            SimulationState::Completed | SimulationState::Cancelled | SimulationState::Failed
        )
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => SimulationState::Idle,
            1 => SimulationState::Running,
            2 => SimulationState::Completed,
            3 => SimulationState::Cancelled,
            _ => SimulationState::Failed,
        }
    }
}

impl std::fmt::Display for SimulationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SimulationState::Idle => "idle",
            SimulationState::Running => "running",
            SimulationState::Completed => "completed",
            SimulationState::Cancelled => "cancelled",
            SimulationState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Lock-free state cell shared between the simulation thread and its handle.
#[derive(Debug, Clone)]
pub(crate) struct SharedState(Arc<AtomicU8>);

impl SharedState {
    pub(crate) fn new(state: SimulationState) -> Self {
        Self(Arc::new(AtomicU8::new(state as u8)))
    }

    pub(crate) fn get(&self) -> SimulationState {
        SimulationState::from_u8(self.0.load(Ordering::Acquire))
    }

    pub(crate) fn set(&self, state: SimulationState) {
        self.0.store(state as u8, Ordering::Release);
    }

    /// Moves to a terminal state unless one has already been recorded.
    pub(crate) fn finish(&self, state: SimulationState) {
        let _ = self
            .0
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                (!SimulationState::from_u8(current).is_terminal()).then_some(state as u8)
            });
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationSummary {
    pub steps_taken: u64,
    pub elapsed_fs: f64,
    pub final_state: SimulationState,
}

/// A finished (completed or cancelled) run together with the chain it moved.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationReport {
    pub chain: Chain,
    pub summary: SimulationSummary,
}

#[derive(Debug, Error)]
#[error("Simulation failed at step {step}: {error}")]
pub struct SimulationFailure {
    #[source]
    pub error: EngineError,
    pub step: u64,
}

impl SimulationFailure {
    pub fn new(error: EngineError, step: u64) -> Self {
        Self { error, step }
    }
}

impl From<SimulationFailure> for EngineError {
    fn from(failure: SimulationFailure) -> Self {
        match failure.error {
            error @ EngineError::SimulationFailed { .. } => error,
            error => EngineError::SimulationFailed {
                step: failure.step,
                source: Box::new(error),
            },
        }
    }
}

/// Value delivered once through the completion channel.
pub type SimulationOutcome = Result<SimulationReport, SimulationFailure>;
