use thiserror::Error;

use super::config::ConfigError;
use crate::core::backbone::positioner::ReconstructionError;
use crate::core::forcefield::contributor::ForceError;
use crate::core::models::chain::ChainBuildError;
use crate::core::ramachandran::empirical::PreferenceLoadError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Backbone reconstruction failed: {0}")]
    Reconstruction(#[from] ReconstructionError),

    #[error("Force contributor '{contributor}' failed: {source}")]
    Force {
        contributor: &'static str,
        source: ForceError,
    },

    #[error("Failed to load angular preference data: {0}")]
    PreferenceData(#[from] PreferenceLoadError),

    #[error("Invalid sequence: {0}")]
    Chain(#[from] ChainBuildError),

    #[error("Residue {residue} is not fully positioned")]
    Unpositioned { residue: usize },

    #[error("Non-finite coordinate at residue {residue} after step {step}")]
    NumericalInstability { residue: usize, step: u64 },

    #[error("Simulation failed at step {step}: {source}")]
    SimulationFailed {
        step: u64,
        source: Box<EngineError>,
    },

    #[error("Internal logic error: {0}")]
    Internal(String),
}

/// Broad classification of an [`EngineError`], used by front ends to choose exit
/// codes and wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or contradictory parameters, or reference data that does not cover the input.
    Configuration,
    /// Unreadable or malformed reference data files.
    Data,
    /// The chain itself is unusable (bad sequence, missing coordinates).
    InvalidInput,
    /// Degenerate frames or coincident atoms.
    Geometry,
    /// The integrator produced non-finite coordinates.
    Numerical,
    Internal,
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::Configuration(_) => ErrorKind::Configuration,
            EngineError::Reconstruction(error) => match error.root() {
                ReconstructionError::MissingReference => ErrorKind::Configuration,
                ReconstructionError::UnpositionedPrevious => ErrorKind::InvalidInput,
                ReconstructionError::Geometry(_) => ErrorKind::Geometry,
                ReconstructionError::Residue { .. } => ErrorKind::Internal,
            },
            EngineError::Force { source, .. } => match source {
                ForceError::MissingPreferenceData { .. } => ErrorKind::Configuration,
                ForceError::UnpositionedResidue { .. } => ErrorKind::InvalidInput,
                ForceError::Geometry { .. } => ErrorKind::Geometry,
            },
            EngineError::PreferenceData(_) => ErrorKind::Data,
            EngineError::Chain(_) | EngineError::Unpositioned { .. } => ErrorKind::InvalidInput,
            EngineError::NumericalInstability { .. } => ErrorKind::Numerical,
            EngineError::SimulationFailed { source, .. } => source.kind(),
            EngineError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Residue index the failure is attributed to, if any.
    pub fn residue(&self) -> Option<usize> {
        match self {
            EngineError::Reconstruction(error) => error.residue(),
            EngineError::Force { source, .. } => match source {
                ForceError::UnpositionedResidue { index } | ForceError::Geometry { index, .. } => {
                    Some(*index)
                }
                ForceError::MissingPreferenceData { .. } => None,
            },
            EngineError::Unpositioned { residue }
            | EngineError::NumericalInstability { residue, .. } => Some(*residue),
            EngineError::SimulationFailed { source, .. } => source.residue(),
            _ => None,
        }
    }
}
