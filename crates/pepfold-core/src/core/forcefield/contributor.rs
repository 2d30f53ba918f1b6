use super::record::ForceMap;
use crate::core::models::amino_acid::AminoAcid;
use crate::core::models::chain::Chain;
use crate::core::models::residue::BackbonePositions;
use crate::core::utils::geometry::GeometryError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ForceError {
    #[error("Residue {index} is not fully positioned")]
    UnpositionedResidue { index: usize },
    #[error("No angular preference data for amino acid {amino_acid}")]
    MissingPreferenceData { amino_acid: AminoAcid },
    #[error("Degenerate geometry at residue {index}: {source}")]
    Geometry {
        index: usize,
        source: GeometryError,
    },
}

/// A source of per-residue pseudo-forces.
///
/// Implementations read the chain but never modify it, and return a map with one
/// record per residue. The simulator sums the maps of all contributors before
/// integrating.
pub trait ForceContributor: Send + Sync {
    fn name(&self) -> &'static str;

    fn compute_forces(&self, chain: &Chain) -> Result<ForceMap, ForceError>;
}

/// Copies the backbone of every residue, failing on the first unpositioned one.
pub fn backbone_snapshot(chain: &Chain) -> Result<Vec<BackbonePositions>, ForceError> {
    chain
        .residues()
        .iter()
        .enumerate()
        .map(|(index, residue)| {
            residue
                .backbone()
                .ok_or(ForceError::UnpositionedResidue { index })
        })
        .collect()
}
