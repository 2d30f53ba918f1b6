use super::amino_acid::AminoAcid;
use super::residue::Residue;
use nalgebra::Point3;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChainBuildError {
    #[error("Unknown amino acid code '{code}' at sequence position {position}")]
    UnknownCode { code: char, position: usize },
    #[error("Sequence contains no residues")]
    EmptySequence,
}

/// An ordered chain of residues sharing one coordinate frame.
///
/// Residue `i` is bonded to residue `i + 1` through C(i)-N(i+1). The order and the
/// identity of every residue are fixed once the chain is built; positions and angles
/// may be filled in later.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Chain {
    residues: Vec<Residue>,
}

impl Chain {
    /// Builds an unpositioned chain from a one-letter sequence. Whitespace is ignored.
    pub fn from_sequence(sequence: &str) -> Result<Self, ChainBuildError> {
        let residues = sequence
            .chars()
            .filter(|c| !c.is_whitespace())
            .enumerate()
            .map(|(position, code)| {
                AminoAcid::from_one_letter_code(code)
                    .map(Residue::new)
                    .ok_or(ChainBuildError::UnknownCode { code, position })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if residues.is_empty() {
            return Err(ChainBuildError::EmptySequence);
        }
        Ok(Self { residues })
    }

    pub fn from_amino_acids<I>(amino_acids: I) -> Self
    where
        I: IntoIterator<Item = AminoAcid>,
    {
        Self {
            residues: amino_acids.into_iter().map(Residue::new).collect(),
        }
    }

    /// Wraps residues that may already carry positions and angles.
    pub fn from_residues(residues: Vec<Residue>) -> Self {
        Self { residues }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.residues.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    pub fn residues(&self) -> &[Residue] {
        &self.residues
    }

    pub(crate) fn residues_mut(&mut self) -> &mut [Residue] {
        &mut self.residues
    }

    pub fn residue(&self, index: usize) -> Option<&Residue> {
        self.residues.get(index)
    }

    pub fn residue_mut(&mut self, index: usize) -> Option<&mut Residue> {
        self.residues.get_mut(index)
    }

    pub fn into_residues(self) -> Vec<Residue> {
        self.residues
    }

    pub fn sequence(&self) -> String {
        self.residues
            .iter()
            .map(|r| r.amino_acid().one_letter_code())
            .collect()
    }

    pub fn is_fully_positioned(&self) -> bool {
        self.residues.iter().all(Residue::is_positioned)
    }

    pub fn first_unpositioned(&self) -> Option<usize> {
        self.residues.iter().position(|r| !r.is_positioned())
    }

    /// Every set backbone position, in chain order.
    pub fn positions(&self) -> impl Iterator<Item = Point3<f64>> + '_ {
        self.residues.iter().flat_map(Residue::positions)
    }
}
