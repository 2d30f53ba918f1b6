use nalgebra::Point3;
use tracing::{info, instrument};

use crate::core::backbone::positioner::position_chain;
use crate::core::models::chain::Chain;
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};

/// Uniform dihedral angles applied to every residue before reconstruction.
///
/// Unset angles fall back to the reconstructor defaults (omega 180°, phi and psi 0°).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BuildOptions {
    pub phi: Option<f64>,
    pub psi: Option<f64>,
    pub omega: Option<f64>,
    pub start_position: Point3<f64>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            phi: None,
            psi: None,
            omega: None,
            start_position: Point3::origin(),
        }
    }
}

/// Builds a chain from a one-letter sequence and reconstructs its backbone.
#[instrument(skip_all, name = "build_workflow", fields(sequence = sequence))]
pub fn run(
    sequence: &str,
    options: &BuildOptions,
    reporter: &ProgressReporter,
) -> Result<Chain, EngineError> {
    let chain = Chain::from_sequence(sequence)?;
    build_chain(chain, options, reporter)
}

/// Applies the uniform angles to a chain and completes its backbone.
///
/// Angles already present on a residue are kept, as are already positioned residues.
pub fn build_chain(
    mut chain: Chain,
    options: &BuildOptions,
    reporter: &ProgressReporter,
) -> Result<Chain, EngineError> {
    reporter.report(Progress::PhaseStart {
        name: "Backbone reconstruction",
    });

    for residue in chain.residues_mut() {
        residue.phi = residue.phi.or(options.phi);
        residue.psi = residue.psi.or(options.psi);
        residue.omega = residue.omega.or(options.omega);
    }
    position_chain(&mut chain, Some(&options.start_position))?;

    reporter.report(Progress::PhaseFinish);
    info!(residues = chain.len(), "Backbone reconstructed");
    Ok(chain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::measurements::angles::measure_chain;
    use crate::core::models::chain::ChainBuildError;
    use crate::core::models::residue::Residue;
    use crate::core::models::amino_acid::AminoAcid;

    #[test]
    fn build_positions_every_residue() {
        let chain = run("ACDEFG", &BuildOptions::default(), &ProgressReporter::new()).unwrap();
        assert_eq!(chain.len(), 6);
        assert!(chain.is_fully_positioned());
    }

    #[test]
    fn uniform_angles_are_reproduced_by_measurement() {
        let options = BuildOptions {
            phi: Some(-57.0),
            psi: Some(-47.0),
            omega: Some(180.0),
            ..BuildOptions::default()
        };
        let chain = run("AAAAA", &options, &ProgressReporter::new()).unwrap();
        let angles = measure_chain(&chain);

        for residue in &angles[1..4] {
            assert!((residue.phi.unwrap() + 57.0).abs() < 1e-6);
            assert!((residue.psi.unwrap() + 47.0).abs() < 1e-6);
            assert!((residue.omega.unwrap().abs() - 180.0).abs() < 1e-6);
        }
    }

    #[test]
    fn residue_angles_take_precedence_over_uniform_angles() {
        let chain = Chain::from_residues(vec![
            Residue::new(AminoAcid::Alanine),
            Residue::new(AminoAcid::Alanine).with_angles(Some(-120.0), None, None),
            Residue::new(AminoAcid::Alanine),
        ]);
        let options = BuildOptions {
            phi: Some(-60.0),
            ..BuildOptions::default()
        };
        let chain = build_chain(chain, &options, &ProgressReporter::new()).unwrap();
        assert_eq!(chain.residues()[1].phi, Some(-120.0));
        assert_eq!(chain.residues()[2].phi, Some(-60.0));
    }

    #[test]
    fn invalid_sequence_is_reported() {
        let result = run("AXZ", &BuildOptions::default(), &ProgressReporter::new());
        assert!(matches!(
            result,
            Err(EngineError::Chain(ChainBuildError::UnknownCode { code: 'X', .. }))
        ));
    }

    #[test]
    fn start_position_anchors_the_chain() {
        let start = Point3::new(1000.0, -500.0, 250.0);
        let options = BuildOptions {
            start_position: start,
            ..BuildOptions::default()
        };
        let chain = run("G", &options, &ProgressReporter::new()).unwrap();
        let nitrogen = chain.residues()[0].nitrogen.unwrap();
        assert!(((nitrogen - start).norm() - 147.0).abs() < 1e-6);
    }
}
