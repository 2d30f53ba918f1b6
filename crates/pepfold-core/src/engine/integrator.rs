use nalgebra::Vector3;

use super::config::SimulationConfig;
use super::error::EngineError;
use crate::core::forcefield::record::ForceMap;
use crate::core::models::chain::Chain;
use crate::core::models::residue::BackboneAtom;

fn slot(atom: BackboneAtom) -> usize {
    match atom {
        BackboneAtom::Nitrogen => 0,
        BackboneAtom::CarbonAlpha => 1,
        BackboneAtom::Carbon => 2,
    }
}

/// Per-atom velocities in picometres per femtosecond, index-aligned with the chain.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AtomVelocities {
    residues: Vec<[Vector3<f64>; 3]>,
}

impl AtomVelocities {
    pub(crate) fn zeros(len: usize) -> Self {
        Self {
            residues: vec![[Vector3::zeros(); 3]; len],
        }
    }

    pub(crate) fn get(&self, index: usize, atom: BackboneAtom) -> Option<Vector3<f64>> {
        self.residues.get(index).map(|v| v[slot(atom)])
    }

    pub(crate) fn is_at_rest(&self) -> bool {
        self.residues.iter().flatten().all(|v| *v == Vector3::zeros())
    }
}

/// Advances every backbone atom by one explicit Euler step.
///
/// Velocities are updated from the forces first and positions from the new
/// velocities after, each atom independently. With velocity reset enabled the
/// velocities are zeroed once the displacement has been applied. The first residue
/// whose coordinates become non-finite aborts the step.
pub(crate) fn advance(
    chain: &mut Chain,
    velocities: &mut AtomVelocities,
    forces: &ForceMap,
    config: &SimulationConfig,
    step: u64,
) -> Result<(), EngineError> {
    if forces.len() != chain.len() || velocities.residues.len() != chain.len() {
        return Err(EngineError::Internal(format!(
            "force map ({}) and velocities ({}) do not match chain length {}",
            forces.len(),
            velocities.residues.len(),
            chain.len()
        )));
    }

    let dt = config.time_step_fs;
    let inverse_mass = 1.0 / config.atom_mass;

    for (index, ((residue, record), velocity)) in chain
        .residues_mut()
        .iter_mut()
        .zip(forces.iter())
        .zip(velocities.residues.iter_mut())
        .enumerate()
    {
        for atom in BackboneAtom::ALL {
            let position = residue
                .position_mut(atom)
                .ok_or(EngineError::Unpositioned { residue: index })?;
            let v = &mut velocity[slot(atom)];
            *v += record.get(atom) * (inverse_mass * dt);
            *position += *v * dt;
            if config.reset_velocity {
                *v = Vector3::zeros();
            }
            if !(position.x.is_finite() && position.y.is_finite() && position.z.is_finite()) {
                return Err(EngineError::NumericalInstability {
                    residue: index,
                    step,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::forcefield::record::ForceRecord;
    use crate::core::models::amino_acid::AminoAcid;
    use crate::core::models::residue::Residue;
    use crate::engine::config::SimulationConfigBuilder;
    use nalgebra::Point3;

    fn config(reset: bool) -> SimulationConfig {
        SimulationConfigBuilder::new()
            .duration_fs(10.0)
            .time_step_fs(2.0)
            .atom_mass(2.0)
            .reset_velocity(reset)
            .build()
            .unwrap()
    }

    fn single_residue() -> Chain {
        Chain::from_residues(vec![Residue::with_positions(
            AminoAcid::Alanine,
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(147.0, 0.0, 0.0),
            Point3::new(147.0, 152.0, 0.0),
        )])
    }

    fn push_nitrogen(x: f64) -> ForceMap {
        ForceMap::from_records(vec![ForceRecord::new(
            Vector3::new(x, 0.0, 0.0),
            Vector3::zeros(),
            Vector3::zeros(),
        )])
    }

    #[test]
    fn euler_step_moves_by_force_over_mass_times_dt_squared() {
        let mut chain = single_residue();
        let mut velocities = AtomVelocities::zeros(1);
        advance(&mut chain, &mut velocities, &push_nitrogen(1.0), &config(false), 1).unwrap();

        assert_eq!(chain.residues()[0].nitrogen, Some(Point3::new(2.0, 0.0, 0.0)));
        assert_eq!(chain.residues()[0].carbon_alpha, Some(Point3::new(147.0, 0.0, 0.0)));
        assert_eq!(
            velocities.get(0, BackboneAtom::Nitrogen),
            Some(Vector3::new(1.0, 0.0, 0.0))
        );
    }

    #[test]
    fn momentum_carries_over_without_reset() {
        let mut chain = single_residue();
        let mut velocities = AtomVelocities::zeros(1);
        let config = config(false);
        advance(&mut chain, &mut velocities, &push_nitrogen(1.0), &config, 1).unwrap();
        advance(&mut chain, &mut velocities, &ForceMap::zeros(1), &config, 2).unwrap();

        assert_eq!(chain.residues()[0].nitrogen, Some(Point3::new(4.0, 0.0, 0.0)));
    }

    #[test]
    fn reset_zeroes_velocities_after_each_step() {
        let mut chain = single_residue();
        let mut velocities = AtomVelocities::zeros(1);
        let config = config(true);
        advance(&mut chain, &mut velocities, &push_nitrogen(1.0), &config, 1).unwrap();
        assert!(velocities.is_at_rest());
        advance(&mut chain, &mut velocities, &ForceMap::zeros(1), &config, 2).unwrap();

        assert_eq!(chain.residues()[0].nitrogen, Some(Point3::new(2.0, 0.0, 0.0)));
    }

    #[test]
    fn non_finite_force_reports_instability() {
        let mut chain = single_residue();
        let mut velocities = AtomVelocities::zeros(1);
        let result = advance(
            &mut chain,
            &mut velocities,
            &push_nitrogen(f64::NAN),
            &config(true),
            9,
        );
        assert!(matches!(
            result,
            Err(EngineError::NumericalInstability { residue: 0, step: 9 })
        ));
    }

    #[test]
    fn mismatched_force_map_is_an_internal_error() {
        let mut chain = single_residue();
        let mut velocities = AtomVelocities::zeros(1);
        let result = advance(
            &mut chain,
            &mut velocities,
            &ForceMap::zeros(2),
            &config(true),
            1,
        );
        assert!(matches!(result, Err(EngineError::Internal(_))));
    }
}
