use super::contributor::{ForceContributor, ForceError, backbone_snapshot};
use super::record::{ForceMap, ForceRecord};
use crate::core::measurements::angles::{BackboneAngles, measure_residue};
use crate::core::models::chain::Chain;
use crate::core::models::residue::BackbonePositions;
use crate::core::ramachandran::AngularPreferenceSource;
use crate::core::utils::geometry::{GeometryError, try_normalize};
use std::sync::Arc;
use tracing::trace;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Force magnitude exerted on each pushed atom per unit of preference gradient.
pub const DIHEDRAL_FORCE_SCALE: f64 = 1.0;
/// Magnitude of the force restoring a non-planar peptide bond.
pub const OMEGA_RESTORING_FORCE: f64 = 1.0;
/// Omega deviations smaller than this, in degrees, exert no force.
pub const OMEGA_TOLERANCE_DEG: f64 = 1e-6;

/// Forces one residue's dihedral terms exert on itself and its two neighbours.
#[derive(Debug, Default, Clone, Copy)]
struct LocalForces {
    previous: ForceRecord,
    current: ForceRecord,
    next: ForceRecord,
}

/// Drives backbone dihedrals toward preferred (phi, psi) regions and keeps the peptide
/// bond planar.
///
/// For each residue with both phi and psi defined, the preference gradient from the
/// source pushes the two atoms outside each rotation axis: the carbons on either side
/// of N-Cα for phi and the nitrogens on either side of Cα-C for psi. Each push is
/// perpendicular to its bond plane, oriented so that a positive gradient component
/// raises the angle.
/// For each residue with a defined omega, a fixed-magnitude force on both Cα atoms of
/// the peptide bond rotates omega back toward ±180°.
pub struct RamachandranForceField {
    source: Arc<dyn AngularPreferenceSource>,
}

impl RamachandranForceField {
    pub const NAME: &'static str = "ramachandran";

    pub fn new(source: Arc<dyn AngularPreferenceSource>) -> Self {
        Self { source }
    }

    pub fn source(&self) -> &Arc<dyn AngularPreferenceSource> {
        &self.source
    }

    fn residue_forces(
        &self,
        chain: &Chain,
        backbones: &[BackbonePositions],
        index: usize,
    ) -> Result<LocalForces, ForceError> {
        let previous = index.checked_sub(1).map(|i| &backbones[i]);
        let current = &backbones[index];
        let next = backbones.get(index + 1);
        let angles = measure_residue(previous, Some(current), next);
        let geometry = |source: GeometryError| ForceError::Geometry { index, source };

        let mut local = LocalForces::default();

        if let (Some(previous), Some(omega)) = (previous, angles.omega) {
            apply_omega_force(previous, current, omega, &mut local).map_err(geometry)?;
        }

        if let BackboneAngles {
            phi: Some(phi),
            psi: Some(psi),
            ..
        } = angles
        {
            let amino_acid = chain.residues()[index].amino_acid();
            let gradient = self
                .source
                .gradient_at(amino_acid, phi, psi)
                .ok_or(ForceError::MissingPreferenceData { amino_acid })?;

            if let (Some(previous), Some(next)) = (previous, next) {
                apply_phi_force(previous, current, gradient.d_phi, &mut local).map_err(geometry)?;
                apply_psi_force(current, next, gradient.d_psi, &mut local).map_err(geometry)?;
            }
            trace!(
                index,
                phi,
                psi,
                d_phi = gradient.d_phi,
                d_psi = gradient.d_psi,
                "Applied preference gradient."
            );
        }

        Ok(local)
    }
}

fn apply_omega_force(
    previous: &BackbonePositions,
    current: &BackbonePositions,
    omega: f64,
    local: &mut LocalForces,
) -> Result<(), GeometryError> {
    let deviation = if omega < 0.0 {
        -180.0 - omega
    } else {
        180.0 - omega
    };
    if deviation.abs() < OMEGA_TOLERANCE_DEG {
        return Ok(());
    }
    let magnitude = deviation.signum() * OMEGA_RESTORING_FORCE;

    let carbon_to_nitrogen = current.nitrogen - previous.carbon;
    let carbon_to_carbon_alpha = previous.carbon_alpha - previous.carbon;
    let nitrogen_to_carbon_alpha = current.carbon_alpha - current.nitrogen;

    let previous_direction = try_normalize(&carbon_to_carbon_alpha.cross(&carbon_to_nitrogen))?;
    let current_direction = try_normalize(&carbon_to_nitrogen.cross(&nitrogen_to_carbon_alpha))?;

    local.previous.carbon_alpha += previous_direction * magnitude;
    local.current.carbon_alpha += current_direction * magnitude;
    Ok(())
}

/// Pushes C(i-1) and C(i) about the N-Cα axis.
fn apply_phi_force(
    previous: &BackbonePositions,
    current: &BackbonePositions,
    d_phi: f64,
    local: &mut LocalForces,
) -> Result<(), GeometryError> {
    let nitrogen_to_carbon_alpha = current.carbon_alpha - current.nitrogen;
    let carbon_to_nitrogen = current.nitrogen - previous.carbon;
    let carbon_alpha_to_carbon = current.carbon - current.carbon_alpha;

    let previous_direction =
        try_normalize(&nitrogen_to_carbon_alpha.cross(&carbon_to_nitrogen))?;
    let current_direction =
        try_normalize(&nitrogen_to_carbon_alpha.cross(&carbon_alpha_to_carbon))?;

    let magnitude = d_phi * DIHEDRAL_FORCE_SCALE;
    local.previous.carbon += previous_direction * magnitude;
    local.current.carbon += current_direction * magnitude;
    Ok(())
}

/// Pushes N(i) and N(i+1) about the Cα-C axis.
fn apply_psi_force(
    current: &BackbonePositions,
    next: &BackbonePositions,
    d_psi: f64,
    local: &mut LocalForces,
) -> Result<(), GeometryError> {
    let nitrogen_to_carbon_alpha = current.carbon_alpha - current.nitrogen;
    let carbon_alpha_to_carbon = current.carbon - current.carbon_alpha;
    let carbon_to_nitrogen = next.nitrogen - current.carbon;

    let current_direction =
        try_normalize(&carbon_alpha_to_carbon.cross(&nitrogen_to_carbon_alpha))?;
    let next_direction = try_normalize(&carbon_alpha_to_carbon.cross(&carbon_to_nitrogen))?;

    let magnitude = d_psi * DIHEDRAL_FORCE_SCALE;
    local.current.nitrogen += current_direction * magnitude;
    local.next.nitrogen += next_direction * magnitude;
    Ok(())
}

impl ForceContributor for RamachandranForceField {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn compute_forces(&self, chain: &Chain) -> Result<ForceMap, ForceError> {
        let backbones = backbone_snapshot(chain)?;

        #[cfg(not(feature = "parallel"))]
        let indices = 0..backbones.len();
        #[cfg(feature = "parallel")]
        let indices = (0..backbones.len()).into_par_iter();

        let locals = indices
            .map(|index| self.residue_forces(chain, &backbones, index))
            .collect::<Result<Vec<_>, _>>()?;

        let mut forces = ForceMap::zeros(backbones.len());
        for (index, local) in locals.into_iter().enumerate() {
            if index > 0 {
                forces.add_record(index - 1, local.previous);
            }
            forces.add_record(index, local.current);
            if index + 1 < backbones.len() {
                forces.add_record(index + 1, local.next);
            }
        }
        Ok(forces)
    }
}
