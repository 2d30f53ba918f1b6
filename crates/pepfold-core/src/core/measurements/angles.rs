use crate::core::models::chain::Chain;
use crate::core::models::residue::{BackbonePositions, Residue};
use crate::core::utils::geometry::dihedral_angle;

/// Measured backbone dihedrals of one residue, in degrees.
///
/// An angle is `None` when a neighbouring residue it depends on is missing or not
/// fully positioned: the first residue has no phi or omega and the last has no psi.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BackboneAngles {
    pub phi: Option<f64>,
    pub psi: Option<f64>,
    pub omega: Option<f64>,
}

pub fn measure_residue(
    previous: Option<&BackbonePositions>,
    current: Option<&BackbonePositions>,
    next: Option<&BackbonePositions>,
) -> BackboneAngles {
    let Some(current) = current else {
        return BackboneAngles::default();
    };

    let phi = previous.map(|p| {
        dihedral_angle(
            &p.carbon,
            &current.nitrogen,
            &current.carbon_alpha,
            &current.carbon,
        )
    });
    let omega = previous.map(|p| {
        dihedral_angle(
            &p.carbon_alpha,
            &p.carbon,
            &current.nitrogen,
            &current.carbon_alpha,
        )
    });
    let psi = next.map(|n| {
        dihedral_angle(
            &current.nitrogen,
            &current.carbon_alpha,
            &current.carbon,
            &n.nitrogen,
        )
    });

    BackboneAngles { phi, psi, omega }
}

/// Measures phi, psi and omega for every residue of the chain, in chain order.
pub fn measure_backbone(backbones: &[Option<BackbonePositions>]) -> Vec<BackboneAngles> {
    (0..backbones.len())
        .map(|i| {
            let previous = i.checked_sub(1).and_then(|p| backbones[p].as_ref());
            let next = backbones.get(i + 1).and_then(Option::as_ref);
            measure_residue(previous, backbones[i].as_ref(), next)
        })
        .collect()
}

pub fn measure_chain(chain: &Chain) -> Vec<BackboneAngles> {
    let backbones: Vec<_> = chain.residues().iter().map(Residue::backbone).collect();
    measure_backbone(&backbones)
}

/// Overwrites every residue's stored angles with the measured ones.
///
/// Angles that cannot be measured are left as they were.
pub fn refresh_chain_angles(chain: &mut Chain) {
    let measured = measure_chain(chain);
    for (residue, angles) in chain.residues_mut().iter_mut().zip(measured) {
        if let Some(phi) = angles.phi {
            residue.phi = Some(phi);
        }
        if let Some(psi) = angles.psi {
            residue.psi = Some(psi);
        }
        if let Some(omega) = angles.omega {
            residue.omega = Some(omega);
        }
    }
}
