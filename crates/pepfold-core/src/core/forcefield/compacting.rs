use super::contributor::{ForceContributor, ForceError, backbone_snapshot};
use super::record::ForceMap;
use crate::core::measurements::compactness::centroid;
use crate::core::models::chain::Chain;
use crate::core::models::residue::BackboneAtom;

/// Pulls every backbone atom toward the chain centroid.
///
/// The magnitude is `strength · min(1, d / Rg)`, where `d` is the atom's distance from
/// the centroid and `Rg` the radius of gyration. Atoms outside one radius of gyration
/// feel the full strength. Atoms inside it feel proportionally less.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompactingForce {
    strength: f64,
}

impl CompactingForce {
    pub const NAME: &'static str = "compacting";

    pub fn new(strength: f64) -> Self {
        Self { strength }
    }

    pub fn strength(&self) -> f64 {
        self.strength
    }
}

impl ForceContributor for CompactingForce {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn compute_forces(&self, chain: &Chain) -> Result<ForceMap, ForceError> {
        let backbones = backbone_snapshot(chain)?;
        let mut forces = ForceMap::zeros(backbones.len());

        let points = || {
            backbones
                .iter()
                .flat_map(|b| BackboneAtom::ALL.into_iter().map(move |atom| b.get(atom)))
        };
        let Some(center) = centroid(points()) else {
            return Ok(forces);
        };
        let atom_count = (backbones.len() * BackboneAtom::ALL.len()) as f64;
        let radius_of_gyration =
            (points().map(|p| (p - center).norm_squared()).sum::<f64>() / atom_count).sqrt();
        if radius_of_gyration <= f64::EPSILON {
            return Ok(forces);
        }

        for (index, backbone) in backbones.iter().enumerate() {
            for atom in BackboneAtom::ALL {
                let offset = center - backbone.get(atom);
                let distance = offset.norm();
                if distance <= f64::EPSILON {
                    continue;
                }
                let magnitude = self.strength * (distance / radius_of_gyration).min(1.0);
                forces.accumulate(index, atom, offset * (magnitude / distance));
            }
        }
        Ok(forces)
    }
}
