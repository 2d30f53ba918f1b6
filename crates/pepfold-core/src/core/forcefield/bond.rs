use super::contributor::{ForceContributor, ForceError, backbone_snapshot};
use super::record::ForceMap;
use crate::core::backbone::positioner::ideal_bond_length;
use crate::core::models::chain::Chain;
use crate::core::models::residue::BackboneAtom;
use crate::core::utils::geometry::GeometryError;
use nalgebra::Point3;

/// Default spring constant, force units per picometre of stretch.
pub const DEFAULT_BOND_STIFFNESS: f64 = 0.05;

/// Hookean springs along every backbone bond: N-Cα and Cα-C within each residue and
/// C-N between neighbours. Each spring pushes its two atoms equally and oppositely
/// toward the covalent-radius bond length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BondForce {
    stiffness: f64,
}

impl Default for BondForce {
    fn default() -> Self {
        Self::new(DEFAULT_BOND_STIFFNESS)
    }
}

impl BondForce {
    pub const NAME: &'static str = "bond";

    pub fn new(stiffness: f64) -> Self {
        Self { stiffness }
    }

    pub fn stiffness(&self) -> f64 {
        self.stiffness
    }

    fn spring(
        &self,
        forces: &mut ForceMap,
        (index_a, atom_a, position_a): (usize, BackboneAtom, Point3<f64>),
        (index_b, atom_b, position_b): (usize, BackboneAtom, Point3<f64>),
        error_index: usize,
    ) -> Result<(), ForceError> {
        let bond = position_b - position_a;
        let length = bond.norm();
        if length <= f64::EPSILON {
            return Err(ForceError::Geometry {
                index: error_index,
                source: GeometryError::ZeroLength,
            });
        }
        let stretch = length - ideal_bond_length(atom_a, atom_b);
        let force = bond * (self.stiffness * stretch / length);
        forces.accumulate(index_a, atom_a, force);
        forces.accumulate(index_b, atom_b, -force);
        Ok(())
    }
}

impl ForceContributor for BondForce {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn compute_forces(&self, chain: &Chain) -> Result<ForceMap, ForceError> {
        use BackboneAtom::{Carbon, CarbonAlpha, Nitrogen};

        let backbones = backbone_snapshot(chain)?;
        let mut forces = ForceMap::zeros(backbones.len());

        for (i, backbone) in backbones.iter().enumerate() {
            self.spring(
                &mut forces,
                (i, Nitrogen, backbone.nitrogen),
                (i, CarbonAlpha, backbone.carbon_alpha),
                i,
            )?;
            self.spring(
                &mut forces,
                (i, CarbonAlpha, backbone.carbon_alpha),
                (i, Carbon, backbone.carbon),
                i,
            )?;
            if let Some(next) = backbones.get(i + 1) {
                self.spring(
                    &mut forces,
                    (i, Carbon, backbone.carbon),
                    (i + 1, Nitrogen, next.nitrogen),
                    i + 1,
                )?;
            }
        }
        Ok(forces)
    }
}
