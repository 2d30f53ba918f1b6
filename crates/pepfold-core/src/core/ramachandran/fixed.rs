use super::{AngularPreferenceSource, AngularPreferenceSurface, PreferenceGradient};
use crate::core::models::amino_acid::AminoAcid;
use crate::core::utils::geometry::wrap_degrees;

/// A surface whose preference peaks at a single (phi, psi) target.
///
/// The gradient is the shortest wrapped difference from the current angles to the
/// target, in radians, rescaled to unit length when it is longer than that. Near the
/// target it falls off linearly, so the pull fades as the residue arrives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedTargetSurface {
    target_phi: f64,
    target_psi: f64,
}

impl FixedTargetSurface {
    pub fn new(target_phi: f64, target_psi: f64) -> Self {
        Self {
            target_phi,
            target_psi,
        }
    }

    pub fn target(&self) -> (f64, f64) {
        (self.target_phi, self.target_psi)
    }
}

impl AngularPreferenceSurface for FixedTargetSurface {
    fn gradient_at(&self, phi: f64, psi: f64) -> PreferenceGradient {
        PreferenceGradient::new(
            wrap_degrees(self.target_phi - phi).to_radians(),
            wrap_degrees(self.target_psi - psi).to_radians(),
        )
        .clamped()
    }
}

/// One fixed target applies to every amino-acid type.
impl AngularPreferenceSource for FixedTargetSurface {
    fn gradient_at(
        &self,
        _amino_acid: AminoAcid,
        phi: f64,
        psi: f64,
    ) -> Option<PreferenceGradient> {
        Some(AngularPreferenceSurface::gradient_at(self, phi, psi))
    }
}
