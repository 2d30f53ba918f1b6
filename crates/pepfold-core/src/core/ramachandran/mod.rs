//! # Angular Preference Surfaces
//!
//! A Ramachandran preference surface maps a residue's backbone dihedrals (phi, psi) to
//! the direction in which its statistical preference increases. The force field turns
//! that direction into cartesian pseudo-forces.
//!
//! ## Key Components
//!
//! - [`AngularPreferenceSurface`] - One surface, one gradient lookup
//! - [`AngularPreferenceSource`] - Per amino-acid type lookup used by the force field
//! - [`fixed::FixedTargetSurface`] - Pulls straight toward a target (phi, psi)
//! - [`empirical::EmpiricalSurface`] - Gradient of a binned empirical density
//! - [`table::PreferenceTable`] - Surfaces indexed by amino-acid ordinal
//!
//! Gradient components are dimensionless and bounded by 1 in magnitude.

pub mod empirical;
pub mod fixed;
pub mod table;

use crate::core::models::amino_acid::AminoAcid;
use std::fmt;

/// Direction of increasing preference in (phi, psi) space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PreferenceGradient {
    pub d_phi: f64,
    pub d_psi: f64,
}

impl PreferenceGradient {
    pub fn new(d_phi: f64, d_psi: f64) -> Self {
        Self { d_phi, d_psi }
    }

    #[inline]
    pub fn norm(&self) -> f64 {
        self.d_phi.hypot(self.d_psi)
    }

    /// Rescales the gradient to unit length if it is longer than that.
    pub fn clamped(self) -> Self {
        let norm = self.norm();
        if norm > 1.0 {
            Self::new(self.d_phi / norm, self.d_psi / norm)
        } else {
            self
        }
    }
}

pub trait AngularPreferenceSurface: Send + Sync + fmt::Debug {
    /// Gradient at the given dihedrals, in degrees.
    fn gradient_at(&self, phi: f64, psi: f64) -> PreferenceGradient;
}

pub trait AngularPreferenceSource: Send + Sync {
    /// Gradient for the given amino-acid type, or `None` if the source has no data
    /// for it.
    fn gradient_at(&self, amino_acid: AminoAcid, phi: f64, psi: f64)
    -> Option<PreferenceGradient>;

    fn covers(&self, amino_acid: AminoAcid) -> bool {
        self.gradient_at(amino_acid, 0.0, 0.0).is_some()
    }
}
