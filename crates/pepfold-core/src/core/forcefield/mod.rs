//! # Force Field Module
//!
//! Converts chain geometry into per-atom pseudo-forces for the folding simulator.
//!
//! ## Overview
//!
//! Forces here are not physical. They are empirical, unit-bounded pushes whose only
//! purpose is to move backbone dihedrals toward statistically favoured regions while
//! keeping the chain roughly intact:
//!
//! - **Ramachandran forces** turn the gradient of a (phi, psi) preference surface into
//!   torsional forces about N-Cα and Cα-C, and restore planar peptide bonds (omega)
//! - **Bond forces** pull bond lengths back toward their covalent-radius ideals
//! - **Compacting forces** draw every atom toward the chain centroid
//!
//! ## Key Components
//!
//! - [`record`] - Per-residue force accumulators and the chain-wide [`record::ForceMap`]
//! - [`contributor`] - The [`contributor::ForceContributor`] trait shared by all sources
//! - [`ramachandran`] - Preference-surface and omega-planarity forces
//! - [`bond`] - Hookean bond-length restoring forces
//! - [`compacting`] - Centroid-directed compacting forces
//!
//! ## Usage
//!
//! ```
//! use pepfold::core::backbone::positioner::position_chain;
//! use pepfold::core::forcefield::contributor::ForceContributor;
//! use pepfold::core::forcefield::ramachandran::RamachandranForceField;
//! use pepfold::core::models::chain::Chain;
//! use pepfold::core::ramachandran::fixed::FixedTargetSurface;
//! use nalgebra::Point3;
//! use std::sync::Arc;
//!
//! let mut chain = Chain::from_sequence("AAA").unwrap();
//! position_chain(&mut chain, Some(&Point3::origin())).unwrap();
//!
//! let field = RamachandranForceField::new(Arc::new(FixedTargetSurface::new(-60.0, -45.0)));
//! let forces = field.compute_forces(&chain).unwrap();
//! assert_eq!(forces.len(), chain.len());
//! ```

pub mod bond;
pub mod compacting;
pub mod contributor;
pub mod ramachandran;
pub mod record;
