//! # Core Module
//!
//! Stateless building blocks of the library: the chain data model, vector geometry,
//! backbone reconstruction, geometric measurements, angular-preference surfaces and the
//! force contributors evaluated by the simulator.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Amino acids, elements, residues and chains
//! - **Geometry** ([`utils`]) - Local-frame atom placement, dihedral angles and their gradients
//! - **Reconstruction** ([`backbone`]) - Building N, Cα and C positions from internal coordinates
//! - **Measurements** ([`measurements`]) - Backbone dihedrals and chain compactness
//! - **Preference Surfaces** ([`ramachandran`]) - Per-type (phi, psi) gradient lookups
//! - **Forces** ([`forcefield`]) - Per-residue pseudo-force contributors
//!
//! Nothing in this layer holds mutable state between calls. Every function is a pure
//! transformation of its inputs, which is what lets the simulator compute all forces
//! against one immutable snapshot of the chain before integrating.

pub mod backbone;
pub mod forcefield;
pub mod measurements;
pub mod models;
pub mod ramachandran;
pub mod utils;
