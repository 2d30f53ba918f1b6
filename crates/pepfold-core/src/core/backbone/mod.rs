//! # Backbone Reconstruction
//!
//! Builds N, Cα and C coordinates of a chain from ideal bond lengths, fixed bond angles
//! and the residues' dihedral angles, walking the chain from its first residue.
//!
//! Bond lengths are sums of covalent radii (N-C 147 pm, C-C 152 pm). Bond angles are
//! fixed at Cα-C-N 116.2°, C-N-Cα 121.7° and N-Cα-C 111.2°.

pub mod positioner;
