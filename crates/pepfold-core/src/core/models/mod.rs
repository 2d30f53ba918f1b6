//! # Core Models Module
//!
//! Data structures describing a single peptide chain at backbone resolution.
//!
//! ## Key Components
//!
//! - [`amino_acid`] - The closed set of the 20 standard amino acids and their codes
//! - [`element`] - Backbone elements and their covalent radii
//! - [`residue`] - A residue with optional N, Cα, C positions and optional dihedral angles
//! - [`chain`] - An ordered, index-addressed sequence of residues sharing one frame
//!
//! ## Usage
//!
//! ```
//! use pepfold::core::models::chain::Chain;
//!
//! let chain = Chain::from_sequence("AGV").unwrap();
//! assert_eq!(chain.len(), 3);
//! assert!(!chain.is_fully_positioned());
//! ```

pub mod amino_acid;
pub mod chain;
pub mod element;
pub mod residue;
