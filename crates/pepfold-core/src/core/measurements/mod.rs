//! # Measurements
//!
//! Read-only observations of a positioned chain: backbone dihedral angles
//! ([`angles`]) and overall compactness ([`compactness`]).

pub mod angles;
pub mod compactness;
