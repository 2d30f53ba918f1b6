//! Geometric primitives shared by reconstruction, measurement and force evaluation.

pub mod geometry;
