//! # Workflows Module
//!
//! End-to-end entry points that turn a sequence into a positioned or folded chain.
//!
//! ## Overview
//!
//! Workflows are the top-level API of PepFold. Each one handles input validation,
//! resource loading, progress reporting and result assembly, so callers only deal
//! with a sequence (or a partially positioned chain), a configuration, and a result.
//!
//! - **Build Workflow** ([`build`]) - Backbone reconstruction from a sequence and
//!   uniform dihedral angles
//! - **Fold Workflow** ([`fold`]) - Reconstruction followed by a Ramachandran-guided
//!   folding simulation, with before/after angle and compactness measurements

pub mod build;
pub mod fold;
