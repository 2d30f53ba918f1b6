//! # PepFold Core Library
//!
//! A library for backbone-level protein structure reconstruction and
//! statistically-guided conformational folding of approximate peptide chains.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture so that geometry, force evaluation
//! and time integration can be tested and reused independently.
//!
//! - **[`core`]: The Foundation.** Stateless data models (`Chain`, `Residue`, `AminoAcid`),
//!   pure vector geometry (local-frame atom placement, dihedral measurement and gradients),
//!   angular-preference surfaces and the force contributors that turn geometry into
//!   per-atom pseudo-forces.
//!
//! - **[`engine`]: The Logic Core.** The stateful layer. It owns simulation configuration,
//!   the folding simulator state machine, cooperative cancellation, progress reporting and
//!   the error taxonomy that aggregates every lower-level failure.
//!
//! - **[`workflows`]: The Public API.** End-to-end entry points that tie `core` and `engine`
//!   together: reconstructing a backbone from a sequence, and folding it under a
//!   Ramachandran preference source with optional bond and compacting forces.
//!
//! ## Units
//!
//! Positions are in picometres, time in femtoseconds and angles in degrees at every public
//! boundary. Forces are empirical pseudo-units bounded by the force scale constants in
//! [`core::forcefield`].

pub mod core;
pub mod engine;
pub mod workflows;
