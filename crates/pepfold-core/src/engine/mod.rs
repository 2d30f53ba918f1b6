//! # Engine Module
//!
//! Time-stepped folding of positioned chains under a set of force contributors.
//!
//! ## Overview
//!
//! The engine owns everything that has state or runs over time. It validates
//! simulation parameters, integrates the summed pseudo-forces step by step, tracks the
//! lifecycle of a run, and reports its outcome either synchronously or through a
//! single-shot completion channel.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Validated simulation and fold parameters
//! - **Simulation** ([`simulator`]) - The step loop, threaded runs and their handles
//! - **Cancellation** ([`cancellation`]) - Cooperative stop flag polled at step boundaries
//! - **State Tracking** ([`state`]) - Lifecycle states, summaries and failure values
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events
//! - **Error Handling** ([`error`]) - Engine-level errors aggregating the core layers
//!
//! ## Lifecycle
//!
//! A run moves `Idle → Running` when its thread starts and ends in exactly one of
//! `Completed`, `Cancelled` or `Failed`. The completion channel fires once, after the
//! terminal state has been recorded.

pub mod cancellation;
pub mod config;
pub mod error;
pub(crate) mod integrator;
pub mod progress;
pub mod simulator;
pub mod state;
