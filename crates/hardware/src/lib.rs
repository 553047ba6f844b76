//! Branch target prediction core for cycle-level CPU simulators.
//!
//! This crate predicts next-fetch addresses for branches so that a simulated
//! pipeline can speculate before a branch resolves. It implements:
//! 1. **BTB:** A set-associative branch target table with LRU replacement and always-taken tracking.
//! 2. **RAS:** A circular return address stack with self-calibrating call-size learning.
//! 3. **Indirect:** A history-indexed table of indirect branch targets.
//! 4. **Host model:** Configuration, statistics, and a multi-core trace replayer.
//!
//! Branch directions are not predicted here; a separate direction predictor is assumed.

/// Common types (ring buffer, direct-mapped table, errors).
pub mod common;
/// Predictor configuration (defaults, geometry, validation).
pub mod config;
/// Per-core prediction state (branch target prediction unit).
pub mod core;
/// Trace parsing and multi-core replay.
pub mod sim;
/// Prediction statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or `Config::from_json`.
pub use crate::config::Config;
/// Per-core predictor; construct with `BranchTargetPredictor::new`.
pub use crate::core::units::bru::BranchTargetPredictor;
/// Branch classes, predictions, and the host-facing predictor trait.
pub use crate::core::units::bru::{BranchKind, Prediction, TargetPredictor};
/// Trace replayer owning one predictor per simulated core.
pub use crate::sim::Simulator;
