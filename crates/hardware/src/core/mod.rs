//! Per-core prediction state.
//!
//! Each simulated core owns one instance of every structure in this module;
//! nothing here is shared between cores.

/// Prediction units (branch target prediction).
pub mod units;

pub use self::units::bru::BranchTargetPredictor;
