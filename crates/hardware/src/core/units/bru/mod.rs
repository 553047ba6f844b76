//! Branch target prediction unit.
//!
//! This module contains the structures that predict where a branch goes:
//! the set-associative branch target table (BTB), the return address stack
//! (RAS) with its call-size tracker, and the history-indexed indirect target
//! table. [`BranchTargetPredictor`] ties them together behind the
//! [`TargetPredictor`] trait. Branch directions are predicted elsewhere.

pub use self::branch_predictor::{BranchKind, Prediction, TargetPredictor};
pub use self::predictor::BranchTargetPredictor;

/// Target predictor trait, branch kinds, and predictions.
pub mod branch_predictor;

/// Branch Target Buffer for direct branches, direct calls and jumps.
pub mod btb;

/// Per-call-site call instruction size estimates.
pub mod call_size;

/// Conditional outcome shift register.
pub mod history;

/// History-indexed table of indirect branch targets.
pub mod indirect;

/// Root predictor dispatching by branch kind.
pub mod predictor;

/// Return Address Stack for predicting return addresses.
pub mod ras;
