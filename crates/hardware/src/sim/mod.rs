//! Trace-driven host model.
//!
//! Stands in for the pipeline that would normally drive the predictor. It
//! provides:
//! 1. **Trace parsing:** A line-oriented text format of resolved branches.
//! 2. **Simulation:** Per-core predictors and cycle counters, scored as the trace is replayed.

/// Branch trace records and parser.
pub mod trace;

/// Multi-core trace replay.
pub mod simulator;

pub use simulator::{SimCore, Simulator};
pub use trace::{BranchRecord, TraceReader};
