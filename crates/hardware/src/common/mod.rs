//! Common utilities and types shared by the predictor structures.
//!
//! This module provides the building blocks the prediction tables are made of.
//! It includes:
//! 1. **Ring Buffer:** A fixed-capacity ring with a single wrapping index (RAS storage).
//! 2. **Direct Table:** A fixed-size table addressed by a hash modulo its length.
//! 3. **Error Handling:** Configuration, trace, and simulation error types.

/// Error types for configuration, trace parsing, and trace replay.
pub mod error;

/// Fixed-capacity ring buffer with a single read/write index.
pub mod ring;

/// Fixed-size, hash-addressed lookup table.
pub mod table;

pub use error::{ConfigError, SimError, TraceError};
pub use ring::RingBuffer;
pub use table::DirectTable;
