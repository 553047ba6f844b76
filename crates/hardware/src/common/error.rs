//! Error definitions.
//!
//! The predictor itself is total: every prediction and update succeeds. Errors
//! only arise at the edges of the crate. This module defines:
//! 1. **Configuration Errors:** Table geometry that cannot be built.
//! 2. **Trace Errors:** Malformed branch trace input, tagged with its line number.
//! 3. **Simulation Errors:** The umbrella type returned by the host model and CLI.

use thiserror::Error;

/// Invalid predictor or simulation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A table dimension was configured as zero.
    #[error("{field} must be non-zero")]
    ZeroSize {
        /// Name of the offending configuration field.
        field: &'static str,
    },

    /// A table dimension that is addressed by bit masking is not a power of two.
    #[error("{field} must be a power of two (got {value})")]
    NotPowerOfTwo {
        /// Name of the offending configuration field.
        field: &'static str,
        /// The configured value.
        value: usize,
    },

    /// A table would need more memory than a single allocation can address.
    #[error("{field} is too large to allocate")]
    TooLarge {
        /// Name of the offending configuration field.
        field: &'static str,
    },

    /// The simulation was configured without any cores.
    #[error("num_cores must be at least 1")]
    NoCores,
}

/// Malformed branch trace input.
///
/// Line numbers are 1-based and refer to the physical line in the trace.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The underlying reader failed.
    #[error("trace I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A required column is missing.
    #[error("line {line}: missing {field}")]
    MissingField {
        /// Line number of the record.
        line: usize,
        /// Name of the missing column.
        field: &'static str,
    },

    /// An address column is not a hexadecimal number.
    #[error("line {line}: invalid address {value:?}")]
    BadAddress {
        /// Line number of the record.
        line: usize,
        /// The text that failed to parse.
        value: String,
    },

    /// The outcome column is not one of the recognised spellings.
    #[error("line {line}: invalid outcome {value:?} (expected T or N)")]
    BadOutcome {
        /// Line number of the record.
        line: usize,
        /// The text that failed to parse.
        value: String,
    },

    /// The kind column does not name a branch kind.
    #[error("line {line}: unknown branch kind {value:?}")]
    UnknownKind {
        /// Line number of the record.
        line: usize,
        /// The text that failed to parse.
        value: String,
    },

    /// The core column is not a decimal integer.
    #[error("line {line}: invalid core id {value:?}")]
    BadCore {
        /// Line number of the record.
        line: usize,
        /// The text that failed to parse.
        value: String,
    },

    /// The record has columns after the core id.
    #[error("line {line}: unexpected trailing field {value:?}")]
    TrailingField {
        /// Line number of the record.
        line: usize,
        /// The first surplus column.
        value: String,
    },

    /// The record targets a core the simulation does not have.
    #[error("line {line}: core {core} out of range (simulating {cores} cores)")]
    CoreOutOfRange {
        /// Line number of the record.
        line: usize,
        /// The requested core.
        core: usize,
        /// Number of simulated cores.
        cores: usize,
    },
}

/// Top-level error returned by the host model and the command-line driver.
#[derive(Debug, Error)]
pub enum SimError {
    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Invalid trace input.
    #[error(transparent)]
    Trace(#[from] TraceError),

    /// Configuration JSON could not be parsed.
    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
}
