//! Prediction units.
//!
//! The core models only the front-end unit that supplies next-fetch
//! addresses for branches; execution units live in the host simulator.

/// Branch target prediction unit (BTB, RAS, indirect target table).
pub mod bru;
