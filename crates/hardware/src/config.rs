//! Configuration system for the branch target prediction core.
//!
//! This module defines the configuration structures used to size the predictor
//! and the host model around it. It provides:
//! 1. **Defaults:** Baseline table geometry (1024×8 BTB, 4096-entry indirect table, 64-entry RAS).
//! 2. **Structures:** General (host model) and predictor (table geometry) sections.
//! 3. **Validation:** Rejection of geometry the tables cannot be built with.
//!
//! Configuration is supplied as JSON (`Config::from_json`) or built with `Config::default()`.

use serde::{Deserialize, Serialize};

use crate::common::error::{ConfigError, SimError};
use crate::core::units::bru::btb::BtbEntry;

/// Default configuration constants.
///
/// These values define the baseline predictor when not explicitly overridden
/// in a JSON configuration file.
mod defaults {
    /// Number of BTB sets.
    pub const BTB_SETS: usize = 1024;

    /// BTB associativity (ways per set).
    pub const BTB_WAYS: usize = 8;

    /// Number of entries in the indirect target table.
    ///
    /// The conditional history register is `log2` of this many bits wide.
    pub const INDIRECT_SIZE: usize = 4096;

    /// Return address stack capacity.
    pub const RAS_SIZE: usize = 64;

    /// Number of call-size tracker entries (10-bit hash).
    pub const CALL_SIZE_TRACKERS: usize = 1024;

    /// Number of simulated cores in the host model.
    pub const NUM_CORES: usize = 1;
}

/// Root configuration.
///
/// # Examples
///
/// ```
/// use btbsim_core::config::Config;
///
/// let json = r#"{
///     "general": { "num_cores": 2 },
///     "predictor": { "btb_sets": 256, "btb_ways": 4 }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.general.num_cores, 2);
/// assert_eq!(config.predictor.btb_sets, 256);
/// assert_eq!(config.predictor.ras_size, 64);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Host model settings
    #[serde(default)]
    pub general: GeneralConfig,
    /// Predictor table geometry
    #[serde(default)]
    pub predictor: PredictorConfig,
}

impl Config {
    /// Parses a JSON configuration and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Json`] if the text is not a valid configuration
    /// document, or [`SimError::Config`] if the geometry is invalid.
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every section.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.general.validate()?;
        self.predictor.validate()
    }
}

/// Host model settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Number of simulated cores, each owning an independent predictor
    #[serde(default = "GeneralConfig::default_num_cores")]
    pub num_cores: usize,

    /// Emit a debug-level event for every prediction and update
    #[serde(default)]
    pub trace_predictions: bool,
}

impl GeneralConfig {
    /// Returns the default core count.
    fn default_num_cores() -> usize {
        defaults::NUM_CORES
    }

    /// Checks the core count.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoCores`] if `num_cores` is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_cores == 0 {
            return Err(ConfigError::NoCores);
        }
        Ok(())
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            num_cores: defaults::NUM_CORES,
            trace_predictions: false,
        }
    }
}

/// Predictor table geometry.
///
/// Every field corresponds to one argument of the one-time predictor
/// initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictorConfig {
    /// Number of BTB sets
    #[serde(default = "PredictorConfig::default_btb_sets")]
    pub btb_sets: usize,

    /// BTB ways per set
    #[serde(default = "PredictorConfig::default_btb_ways")]
    pub btb_ways: usize,

    /// Indirect target table entries
    #[serde(default = "PredictorConfig::default_indirect_size")]
    pub indirect_size: usize,

    /// Return address stack capacity
    #[serde(default = "PredictorConfig::default_ras_size")]
    pub ras_size: usize,

    /// Call-size tracker entries (power of two; hashed by masking)
    #[serde(default = "PredictorConfig::default_call_size_trackers")]
    pub call_size_trackers: usize,
}

impl PredictorConfig {
    /// Returns the default number of BTB sets.
    fn default_btb_sets() -> usize {
        defaults::BTB_SETS
    }

    /// Returns the default BTB associativity.
    fn default_btb_ways() -> usize {
        defaults::BTB_WAYS
    }

    /// Returns the default indirect table size.
    fn default_indirect_size() -> usize {
        defaults::INDIRECT_SIZE
    }

    /// Returns the default RAS capacity.
    fn default_ras_size() -> usize {
        defaults::RAS_SIZE
    }

    /// Returns the default call-size tracker count.
    fn default_call_size_trackers() -> usize {
        defaults::CALL_SIZE_TRACKERS
    }

    /// Checks that every table can be built.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroSize`] for any zero dimension and
    /// [`ConfigError::NotPowerOfTwo`] if `call_size_trackers` cannot be
    /// addressed by masking. Returns [`ConfigError::TooLarge`] if a table's
    /// storage would exceed `isize::MAX` bytes, including a
    /// `btb_sets * btb_ways` product that overflows `usize`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let dims = [
            ("btb_sets", self.btb_sets),
            ("btb_ways", self.btb_ways),
            ("indirect_size", self.indirect_size),
            ("ras_size", self.ras_size),
            ("call_size_trackers", self.call_size_trackers),
        ];
        if let Some(&(field, _)) = dims.iter().find(|(_, v)| *v == 0) {
            return Err(ConfigError::ZeroSize { field });
        }
        if !self.call_size_trackers.is_power_of_two() {
            return Err(ConfigError::NotPowerOfTwo {
                field: "call_size_trackers",
                value: self.call_size_trackers,
            });
        }

        let tables = [
            (
                "btb_sets * btb_ways",
                self.btb_sets.checked_mul(self.btb_ways),
                size_of::<BtbEntry>(),
            ),
            ("indirect_size", Some(self.indirect_size), size_of::<u64>()),
            ("ras_size", Some(self.ras_size), size_of::<u64>()),
            (
                "call_size_trackers",
                Some(self.call_size_trackers),
                size_of::<u64>(),
            ),
        ];
        for (field, entries, entry_bytes) in tables {
            if !fits_allocation(entries, entry_bytes) {
                return Err(ConfigError::TooLarge { field });
            }
        }
        Ok(())
    }
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            btb_sets: defaults::BTB_SETS,
            btb_ways: defaults::BTB_WAYS,
            indirect_size: defaults::INDIRECT_SIZE,
            ras_size: defaults::RAS_SIZE,
            call_size_trackers: defaults::CALL_SIZE_TRACKERS,
        }
    }
}

/// Whether `entries` slots of `entry_bytes` each fit in one `Vec`.
///
/// `None` stands for an entry count that already overflowed `usize`.
fn fits_allocation(entries: Option<usize>, entry_bytes: usize) -> bool {
    entries
        .and_then(|n| n.checked_mul(entry_bytes))
        .is_some_and(|bytes| bytes <= isize::MAX as usize)
}
