//! Simulator: replays branch traces through per-core predictors.
//!
//! Each core owns its predictor and its cycle counter outright; records are
//! routed by core id and never touch another core's state. For every record
//! the owning core advances its cycle, asks for a prediction, scores it against
//! the resolved branch, and then trains the predictor at the same cycle.

use std::io::BufRead;

use tracing::debug;

use super::trace::{BranchRecord, TraceReader};
use crate::common::error::{ConfigError, SimError, TraceError};
use crate::config::Config;
use crate::core::units::bru::{BranchTargetPredictor, Prediction, TargetPredictor};
use crate::stats::AccuracyStats;

/// One simulated core: a predictor and the cycle counter that timestamps it.
#[derive(Debug)]
pub struct SimCore<P> {
    id: usize,
    predictor: P,
    cycle: u64,
    accuracy: AccuracyStats,
}

impl<P: TargetPredictor> SimCore<P> {
    /// Creates core `id` around an initialized predictor, at cycle 0.
    pub fn new(id: usize, predictor: P) -> Self {
        Self {
            id,
            predictor,
            cycle: 0,
            accuracy: AccuracyStats::default(),
        }
    }

    /// Replays one resolved branch.
    ///
    /// A prediction counts as a misprediction when the branch was taken and the
    /// predicted target differs from the resolved target.
    ///
    /// # Returns
    ///
    /// The prediction made before the update.
    pub fn step(&mut self, record: &BranchRecord) -> Prediction {
        self.cycle += 1;
        let prediction = self.predictor.predict(record.ip, record.kind, self.cycle);
        let mispredicted = record.taken && prediction.target != record.target;
        self.accuracy.record(record.kind, mispredicted);
        self.predictor.update(
            record.ip,
            record.target,
            record.taken,
            record.kind,
            self.cycle,
        );
        prediction
    }

    /// Core id.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Current cycle.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// The core's predictor.
    pub fn predictor(&self) -> &P {
        &self.predictor
    }

    /// Accuracy counters for this core.
    pub fn accuracy(&self) -> &AccuracyStats {
        &self.accuracy
    }

    /// Resets the predictor, the cycle counter and the accuracy counters.
    pub fn reset(&mut self) {
        self.predictor.reset();
        self.cycle = 0;
        self.accuracy = AccuracyStats::default();
    }
}

/// Top-level simulator: a set of independent cores.
#[derive(Debug)]
pub struct Simulator<P = BranchTargetPredictor> {
    cores: Vec<SimCore<P>>,
    trace_predictions: bool,
}

impl Simulator<BranchTargetPredictor> {
    /// Creates `config.general.num_cores` cores, each with its own predictor.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configuration fails validation.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let predictors = (0..config.general.num_cores)
            .map(|_| BranchTargetPredictor::new(&config.predictor))
            .collect::<Result<Vec<_>, _>>()?;
        let mut sim = Self::with_predictors(predictors)?;
        sim.trace_predictions = config.general.trace_predictions;
        Ok(sim)
    }
}

impl<P: TargetPredictor> Simulator<P> {
    /// Creates one core per predictor, in order.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoCores`] if `predictors` is empty.
    pub fn with_predictors(predictors: Vec<P>) -> Result<Self, ConfigError> {
        if predictors.is_empty() {
            return Err(ConfigError::NoCores);
        }
        let cores = predictors
            .into_iter()
            .enumerate()
            .map(|(id, p)| SimCore::new(id, p))
            .collect();
        Ok(Self {
            cores,
            trace_predictions: false,
        })
    }

    /// Emits a debug event per replayed record when enabled.
    pub fn set_trace_predictions(&mut self, enabled: bool) {
        self.trace_predictions = enabled;
    }

    /// Replays one record on the core it names.
    ///
    /// # Returns
    ///
    /// The prediction, or `None` if the record names a core that does not exist.
    pub fn step(&mut self, record: &BranchRecord) -> Option<Prediction> {
        let core = self.cores.get_mut(record.core)?;
        let prediction = core.step(record);
        if self.trace_predictions {
            debug!(
                core = record.core,
                cycle = core.cycle(),
                ip = record.ip,
                kind = %record.kind,
                predicted = prediction.target,
                actual = record.target,
                taken = record.taken,
                "replay"
            );
        }
        Some(prediction)
    }

    /// Replays a whole trace.
    ///
    /// # Returns
    ///
    /// The number of records replayed.
    ///
    /// # Errors
    ///
    /// Stops at the first malformed line or out-of-range core id.
    pub fn run<R: BufRead>(&mut self, reader: &mut TraceReader<R>) -> Result<u64, SimError> {
        let mut replayed = 0;
        while let Some(record) = reader.next() {
            let record = record?;
            if self.step(&record).is_none() {
                return Err(TraceError::CoreOutOfRange {
                    line: reader.line(),
                    core: record.core,
                    cores: self.cores.len(),
                }
                .into());
            }
            replayed += 1;
        }
        Ok(replayed)
    }

    /// The simulated cores.
    pub fn cores(&self) -> &[SimCore<P>] {
        &self.cores
    }

    /// Accuracy summed over every core.
    pub fn accuracy(&self) -> AccuracyStats {
        let mut total = AccuracyStats::default();
        for core in &self.cores {
            total.merge(core.accuracy());
        }
        total
    }

    /// Resets every core.
    pub fn reset(&mut self) {
        for core in &mut self.cores {
            core.reset();
        }
    }
}
