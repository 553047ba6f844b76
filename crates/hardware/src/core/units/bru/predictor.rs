//! Branch Target Predictor.
//!
//! The root of the target prediction unit. It owns one of each structure and
//! routes every branch, by kind, to exactly one of them:
//!
//! | Kind          | Predict                      | Update                    |
//! |---------------|------------------------------|---------------------------|
//! | Conditional   | BTB lookup                   | BTB record + history shift|
//! | DirectCall    | BTB lookup + RAS push        | BTB record                |
//! | IndirectCall  | Indirect predict + RAS push  | Indirect record           |
//! | Indirect      | Indirect predict             | Indirect record           |
//! | Return        | RAS peek + call size         | RAS pop + recalibrate     |
//! | Other         | BTB lookup                   | BTB record                |
//!
//! Every kind except `Conditional` is reported as always taken. A BTB miss
//! reports target 0, always taken.

use tracing::{debug, info, trace};

use super::branch_predictor::{BranchKind, Prediction, TargetPredictor};
use super::btb::{BranchTargetTable, RecordOutcome};
use super::indirect::IndirectTargetTable;
use super::ras::ReturnAddressStack;
use crate::common::error::ConfigError;
use crate::config::PredictorConfig;
use crate::stats::PredictorStats;

/// Per-core branch target predictor.
#[derive(Clone, Debug)]
pub struct BranchTargetPredictor {
    /// Direct calls, conditional branches and unconditional jumps.
    btb: BranchTargetTable,
    /// Return targets.
    ras: ReturnAddressStack,
    /// Indirect jump and indirect call targets, plus the conditional history.
    indirect: IndirectTargetTable,
    /// Activity counters.
    stats: PredictorStats,
}

impl BranchTargetPredictor {
    /// Builds and initializes a predictor with the given geometry.
    ///
    /// All tables are zero-filled, the history register is cleared and every
    /// call-size estimate is seeded to 4 bytes.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the geometry fails validation.
    pub fn new(config: &PredictorConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        info!(
            sets = config.btb_sets,
            ways = config.btb_ways,
            indirect_size = config.indirect_size,
            ras_size = config.ras_size,
            call_size_trackers = config.call_size_trackers,
            "initialized branch target predictor"
        );

        Ok(Self {
            btb: BranchTargetTable::new(config.btb_sets, config.btb_ways),
            ras: ReturnAddressStack::new(config.ras_size, config.call_size_trackers),
            indirect: IndirectTargetTable::new(config.indirect_size),
            stats: PredictorStats::default(),
        })
    }

    /// The branch target table.
    pub fn btb(&self) -> &BranchTargetTable {
        &self.btb
    }

    /// The return address stack.
    pub fn ras(&self) -> &ReturnAddressStack {
        &self.ras
    }

    /// The indirect target table.
    pub fn indirect(&self) -> &IndirectTargetTable {
        &self.indirect
    }

    /// Activity counters since construction or the last reset.
    pub fn stats(&self) -> &PredictorStats {
        &self.stats
    }

    /// BTB lookup with the miss sentinel applied.
    fn predict_btb(&mut self, ip: u64, cycle: u64) -> Prediction {
        match self.btb.lookup(ip, cycle) {
            Some(hit) => {
                self.stats.btb_hits += 1;
                Prediction {
                    target: hit.target,
                    always_taken: hit.always_taken,
                }
            }
            None => {
                self.stats.btb_misses += 1;
                Prediction::NO_TARGET
            }
        }
    }

    /// BTB record with bookkeeping.
    fn record_btb(&mut self, ip: u64, target: u64, taken: bool, cycle: u64) {
        match self.btb.record(ip, target, taken, cycle) {
            RecordOutcome::Updated => self.stats.btb_updates += 1,
            RecordOutcome::Allocated { evicted } => {
                self.stats.btb_allocations += 1;
                if let Some(victim) = evicted {
                    self.stats.btb_evictions += 1;
                    debug!(ip, target, victim, cycle, "btb eviction");
                }
            }
            RecordOutcome::Skipped => self.stats.btb_skipped += 1,
        }
    }
}

impl TargetPredictor for BranchTargetPredictor {
    fn predict(&mut self, ip: u64, kind: BranchKind, cycle: u64) -> Prediction {
        self.stats.lookups[kind.index()] += 1;

        if kind.is_call() {
            self.ras.push_call(ip);
            self.stats.ras_pushes += 1;
        }

        let prediction = match kind {
            BranchKind::Return => Prediction {
                target: self.ras.predict_return(),
                always_taken: true,
            },
            BranchKind::Indirect | BranchKind::IndirectCall => Prediction {
                target: self.indirect.predict(ip),
                always_taken: true,
            },
            BranchKind::Conditional => self.predict_btb(ip, cycle),
            BranchKind::DirectCall | BranchKind::Other => Prediction {
                always_taken: true,
                ..self.predict_btb(ip, cycle)
            },
        };

        trace!(
            ip,
            %kind,
            target = prediction.target,
            always_taken = prediction.always_taken,
            "predict"
        );
        prediction
    }

    fn update(&mut self, ip: u64, target: u64, taken: bool, kind: BranchKind, cycle: u64) {
        trace!(ip, target, taken, %kind, "update");

        match kind {
            BranchKind::Indirect | BranchKind::IndirectCall => {
                self.indirect.record(ip, target);
                self.stats.indirect_updates += 1;
            }
            BranchKind::Return => {
                let call_ip = self.ras.pop_return();
                self.stats.ras_pops += 1;
                match self.ras.recalibrate(call_ip, target) {
                    Some(size) => {
                        self.stats.call_size_recalibrations += 1;
                        debug!(call_ip, target, size, "call size recalibrated");
                    }
                    None => self.stats.call_size_discards += 1,
                }
            }
            BranchKind::Conditional => {
                self.indirect.record_conditional_outcome(taken);
                self.record_btb(ip, target, taken, cycle);
            }
            BranchKind::DirectCall | BranchKind::Other => {
                self.record_btb(ip, target, taken, cycle);
            }
        }
    }

    fn reset(&mut self) {
        self.btb.reset();
        self.ras.reset();
        self.indirect.reset();
        self.stats = PredictorStats::default();
    }
}
