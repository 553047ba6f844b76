//! Indirect Target Table.
//!
//! Predicts targets of indirect jumps and indirect calls. The table keeps one
//! target per slot, addressed gshare-style by XOR-ing the branch address with
//! the conditional history register, so the same indirect branch can hold a
//! different target for each recent control-flow path.
//!
//! # Performance
//!
//! - **Time Complexity:** `predict()` and `record()` are O(1)
//! - **Space Complexity:** O(N) where N is the table size

use super::history::ConditionalHistoryRegister;
use crate::common::DirectTable;

/// History-indexed table of indirect branch targets.
#[derive(Clone, Debug)]
pub struct IndirectTargetTable {
    /// Last observed target per slot.
    targets: DirectTable<u64>,
    /// Outcomes of recent conditional branches.
    history: ConditionalHistoryRegister,
}

impl IndirectTargetTable {
    /// Creates a zero-filled table of `size` slots.
    ///
    /// The history register is `floor(log2(size))` bits wide.
    pub fn new(size: usize) -> Self {
        Self {
            targets: DirectTable::new(size, 0),
            history: ConditionalHistoryRegister::for_table(size),
        }
    }

    /// Hash used by both prediction and update.
    ///
    /// Computes `(ip >> 2) XOR history`; the table reduces it modulo its size.
    #[inline]
    pub fn hash(&self, ip: u64) -> u64 {
        (ip >> 2) ^ self.history.value()
    }

    /// Slot addressed by `ip` under the current history.
    #[inline]
    pub fn slot(&self, ip: u64) -> usize {
        self.targets.slot(self.hash(ip))
    }

    /// Returns the target stored for `ip` under the current history (0 if never written).
    #[inline]
    pub fn predict(&self, ip: u64) -> u64 {
        self.targets.get(self.hash(ip))
    }

    /// Stores `target` for `ip` under the current history, replacing whatever was there.
    #[inline]
    pub fn record(&mut self, ip: u64, target: u64) {
        let hash = self.hash(ip);
        self.targets.set(hash, target);
    }

    /// Shifts a resolved conditional outcome into the history register.
    #[inline]
    pub fn record_conditional_outcome(&mut self, taken: bool) {
        self.history.push(taken);
    }

    /// The history register.
    pub fn history(&self) -> &ConditionalHistoryRegister {
        &self.history
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Always `false`; a table holds at least one slot.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Zero-fills the table and clears the history register.
    pub fn reset(&mut self) {
        self.targets.reset();
        self.history.reset();
    }
}
