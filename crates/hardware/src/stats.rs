//! Prediction statistics collection and reporting.
//!
//! This module tracks two groups of counters:
//! 1. **Structure activity:** BTB hits, misses, allocations and evictions, RAS
//!    pushes and pops, call-size recalibrations. Kept by the predictor itself.
//! 2. **Accuracy:** Per-kind lookups and target mispredictions. Kept by the host
//!    model, which is the only party that sees both prediction and outcome.

use std::fmt;

use serde::Serialize;

use crate::core::units::bru::BranchKind;

/// Counters maintained by the predictor structures.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PredictorStats {
    /// Predictions served, per branch kind.
    pub lookups: [u64; BranchKind::ALL.len()],
    /// BTB lookups that found a tagged entry.
    pub btb_hits: u64,
    /// BTB lookups that found nothing.
    pub btb_misses: u64,
    /// BTB records that refreshed an existing entry.
    pub btb_updates: u64,
    /// BTB records that allocated a new entry.
    pub btb_allocations: u64,
    /// Allocations that displaced a previously allocated entry.
    pub btb_evictions: u64,
    /// BTB records that wrote nothing (untaken or zero target on a miss).
    pub btb_skipped: u64,
    /// Calls pushed onto the RAS.
    pub ras_pushes: u64,
    /// Returns popped off the RAS.
    pub ras_pops: u64,
    /// Returns whose distance to the call site updated the call-size tracker.
    pub call_size_recalibrations: u64,
    /// Returns whose distance was too large to be a call size.
    pub call_size_discards: u64,
    /// Indirect target table writes.
    pub indirect_updates: u64,
}

impl PredictorStats {
    /// Total predictions across all kinds.
    pub fn total_lookups(&self) -> u64 {
        self.lookups.iter().sum()
    }

    /// BTB hit rate as a percentage of BTB lookups.
    pub fn btb_hit_rate(&self) -> f64 {
        percent(self.btb_hits, self.btb_hits + self.btb_misses)
    }

    /// Writes the structure activity report.
    fn write_report(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "PREDICTOR STRUCTURES")?;
        for kind in BranchKind::ALL {
            writeln!(
                f,
                "  lookups.{:<15} {}",
                kind.name(),
                self.lookups[kind.index()]
            )?;
        }
        writeln!(f, "  btb.hits               {}", self.btb_hits)?;
        writeln!(f, "  btb.misses             {}", self.btb_misses)?;
        writeln!(f, "  btb.hit_rate           {:.2}%", self.btb_hit_rate())?;
        writeln!(f, "  btb.updates            {}", self.btb_updates)?;
        writeln!(f, "  btb.allocations        {}", self.btb_allocations)?;
        writeln!(f, "  btb.evictions          {}", self.btb_evictions)?;
        writeln!(f, "  btb.skipped            {}", self.btb_skipped)?;
        writeln!(f, "  ras.pushes             {}", self.ras_pushes)?;
        writeln!(f, "  ras.pops               {}", self.ras_pops)?;
        writeln!(
            f,
            "  ras.recalibrations     {}",
            self.call_size_recalibrations
        )?;
        writeln!(f, "  ras.discards           {}", self.call_size_discards)?;
        writeln!(f, "  indirect.updates       {}", self.indirect_updates)
    }
}

impl fmt::Display for PredictorStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_report(f)
    }
}

/// Lookups and mispredictions for one branch kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct KindAccuracy {
    /// Branches of this kind that were predicted.
    pub lookups: u64,
    /// Taken branches whose predicted target differed from the resolved one.
    pub mispredictions: u64,
}

impl KindAccuracy {
    /// Percentage of lookups that were not mispredicted.
    pub fn accuracy(&self) -> f64 {
        percent(self.lookups - self.mispredictions, self.lookups)
    }
}

/// Per-kind prediction accuracy, as scored by the host model.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct AccuracyStats {
    /// Counters indexed by [`BranchKind::index`].
    pub kinds: [KindAccuracy; BranchKind::ALL.len()],
}

impl AccuracyStats {
    /// Counts one scored prediction.
    pub fn record(&mut self, kind: BranchKind, mispredicted: bool) {
        let entry = &mut self.kinds[kind.index()];
        entry.lookups += 1;
        entry.mispredictions += u64::from(mispredicted);
    }

    /// Counters for one kind.
    pub fn kind(&self, kind: BranchKind) -> KindAccuracy {
        self.kinds[kind.index()]
    }

    /// Total scored predictions.
    pub fn lookups(&self) -> u64 {
        self.kinds.iter().map(|k| k.lookups).sum()
    }

    /// Total target mispredictions.
    pub fn mispredictions(&self) -> u64 {
        self.kinds.iter().map(|k| k.mispredictions).sum()
    }

    /// Overall accuracy as a percentage; 0 when nothing was scored.
    pub fn accuracy(&self) -> f64 {
        let lookups = self.lookups();
        percent(lookups - self.mispredictions(), lookups)
    }

    /// Adds another core's counters into this one.
    pub fn merge(&mut self, other: &Self) {
        for (mine, theirs) in self.kinds.iter_mut().zip(other.kinds.iter()) {
            mine.lookups += theirs.lookups;
            mine.mispredictions += theirs.mispredictions;
        }
    }
}

impl fmt::Display for AccuracyStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "TARGET PREDICTION")?;
        for kind in BranchKind::ALL {
            let k = self.kind(kind);
            if k.lookups == 0 {
                continue;
            }
            writeln!(
                f,
                "  {:<6} lookups: {:<10} | mispredicts: {:<10} | accuracy: {:.2}%",
                kind.name(),
                k.lookups,
                k.mispredictions,
                k.accuracy()
            )?;
        }
        writeln!(f, "  bp.lookups             {}", self.lookups())?;
        writeln!(f, "  bp.mispredicts         {}", self.mispredictions())?;
        writeln!(f, "  bp.accuracy            {:.2}%", self.accuracy())
    }
}

/// `part / total` as a percentage, 0 for an empty total.
fn percent(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * (part as f64 / total as f64)
    }
}
