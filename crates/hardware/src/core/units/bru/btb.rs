//! Branch Target Buffer (BTB).
//!
//! The BTB is a set-associative cache of target addresses for direct calls,
//! conditional branches and unconditional jumps. Each entry is tagged with the
//! full branch address and carries an always-taken flag plus the cycle of its
//! last use, which drives least-recently-used replacement.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `lookup()`: O(W) where W is the number of ways
//!   - `record()`: O(W)
//! - **Space Complexity:** O(S × W)

/// An entry in the Branch Target Buffer.
///
/// There is no valid bit: an empty slot is simply an entry with tag 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BtbEntry {
    /// Full address of the branch this entry belongs to.
    pub tag: u64,
    /// The predicted target address.
    pub target: u64,
    /// Set while every observed execution of the branch was taken.
    pub always_taken: bool,
    /// Host cycle of the last prediction hit or update.
    pub last_used_cycle: u64,
}

/// A BTB hit returned by [`BranchTargetTable::lookup`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BtbHit {
    /// Stored target address.
    pub target: u64,
    /// Stored always-taken flag.
    pub always_taken: bool,
}

/// What [`BranchTargetTable::record`] did with a resolved branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordOutcome {
    /// An entry for the branch already existed and was refreshed.
    Updated,
    /// A new entry was allocated over the least recently used way.
    Allocated {
        /// Tag of the displaced entry, if the victim way held one.
        evicted: Option<u64>,
    },
    /// No entry exists and the branch did not qualify for allocation
    /// (not taken, or target 0). Nothing was written.
    Skipped,
}

/// Branch Target Buffer structure.
#[derive(Clone, Debug)]
pub struct BranchTargetTable {
    /// The table of entries, `sets × ways`, set-major.
    table: Vec<BtbEntry>,
    /// Number of sets.
    sets: usize,
    /// Associativity.
    ways: usize,
}

impl BranchTargetTable {
    /// Creates a zero-filled BTB.
    ///
    /// # Arguments
    ///
    /// * `sets` - Number of sets (clamped to at least 1).
    /// * `ways` - Entries per set (clamped to at least 1).
    ///
    /// Geometry that cannot be allocated is rejected earlier by
    /// [`PredictorConfig::validate`](crate::config::PredictorConfig::validate).
    pub fn new(sets: usize, ways: usize) -> Self {
        let sets = sets.max(1);
        let ways = ways.max(1);
        Self {
            table: vec![BtbEntry::default(); sets.saturating_mul(ways)],
            sets,
            ways,
        }
    }

    /// Number of sets.
    pub fn sets(&self) -> usize {
        self.sets
    }

    /// Number of ways per set.
    pub fn ways(&self) -> usize {
        self.ways
    }

    /// Calculates the set index for a given branch address.
    ///
    /// Drops the low two bits (instruction alignment) and reduces modulo the
    /// number of sets.
    #[inline]
    pub fn set_index(&self, ip: u64) -> usize {
        ((ip >> 2) % self.sets as u64) as usize
    }

    /// Returns the entries of the set `ip` maps to.
    fn set(&self, ip: u64) -> &[BtbEntry] {
        let base = self.set_index(ip) * self.ways;
        &self.table[base..base + self.ways]
    }

    /// Returns the entries of the set `ip` maps to, mutably.
    fn set_mut(&mut self, ip: u64) -> &mut [BtbEntry] {
        let base = self.set_index(ip) * self.ways;
        &mut self.table[base..base + self.ways]
    }

    /// Returns the entry tagged `ip`, if present.
    pub fn entry(&self, ip: u64) -> Option<&BtbEntry> {
        self.set(ip).iter().find(|e| e.tag == ip)
    }

    /// Looks up the target for `ip`.
    ///
    /// A hit counts as a use: the entry's `last_used_cycle` is set to `cycle`.
    ///
    /// # Returns
    ///
    /// The stored target and always-taken flag, or `None` if no entry is
    /// tagged `ip`.
    pub fn lookup(&mut self, ip: u64, cycle: u64) -> Option<BtbHit> {
        let entry = self.set_mut(ip).iter_mut().find(|e| e.tag == ip)?;
        entry.last_used_cycle = cycle;
        Some(BtbHit {
            target: entry.target,
            always_taken: entry.always_taken,
        })
    }

    /// Records a resolved branch.
    ///
    /// An existing entry is always refreshed with the latest target, its
    /// always-taken flag ANDed with `taken`. A missing entry is allocated only
    /// for a taken branch with a non-zero target, replacing the way with the
    /// smallest `last_used_cycle` (the first such way on ties); otherwise the
    /// table is left untouched.
    pub fn record(&mut self, ip: u64, target: u64, taken: bool, cycle: u64) -> RecordOutcome {
        let set = self.set_mut(ip);

        let (way, outcome) = match set.iter().position(|e| e.tag == ip) {
            Some(way) => (way, RecordOutcome::Updated),
            None if taken && target != 0 => {
                let victim = set
                    .iter()
                    .enumerate()
                    .min_by_key(|(_, e)| e.last_used_cycle)
                    .map_or(0, |(way, _)| way);
                let old_tag = set[victim].tag;
                set[victim].always_taken = true;
                let evicted = (old_tag != 0).then_some(old_tag);
                (victim, RecordOutcome::Allocated { evicted })
            }
            None => return RecordOutcome::Skipped,
        };

        let entry = &mut set[way];
        *entry = BtbEntry {
            tag: ip,
            target,
            always_taken: entry.always_taken && taken,
            last_used_cycle: cycle,
        };
        outcome
    }

    /// Zero-fills every entry.
    pub fn reset(&mut self) {
        self.table.fill(BtbEntry::default());
    }

    /// Iterates over all entries, set-major.
    pub fn iter(&self) -> impl Iterator<Item = &BtbEntry> {
        self.table.iter()
    }
}
