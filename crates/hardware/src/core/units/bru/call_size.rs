//! Call Instruction Size Tracker.
//!
//! The RAS stores call-site addresses rather than return addresses, because the
//! simulator does not know how many bytes a call instruction occupies. This
//! tracker learns that size per call site: each return's resolved target is
//! compared against the call site it popped, and a plausible distance replaces
//! the stored estimate.
//!
//! Entries are addressed by the low bits of the call-site address
//! (`ip & (entries - 1)`); sites that share those bits share an estimate.

use crate::common::DirectTable;

/// Initial size estimate for every call site, in bytes.
pub const DEFAULT_CALL_SIZE: u64 = 4;

/// Largest call-site to return-target distance accepted as a call size.
pub const MAX_CALL_SIZE: u64 = 10;

/// Per-call-site byte-size estimates.
#[derive(Clone, Debug)]
pub struct CallSizeTracker {
    sizes: DirectTable<u64>,
    mask: u64,
}

impl CallSizeTracker {
    /// Creates a tracker with `entries` slots, all seeded to [`DEFAULT_CALL_SIZE`].
    ///
    /// `entries` is expected to be a power of two.
    pub fn new(entries: usize) -> Self {
        let sizes = DirectTable::new(entries, DEFAULT_CALL_SIZE);
        let mask = sizes.len() as u64 - 1;
        Self { sizes, mask }
    }

    /// Hashes a call-site address onto a tracker slot.
    #[inline]
    pub fn hash(&self, ip: u64) -> u64 {
        ip & self.mask
    }

    /// Current size estimate for the call at `ip`.
    #[inline]
    pub fn call_size(&self, ip: u64) -> u64 {
        self.sizes.get(self.hash(ip))
    }

    /// Learns from a resolved return.
    ///
    /// The distance between `call_ip` and `return_target` is stored for the
    /// call site if it is at most [`MAX_CALL_SIZE`] bytes; larger distances
    /// (mismatched or aliased returns) are discarded.
    ///
    /// # Returns
    ///
    /// The stored estimate, or `None` if it was discarded.
    pub fn recalibrate(&mut self, call_ip: u64, return_target: u64) -> Option<u64> {
        let estimate = call_ip.abs_diff(return_target);
        if estimate > MAX_CALL_SIZE {
            return None;
        }
        self.sizes.set(self.hash(call_ip), estimate);
        Some(estimate)
    }

    /// Re-seeds every slot to [`DEFAULT_CALL_SIZE`].
    pub fn reset(&mut self) {
        self.sizes.reset();
    }

    /// Number of tracker slots.
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    /// Always `false`; a tracker holds at least one slot.
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}
