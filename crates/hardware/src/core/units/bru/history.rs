//! Conditional History Register.
//!
//! A fixed-width shift register of recent conditional-branch outcomes. Each
//! resolved conditional branch shifts the register left by one and inserts its
//! outcome at bit 0; bits shifted past the width are discarded. The register
//! diversifies the indirect target table index.

use std::fmt;

/// Fixed-width outcome shift register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConditionalHistoryRegister {
    /// Outcome bits; bit 0 is the newest outcome.
    bits: u64,
    /// Register width in bits (0..=64).
    width: u32,
}

impl ConditionalHistoryRegister {
    /// Creates a zeroed register `width` bits wide.
    ///
    /// Widths above 64 are clamped to 64.
    pub fn new(width: u32) -> Self {
        Self {
            bits: 0,
            width: width.min(u64::BITS),
        }
    }

    /// Creates a register sized for a table of `entries` slots: `floor(log2(entries))` bits.
    pub fn for_table(entries: usize) -> Self {
        Self::new(entries.max(1).ilog2())
    }

    /// Mask selecting the register's bits.
    #[inline]
    fn mask(&self) -> u64 {
        match self.width {
            0 => 0,
            w => u64::MAX >> (u64::BITS - w),
        }
    }

    /// Shifts in the outcome of a resolved conditional branch.
    #[inline]
    pub fn push(&mut self, taken: bool) {
        self.bits = ((self.bits << 1) | u64::from(taken)) & self.mask();
    }

    /// The register contents as an integer.
    #[inline]
    pub fn value(&self) -> u64 {
        self.bits
    }

    /// Register width in bits.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Clears every bit.
    pub fn reset(&mut self) {
        self.bits = 0;
    }
}

// Most-significant (oldest) bit first, padded to the full width.
impl fmt::Display for ConditionalHistoryRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.width == 0 {
            return Ok(());
        }
        write!(f, "{:0width$b}", self.bits, width = self.width as usize)
    }
}
