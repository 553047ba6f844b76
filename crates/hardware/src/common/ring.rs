//! Fixed-Capacity Ring Buffer.
//!
//! A bounded circular store with a single read/write index. The index always
//! points at the most recently written slot. Advancing past the end wraps to
//! slot 0 and retreating below slot 0 wraps to the last slot; there is no
//! separate depth counter, so overflow silently overwrites the oldest entry and
//! underflow silently reads whatever the slot currently holds.

/// Bounded circular storage with one wrapping index.
#[derive(Clone, Debug)]
pub struct RingBuffer<T> {
    /// Slot storage.
    slots: Vec<T>,
    /// Index of the most recently written slot.
    index: usize,
}

impl<T: Copy + Default> RingBuffer<T> {
    /// Creates a ring of `capacity` default-valued slots with the index at slot 0.
    ///
    /// A capacity of zero is clamped to one slot.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![T::default(); capacity.max(1)],
            index: 0,
        }
    }

    /// Number of slots in the ring.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Current index.
    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Moves the index forward one slot, wrapping at the end.
    #[inline]
    pub fn advance(&mut self) {
        self.index += 1;
        if self.index == self.slots.len() {
            self.index = 0;
        }
    }

    /// Moves the index back one slot, wrapping to `capacity - 1` below zero.
    #[inline]
    pub fn retreat(&mut self) {
        self.index = match self.index {
            0 => self.slots.len() - 1,
            i => i - 1,
        };
    }

    /// Advances the index and writes `value` into the new slot.
    pub fn push(&mut self, value: T) {
        self.advance();
        self.slots[self.index] = value;
    }

    /// Reads the slot at the index without moving it.
    #[inline]
    pub fn peek(&self) -> T {
        self.slots[self.index]
    }

    /// Reads the slot at the index, clears it to the default value, then
    /// retreats the index.
    pub fn pop(&mut self) -> T {
        let value = std::mem::take(&mut self.slots[self.index]);
        self.retreat();
        value
    }

    /// Resets every slot to the default value and the index to zero.
    pub fn clear(&mut self) {
        self.slots.fill(T::default());
        self.index = 0;
    }

    /// Iterates over the raw slots in storage order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter()
    }
}
