//! Direct-Mapped Lookup Table.
//!
//! A flat, fixed-size table addressed by `hash mod len`. There are no tags:
//! every hash maps to exactly one slot and colliding hashes share it.

/// Fixed-size table of `T` addressed by a hash.
#[derive(Clone, Debug)]
pub struct DirectTable<T> {
    /// Slot storage.
    entries: Vec<T>,
    /// Value every slot holds after construction or [`DirectTable::reset`].
    init: T,
}

impl<T: Copy> DirectTable<T> {
    /// Creates a table of `len` slots, each holding `init`.
    ///
    /// A length of zero is clamped to one slot.
    pub fn new(len: usize, init: T) -> Self {
        Self {
            entries: vec![init; len.max(1)],
            init,
        }
    }

    /// Number of slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`; a table holds at least one slot.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maps a hash onto a slot index.
    #[inline]
    pub fn slot(&self, hash: u64) -> usize {
        (hash % self.entries.len() as u64) as usize
    }

    /// Reads the slot addressed by `hash`.
    #[inline]
    pub fn get(&self, hash: u64) -> T {
        self.entries[self.slot(hash)]
    }

    /// Overwrites the slot addressed by `hash`.
    #[inline]
    pub fn set(&mut self, hash: u64, value: T) {
        let idx = self.slot(hash);
        self.entries[idx] = value;
    }

    /// Restores every slot to its initial value.
    pub fn reset(&mut self) {
        self.entries.fill(self.init);
    }

    /// Iterates over the slots in index order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }
}
