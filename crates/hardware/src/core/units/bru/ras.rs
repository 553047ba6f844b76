//! Return Address Stack (RAS).
//!
//! The RAS predicts the targets of return instructions. Calls push their own
//! address (not the return address); the predicted return target is that call
//! address plus the learned size of the call instruction, supplied by the
//! [`CallSizeTracker`].
//!
//! The stack is a ring with a single index and no depth tracking. Pushing past
//! capacity overwrites the oldest entry, and a return without a matching call
//! reads whatever the slot holds (usually 0). Both are tolerated mispredictions
//! rather than errors.

use super::call_size::CallSizeTracker;
use crate::common::RingBuffer;

/// Return Address Stack structure.
#[derive(Clone, Debug)]
pub struct ReturnAddressStack {
    /// Call-site addresses.
    stack: RingBuffer<u64>,
    /// Learned call instruction sizes.
    call_sizes: CallSizeTracker,
}

impl ReturnAddressStack {
    /// Creates an empty stack of `capacity` slots with `trackers` call-size entries.
    pub fn new(capacity: usize, trackers: usize) -> Self {
        Self {
            stack: RingBuffer::new(capacity),
            call_sizes: CallSizeTracker::new(trackers),
        }
    }

    /// Pushes the address of a call instruction.
    #[inline]
    pub fn push_call(&mut self, ip: u64) {
        self.stack.push(ip);
    }

    /// Reads the call address on top of the stack without popping it.
    ///
    /// Prediction happens before resolution, so the entry must stay in place
    /// until [`ReturnAddressStack::pop_return`].
    #[inline]
    pub fn peek_return(&self) -> u64 {
        self.stack.peek()
    }

    /// Predicted target for a return: the top call address plus its call size.
    pub fn predict_return(&self) -> u64 {
        let call_ip = self.peek_return();
        call_ip.wrapping_add(self.call_sizes.call_size(call_ip))
    }

    /// Pops the top call address, zeroing its slot.
    #[inline]
    pub fn pop_return(&mut self) -> u64 {
        self.stack.pop()
    }

    /// Current size estimate for the call at `ip`.
    #[inline]
    pub fn call_size(&self, ip: u64) -> u64 {
        self.call_sizes.call_size(ip)
    }

    /// Adjusts the call-size estimate for `call_ip` from a resolved return target.
    ///
    /// Returns the stored estimate, or `None` if the distance was implausible.
    pub fn recalibrate(&mut self, call_ip: u64, return_target: u64) -> Option<u64> {
        self.call_sizes.recalibrate(call_ip, return_target)
    }

    /// Stack capacity.
    pub fn capacity(&self) -> usize {
        self.stack.capacity()
    }

    /// Current stack index.
    pub fn index(&self) -> usize {
        self.stack.index()
    }

    /// Read access to the call-size tracker.
    pub fn call_sizes(&self) -> &CallSizeTracker {
        &self.call_sizes
    }

    /// Clears the stack and re-seeds every call-size estimate.
    pub fn reset(&mut self) {
        self.stack.clear();
        self.call_sizes.reset();
    }
}
