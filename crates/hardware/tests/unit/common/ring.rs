//! Ring Buffer Tests.

use btbsim_core::common::RingBuffer;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test]
fn push_advances_before_writing() {
    let mut ring: RingBuffer<u64> = RingBuffer::new(4);
    ring.push(0xA);
    assert_eq!(ring.index(), 1);
    assert_eq!(ring.iter().copied().collect::<Vec<_>>(), vec![0, 0xA, 0, 0]);
}

#[test]
fn full_cycle_returns_to_start() {
    let mut ring: RingBuffer<u64> = RingBuffer::new(3);
    for _ in 0..3 {
        ring.advance();
    }
    assert_eq!(ring.index(), 0);
}

#[test]
fn clear_zeroes_and_rewinds() {
    let mut ring: RingBuffer<u64> = RingBuffer::new(4);
    ring.push(1);
    ring.push(2);
    ring.clear();
    assert_eq!(ring.index(), 0);
    assert!(ring.iter().all(|&v| v == 0));
}

proptest! {
    #[test]
    fn prop_index_stays_in_bounds(
        capacity in 1usize..32,
        ops in prop::collection::vec(any::<bool>(), 0..200)
    ) {
        let mut ring: RingBuffer<u64> = RingBuffer::new(capacity);
        for push in ops {
            if push {
                ring.push(1);
            } else {
                let _ = ring.pop();
            }
            prop_assert!(ring.index() < ring.capacity());
        }
    }

    #[test]
    fn prop_push_then_pop_is_identity(capacity in 1usize..32, value in any::<u64>()) {
        let mut ring: RingBuffer<u64> = RingBuffer::new(capacity);
        let start = ring.index();
        ring.push(value);
        prop_assert_eq!(ring.pop(), value);
        prop_assert_eq!(ring.index(), start);
    }
}
