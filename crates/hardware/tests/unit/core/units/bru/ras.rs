//! Return Address Stack (RAS) Tests.
//!
//! Verifies LIFO order, silent wraparound, underflow behavior, and the
//! interaction between the stack and the call-size tracker.

use btbsim_core::core::units::bru::call_size::DEFAULT_CALL_SIZE;
use btbsim_core::core::units::bru::ras::ReturnAddressStack;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

// ══════════════════════════════════════════════════════════
// 1. Push / Pop
// ══════════════════════════════════════════════════════════

#[test]
fn push_then_pop_round_trips() {
    let mut ras = ReturnAddressStack::new(8, 1024);
    ras.push_call(0x1000);
    assert_eq!(ras.pop_return(), 0x1000);
}

#[test]
fn pops_in_reverse_push_order() {
    let mut ras = ReturnAddressStack::new(8, 1024);
    for ip in [0x1000, 0x2000, 0x3000] {
        ras.push_call(ip);
    }
    let popped: Vec<u64> = (0..3).map(|_| ras.pop_return()).collect();
    assert_eq!(popped, vec![0x3000, 0x2000, 0x1000]);
}

#[test]
fn peek_does_not_move_the_index() {
    let mut ras = ReturnAddressStack::new(8, 1024);
    ras.push_call(0x1000);
    let index = ras.index();
    assert_eq!(ras.peek_return(), 0x1000);
    assert_eq!(ras.peek_return(), 0x1000);
    assert_eq!(ras.index(), index);
}

#[test]
fn pop_zeroes_the_slot() {
    let mut ras = ReturnAddressStack::new(2, 1024);
    ras.push_call(0x1000);
    ras.push_call(0x2000);
    assert_eq!(ras.pop_return(), 0x2000);
    assert_eq!(ras.pop_return(), 0x1000);
    // A third pop wraps back onto the slot that held 0x2000.
    assert_eq!(ras.pop_return(), 0);
}

// ══════════════════════════════════════════════════════════
// 2. Wraparound and underflow
// ══════════════════════════════════════════════════════════

#[test]
fn overflow_overwrites_oldest() {
    let mut ras = ReturnAddressStack::new(4, 1024);
    for ip in 1..=5u64 {
        ras.push_call(ip * 0x100);
    }
    assert_eq!(ras.peek_return(), 0x500, "Newest push must be on top");

    let popped: Vec<u64> = (0..5).map(|_| ras.pop_return()).collect();
    assert_eq!(popped, vec![0x500, 0x400, 0x300, 0x200, 0]);
}

#[test]
fn index_wraps_both_ways() {
    let mut ras = ReturnAddressStack::new(4, 1024);
    assert_eq!(ras.index(), 0);
    let _ = ras.pop_return();
    assert_eq!(ras.index(), 3);
    ras.push_call(0x1000);
    assert_eq!(ras.index(), 0);
}

#[test]
fn underflow_reads_zero_slot() {
    let mut ras = ReturnAddressStack::new(8, 1024);
    assert_eq!(ras.pop_return(), 0);
    assert_eq!(ras.predict_return(), DEFAULT_CALL_SIZE);
}

// ══════════════════════════════════════════════════════════
// 3. Call-size calibration
// ══════════════════════════════════════════════════════════

#[test]
fn predict_adds_default_call_size() {
    let mut ras = ReturnAddressStack::new(8, 1024);
    ras.push_call(0x1000);
    assert_eq!(ras.predict_return(), 0x1004);
}

#[test]
fn recalibration_to_one_byte() {
    let mut ras = ReturnAddressStack::new(8, 1024);
    ras.push_call(0x1000);
    assert_eq!(ras.predict_return(), 0x1004);

    let call_ip = ras.pop_return();
    assert_eq!(ras.recalibrate(call_ip, 0x1001), Some(1));

    ras.push_call(0x1000);
    assert_eq!(ras.predict_return(), 0x1001);
}

#[test]
fn recalibration_uses_absolute_distance() {
    let mut ras = ReturnAddressStack::new(8, 1024);
    ras.push_call(0x1000);
    let call_ip = ras.pop_return();
    assert_eq!(ras.recalibrate(call_ip, 0x1005), Some(5));

    ras.push_call(0x1000);
    assert_eq!(ras.predict_return(), 0x1005);
}

#[test]
fn recalibration_affects_aliased_call_sites() {
    let mut ras = ReturnAddressStack::new(8, 1024);
    let _ = ras.recalibrate(0x1000, 0x1002);
    // 0x1400 shares the low ten bits with 0x1000.
    ras.push_call(0x1400);
    assert_eq!(ras.predict_return(), 0x1402);
    assert_eq!(ras.call_size(0x1004), DEFAULT_CALL_SIZE);
}

#[test]
fn reset_clears_stack_and_sizes() {
    let mut ras = ReturnAddressStack::new(8, 1024);
    ras.push_call(0x1000);
    let _ = ras.recalibrate(0x1000, 0x1002);
    ras.reset();
    assert_eq!(ras.index(), 0);
    assert_eq!(ras.peek_return(), 0);
    assert_eq!(ras.call_size(0x1000), DEFAULT_CALL_SIZE);
}

// ══════════════════════════════════════════════════════════
// 4. Properties
// ══════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn prop_lifo_within_capacity(calls in prop::collection::vec(1u64.., 1..=16)) {
        let mut ras = ReturnAddressStack::new(16, 1024);
        for &ip in &calls {
            ras.push_call(ip);
        }
        let popped: Vec<u64> = (0..calls.len()).map(|_| ras.pop_return()).collect();
        let expected: Vec<u64> = calls.iter().rev().copied().collect();
        prop_assert_eq!(popped, expected);
    }

    #[test]
    fn prop_peek_reflects_newest_after_wrap(calls in prop::collection::vec(1u64.., 9..40)) {
        let mut ras = ReturnAddressStack::new(8, 1024);
        for &ip in &calls {
            ras.push_call(ip);
        }
        prop_assert_eq!(ras.peek_return(), *calls.last().unwrap());
    }
}
