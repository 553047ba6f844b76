//! Host Model Tests.
//!
//! Drives the simulator both with real predictors and with a mock, checking
//! cycle bookkeeping, misprediction scoring, and per-core isolation.

use btbsim_core::common::{ConfigError, SimError, TraceError};
use btbsim_core::config::Config;
use btbsim_core::sim::trace::BranchRecord;
use btbsim_core::sim::TraceReader;
use btbsim_core::{BranchKind, Prediction, Simulator};
use mockall::Sequence;
use mockall::predicate::eq;
use pretty_assertions::assert_eq;

use crate::common::mocks::MockPredictor;

fn config_with_cores(n: usize) -> Config {
    let mut config = Config::default();
    config.general.num_cores = n;
    config
}

fn replay(sim: &mut Simulator, text: &str) -> Result<u64, SimError> {
    sim.run(&mut TraceReader::new(text.as_bytes()))
}

// ══════════════════════════════════════════════════════════
// 1. Construction
// ══════════════════════════════════════════════════════════

#[test]
fn one_core_per_configured_core() {
    let sim = Simulator::new(&config_with_cores(3)).unwrap();
    let ids: Vec<usize> = sim.cores().iter().map(|c| c.id()).collect();
    assert_eq!(ids, vec![0, 1, 2]);
    assert!(sim.cores().iter().all(|c| c.cycle() == 0));
}

#[test]
fn zero_cores_is_rejected() {
    assert_eq!(
        Simulator::new(&config_with_cores(0)).unwrap_err(),
        ConfigError::NoCores
    );
    assert_eq!(
        Simulator::<MockPredictor>::with_predictors(Vec::new()).err(),
        Some(ConfigError::NoCores)
    );
}

#[test]
fn unallocatable_btb_is_an_error_not_a_panic() {
    let mut config = Config::default();
    config.predictor.btb_sets = usize::MAX / 2;
    config.predictor.btb_ways = 4;
    assert_eq!(
        Simulator::new(&config).unwrap_err(),
        ConfigError::TooLarge {
            field: "btb_sets * btb_ways"
        }
    );
}

// ══════════════════════════════════════════════════════════
// 2. Replay with the real predictor
// ══════════════════════════════════════════════════════════

#[test]
fn call_return_trace_is_scored() {
    let mut sim = Simulator::new(&Config::default()).unwrap();
    let trace = "\
        # call, return, call, return\n\
        0x1000 0x5000 T call\n\
        0x5010 0x1004 T ret\n\
        0x1000 0x5000 T call\n\
        0x5010 0x1004 T ret\n";
    assert_eq!(replay(&mut sim, trace).unwrap(), 4);

    let accuracy = sim.accuracy();
    assert_eq!(accuracy.lookups(), 4);
    // Only the first call misses: the BTB had never seen it.
    assert_eq!(accuracy.mispredictions(), 1);
    assert_eq!(accuracy.kind(BranchKind::DirectCall).mispredictions, 1);
    assert_eq!(accuracy.kind(BranchKind::Return).mispredictions, 0);
    assert_eq!(sim.cores()[0].cycle(), 4);
}

#[test]
fn untaken_branches_are_never_mispredicted() {
    let mut sim = Simulator::new(&Config::default()).unwrap();
    let trace = "0x1000 0x1004 N cond\n0x1000 0x1004 N cond\n";
    let _ = replay(&mut sim, trace).unwrap();
    assert_eq!(sim.accuracy().mispredictions(), 0);
    assert_eq!(sim.accuracy().lookups(), 2);
}

#[test]
fn cores_do_not_share_state() {
    let mut sim = Simulator::new(&config_with_cores(2)).unwrap();
    let trace = "0x1000 0x5000 T jmp 0\n0x1000 0x5000 T jmp 1\n0x1000 0x5000 T jmp 1\n";
    let _ = replay(&mut sim, trace).unwrap();

    let cores = sim.cores();
    assert_eq!(cores[0].cycle(), 1);
    assert_eq!(cores[1].cycle(), 2);
    assert_eq!(cores[0].accuracy().mispredictions(), 1);
    assert_eq!(cores[1].accuracy().lookups(), 2);
    assert_eq!(
        cores[1].accuracy().mispredictions(),
        1,
        "Core 1 must not see core 0's BTB entry"
    );
    assert_eq!(sim.accuracy().lookups(), 3);
}

#[test]
fn out_of_range_core_stops_replay() {
    let mut sim = Simulator::new(&Config::default()).unwrap();
    let trace = "# one core\n0x10 0x20 T jmp\n0x10 0x20 T jmp 3\n0x10 0x20 T jmp\n";
    match replay(&mut sim, trace) {
        Err(SimError::Trace(TraceError::CoreOutOfRange { line, core, cores })) => {
            assert_eq!((line, core, cores), (3, 3, 1));
        }
        other => panic!("expected CoreOutOfRange, got {other:?}"),
    }
    assert_eq!(sim.cores()[0].cycle(), 1);
}

#[test]
fn malformed_trace_stops_replay() {
    let mut sim = Simulator::new(&Config::default()).unwrap();
    let result = replay(&mut sim, "0x10 0x20 T jmp\nnot a record\n");
    assert!(matches!(
        result,
        Err(SimError::Trace(TraceError::BadAddress { line: 2, .. }))
    ));
}

#[test]
fn step_rejects_unknown_core() {
    let mut sim = Simulator::new(&Config::default()).unwrap();
    let record = BranchRecord {
        ip: 0x10,
        target: 0x20,
        taken: true,
        kind: BranchKind::Other,
        core: 1,
    };
    assert_eq!(sim.step(&record), None);
}

#[test]
fn traced_replay_matches_untraced() {
    let trace = "0x1000 0x5000 T call\n0x5010 0x1004 T ret\n0x2000 0x3000 T ind\n";
    let mut plain = Simulator::new(&Config::default()).unwrap();
    let mut traced = Simulator::new(&Config::default()).unwrap();
    traced.set_trace_predictions(true);

    let _ = replay(&mut plain, trace).unwrap();
    let _ = replay(&mut traced, trace).unwrap();
    assert_eq!(plain.accuracy(), traced.accuracy());
}

#[test]
fn reset_rewinds_every_core() {
    let mut sim = Simulator::new(&config_with_cores(2)).unwrap();
    let _ = replay(&mut sim, "0x10 0x20 T jmp 0\n0x10 0x20 T jmp 1\n").unwrap();
    sim.reset();
    assert!(sim.cores().iter().all(|c| c.cycle() == 0));
    assert_eq!(sim.accuracy().lookups(), 0);
    assert_eq!(sim.cores()[0].predictor().stats().total_lookups(), 0);
}

// ══════════════════════════════════════════════════════════
// 3. Host protocol (mocked predictor)
// ══════════════════════════════════════════════════════════

#[test]
fn predict_then_update_at_same_cycle() {
    let mut mock = MockPredictor::new();
    let mut seq = Sequence::new();
    let _ = mock
        .expect_predict()
        .with(eq(0x1000), eq(BranchKind::DirectCall), eq(1))
        .times(1)
        .in_sequence(&mut seq)
        .return_const(Prediction {
            target: 0x5000,
            always_taken: true,
        });
    let _ = mock
        .expect_update()
        .with(
            eq(0x1000),
            eq(0x5000),
            eq(true),
            eq(BranchKind::DirectCall),
            eq(1),
        )
        .times(1)
        .in_sequence(&mut seq)
        .return_const(());

    let mut sim = Simulator::with_predictors(vec![mock]).unwrap();
    let prediction = sim.step(&BranchRecord {
        ip: 0x1000,
        target: 0x5000,
        taken: true,
        kind: BranchKind::DirectCall,
        core: 0,
    });
    assert_eq!(
        prediction,
        Some(Prediction {
            target: 0x5000,
            always_taken: true
        })
    );
    assert_eq!(sim.accuracy().mispredictions(), 0);
}

#[test]
fn wrong_target_is_counted_once_per_taken_branch() {
    let mut mock = MockPredictor::new();
    let _ = mock
        .expect_predict()
        .times(2)
        .return_const(Prediction::NO_TARGET);
    let _ = mock.expect_update().times(2).return_const(());

    let mut sim = Simulator::with_predictors(vec![mock]).unwrap();
    let _ = replay_mock(&mut sim, "0x10 0x20 T jmp\n0x10 0x14 N cond\n");
    assert_eq!(sim.accuracy().lookups(), 2);
    assert_eq!(sim.accuracy().mispredictions(), 1);
    assert_eq!(sim.accuracy().kind(BranchKind::Other).mispredictions, 1);
}

#[test]
fn cycles_advance_per_core() {
    let mut first = MockPredictor::new();
    let _ = first
        .expect_predict()
        .with(eq(0x10), eq(BranchKind::Other), eq(1))
        .times(1)
        .return_const(Prediction::NO_TARGET);
    let _ = first.expect_update().times(1).return_const(());

    let mut second = MockPredictor::new();
    for cycle in 1..=2 {
        let _ = second
            .expect_predict()
            .with(eq(0x10), eq(BranchKind::Other), eq(cycle))
            .times(1)
            .return_const(Prediction::NO_TARGET);
    }
    let _ = second.expect_update().times(2).return_const(());

    let mut sim = Simulator::with_predictors(vec![first, second]).unwrap();
    let replayed = replay_mock(
        &mut sim,
        "0x10 0x20 T jmp 1\n0x10 0x20 T jmp 0\n0x10 0x20 T jmp 1\n",
    );
    assert_eq!(replayed.unwrap(), 3);
}

fn replay_mock(sim: &mut Simulator<MockPredictor>, text: &str) -> Result<u64, SimError> {
    sim.run(&mut TraceReader::new(text.as_bytes()))
}
