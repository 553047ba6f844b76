use btbsim_core::{BranchKind, Prediction, TargetPredictor};
use mockall::mock;

mock! {
    pub Predictor {}
    impl TargetPredictor for Predictor {
        fn predict(&mut self, ip: u64, kind: BranchKind, cycle: u64) -> Prediction;
        fn update(&mut self, ip: u64, target: u64, taken: bool, kind: BranchKind, cycle: u64);
        fn reset(&mut self);
    }
}
