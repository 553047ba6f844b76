//! Branch Target Predictor Interface.
//!
//! This module defines the types exchanged between the host pipeline and a
//! target predictor, and the `TargetPredictor` trait every implementation
//! adheres to. The host calls `predict` at fetch time and `update` once the
//! branch resolves, passing its cycle counter to both.

use std::fmt;

/// Class of a control-flow instruction.
///
/// Each class is routed to exactly one predictor structure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BranchKind {
    /// Direct conditional branch.
    Conditional,
    /// Direct procedure call.
    DirectCall,
    /// Indirect procedure call.
    IndirectCall,
    /// Indirect jump that is not a call or return.
    Indirect,
    /// Procedure return.
    Return,
    /// Any other branch (direct unconditional jump).
    Other,
}

impl BranchKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Conditional,
        Self::DirectCall,
        Self::IndirectCall,
        Self::Indirect,
        Self::Return,
        Self::Other,
    ];

    /// Dense index of this kind, usable for per-kind counters.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Short trace mnemonic.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Conditional => "cond",
            Self::DirectCall => "call",
            Self::IndirectCall => "icall",
            Self::Indirect => "ind",
            Self::Return => "ret",
            Self::Other => "jmp",
        }
    }

    /// Parses a short mnemonic or a long name (case-insensitive).
    ///
    /// Returns `None` for unrecognised names.
    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name.to_ascii_lowercase().as_str() {
            "cond" | "conditional" | "branch" => Self::Conditional,
            "call" | "direct_call" | "directcall" => Self::DirectCall,
            "icall" | "indirect_call" | "indirectcall" => Self::IndirectCall,
            "ind" | "indirect" | "ijmp" => Self::Indirect,
            "ret" | "return" => Self::Return,
            "jmp" | "other" | "jump" | "direct_jump" => Self::Other,
            _ => return None,
        };
        Some(kind)
    }

    /// Returns `true` for direct and indirect calls (the kinds that push the RAS).
    #[inline]
    pub const fn is_call(self) -> bool {
        matches!(self, Self::DirectCall | Self::IndirectCall)
    }
}

impl fmt::Display for BranchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A target prediction handed back to fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Prediction {
    /// Predicted target address; 0 means no target is known.
    pub target: u64,
    /// Fetch should follow `target` without waiting for a direction prediction.
    pub always_taken: bool,
}

impl Prediction {
    /// The sentinel returned when no structure holds a target for the branch.
    pub const NO_TARGET: Self = Self {
        target: 0,
        always_taken: true,
    };
}

/// Trait for branch target prediction algorithms.
///
/// The host guarantees that, for one instance, `predict` and `update` for the
/// same dynamic branch are each called exactly once and never concurrently.
pub trait TargetPredictor {
    /// Predicts the target of the branch at `ip`.
    ///
    /// # Arguments
    ///
    /// * `ip` - Address of the branch instruction
    /// * `kind` - Class of the branch
    /// * `cycle` - Host cycle counter, used only as a recency timestamp
    fn predict(&mut self, ip: u64, kind: BranchKind, cycle: u64) -> Prediction;

    /// Trains the predictor with the resolved branch.
    ///
    /// # Arguments
    ///
    /// * `ip` - Address of the branch instruction
    /// * `target` - Resolved target address
    /// * `taken` - Whether the branch was taken
    /// * `kind` - Class of the branch
    /// * `cycle` - Host cycle counter
    fn update(&mut self, ip: u64, target: u64, taken: bool, kind: BranchKind, cycle: u64);

    /// Restores the freshly initialized state.
    fn reset(&mut self);
}
