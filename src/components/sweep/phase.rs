use serde::{Deserialize, Serialize};

/// Position of a sweep controller in its state machine.
///
/// `sweep` indexes the specification's secondary list and `index` the value within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SweepPhase {
    Idle,
    SetPose,
    Detare,
    ApplyZeroFlow,
    SettleTare,
    ApplyTestFlow,
    SetTrim,
    SecondaryApply { sweep: usize, index: usize },
    SecondaryMeasure { sweep: usize, index: usize },
    RevertTrim { sweep: usize },
    EmitRow,
    NextPrimaryStep,
    NextRun,
    Done,
    Cancelled,
    Aborted,
}

impl SweepPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SweepPhase::Done | SweepPhase::Cancelled | SweepPhase::Aborted
        )
    }
}

/// Outcome of one call to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SweepStatus {
    /// Waiting for the physics to advance one step
    Settling,
    Done,
    Cancelled,
}
