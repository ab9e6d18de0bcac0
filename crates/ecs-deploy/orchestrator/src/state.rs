//! Run state machine

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a deployment run currently is.
///
/// ```text
/// Idle -> Registering -> Registered -> UpdatingService -------------> Waiting -> Done
///                                   \-> CreatingControllerDeployment -^
/// ```
///
/// Any non-terminal state may move to `Failed`. Waiting is skipped when the
/// wait policy is off, and a run without a service ends right after
/// registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    #[default]
    Idle,
    Registering,
    Registered,
    UpdatingService,
    CreatingControllerDeployment,
    Waiting,
    Done,
    Failed,
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Done | RunState::Failed)
    }

    pub fn can_transition_to(&self, target: &RunState) -> bool {
        use RunState::*;

        if *target == Failed {
            return !self.is_terminal();
        }

        matches!(
            (self, target),
            (Idle, Registering)
                | (Registering, Registered)
                | (Registered, UpdatingService)
                | (Registered, CreatingControllerDeployment)
                | (Registered, Done)
                | (UpdatingService, Waiting)
                | (UpdatingService, Done)
                | (CreatingControllerDeployment, Waiting)
                | (CreatingControllerDeployment, Done)
                | (Waiting, Done)
        )
    }

    pub const fn name(&self) -> &'static str {
        match self {
            RunState::Idle => "idle",
            RunState::Registering => "registering",
            RunState::Registered => "registered",
            RunState::UpdatingService => "updating_service",
            RunState::CreatingControllerDeployment => "creating_controller_deployment",
            RunState::Waiting => "waiting",
            RunState::Done => "done",
            RunState::Failed => "failed",
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_paths() {
        let direct = [
            RunState::Idle,
            RunState::Registering,
            RunState::Registered,
            RunState::UpdatingService,
            RunState::Waiting,
            RunState::Done,
        ];
        for pair in direct.windows(2) {
            assert!(pair[0].can_transition_to(&pair[1]), "{} -> {}", pair[0], pair[1]);
        }

        assert!(RunState::Registered.can_transition_to(&RunState::CreatingControllerDeployment));
        assert!(RunState::CreatingControllerDeployment.can_transition_to(&RunState::Waiting));
        assert!(RunState::Registered.can_transition_to(&RunState::Done));
    }

    #[test]
    fn test_failure_from_any_live_state() {
        for state in [
            RunState::Idle,
            RunState::Registering,
            RunState::Registered,
            RunState::UpdatingService,
            RunState::CreatingControllerDeployment,
            RunState::Waiting,
        ] {
            assert!(state.can_transition_to(&RunState::Failed));
        }
        assert!(!RunState::Done.can_transition_to(&RunState::Failed));
        assert!(!RunState::Failed.can_transition_to(&RunState::Failed));
    }

    #[test]
    fn test_no_skipping_registration() {
        assert!(!RunState::Idle.can_transition_to(&RunState::UpdatingService));
        assert!(!RunState::Registering.can_transition_to(&RunState::Waiting));
        assert!(!RunState::UpdatingService.can_transition_to(&RunState::CreatingControllerDeployment));
        assert!(!RunState::Done.can_transition_to(&RunState::Idle));
    }
}
