//! Progress of a single chat round trip.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// Where the orchestrator is within one user turn.
///
/// ```text
/// AwaitingFirstResponse ──(no tool calls)──────────────────────────▶ Done
///          │
///          └──(tool calls)──▶ ExecutingTools ──▶ AwaitingFinalResponse ──▶ Done
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrchestratorState {
    /// First completion request (with tools) is in flight.
    #[default]
    AwaitingFirstResponse,
    /// Tool calls are being dispatched.
    ExecutingTools,
    /// Second completion request (without tools) is in flight.
    AwaitingFinalResponse,
    /// A reply has been produced.
    Done,
}

impl StateMachine for OrchestratorState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use OrchestratorState::*;
        matches!(
            (self, target),
            (AwaitingFirstResponse, ExecutingTools)
                | (AwaitingFirstResponse, Done)
                | (ExecutingTools, AwaitingFinalResponse)
                | (AwaitingFinalResponse, Done)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use OrchestratorState::*;
        match self {
            AwaitingFirstResponse => vec![ExecutingTools, Done],
            ExecutingTools => vec![AwaitingFinalResponse],
            AwaitingFinalResponse => vec![Done],
            Done => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [OrchestratorState; 4] = [
        OrchestratorState::AwaitingFirstResponse,
        OrchestratorState::ExecutingTools,
        OrchestratorState::AwaitingFinalResponse,
        OrchestratorState::Done,
    ];

    #[test]
    fn starts_awaiting_first_response() {
        assert_eq!(
            OrchestratorState::default(),
            OrchestratorState::AwaitingFirstResponse
        );
    }

    #[test]
    fn direct_reply_path_is_valid() {
        let state = OrchestratorState::AwaitingFirstResponse;
        assert_eq!(
            state.transition_to(OrchestratorState::Done),
            Ok(OrchestratorState::Done)
        );
    }

    #[test]
    fn tool_path_is_valid() {
        let state = OrchestratorState::AwaitingFirstResponse
            .transition_to(OrchestratorState::ExecutingTools)
            .and_then(|s| s.transition_to(OrchestratorState::AwaitingFinalResponse))
            .and_then(|s| s.transition_to(OrchestratorState::Done));
        assert_eq!(state, Ok(OrchestratorState::Done));
    }

    #[test]
    fn cannot_loop_back_into_tools() {
        assert!(OrchestratorState::AwaitingFinalResponse
            .transition_to(OrchestratorState::ExecutingTools)
            .is_err());
        assert!(OrchestratorState::ExecutingTools
            .transition_to(OrchestratorState::Done)
            .is_err());
    }

    #[test]
    fn only_done_is_terminal() {
        for state in ALL {
            assert_eq!(state.is_terminal(), state == OrchestratorState::Done);
        }
    }

    #[test]
    fn can_transition_to_is_consistent_with_valid_transitions() {
        for state in ALL {
            for target in ALL {
                assert_eq!(
                    state.can_transition_to(&target),
                    state.valid_transitions().contains(&target),
                    "{:?} -> {:?}",
                    state,
                    target
                );
            }
        }
    }
}
