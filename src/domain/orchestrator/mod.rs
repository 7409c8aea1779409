//! Chat round-trip rules: the state machine and tool-result bookkeeping
//! used by the application-level orchestrator.

mod pending_tool_calls;
mod state;

pub use pending_tool_calls::PendingToolCalls;
pub use state::OrchestratorState;
