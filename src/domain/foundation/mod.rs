//! Foundation module - Shared domain primitives.

mod errors;
mod state_machine;

pub use errors::DomainError;
pub use state_machine::StateMachine;
