//! State machine trait for status enums.
//!
//! Provides a consistent interface for validating and performing state
//! transitions, used by the chat round trip to guard its progression.

use super::DomainError;

/// Trait for status enums that represent state machines.
///
/// Implementors define valid state transitions and get validated
/// transition methods for free.
///
/// # Example
///
/// ```ignore
/// impl StateMachine for DeliveryStatus {
///     fn can_transition_to(&self, target: &Self) -> bool {
///         matches!((self, target), (Queued, Sent) | (Sent, Delivered))
///     }
///
///     fn valid_transitions(&self) -> Vec<Self> {
///         match self {
///             Queued => vec![Sent],
///             Sent => vec![Delivered],
///             Delivered => vec![],
///         }
///     }
/// }
///
/// let next = DeliveryStatus::Queued.transition_to(DeliveryStatus::Sent)?;
/// ```
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns all valid target states from current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs transition with validation, returning error if invalid.
    ///
    /// This is the preferred way to change state, as it ensures
    /// the transition is valid according to the state machine rules.
    fn transition_to(&self, target: Self) -> Result<Self, DomainError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(DomainError::invalid_transition(format!(
                "Cannot transition from {:?} to {:?}",
                self, target
            )))
        }
    }

    /// Checks if current state is terminal (no valid outgoing transitions).
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
