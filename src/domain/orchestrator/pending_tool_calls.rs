//! Bookkeeping that pairs every requested tool call with exactly one result.

use crate::domain::conversation::{Message, ToolCallRequest, ToolResult};
use crate::domain::foundation::DomainError;

/// Tool calls from one assistant message awaiting their results.
///
/// Results are emitted in call order regardless of the order they were
/// recorded in.
#[derive(Debug, Clone)]
pub struct PendingToolCalls {
    slots: Vec<Slot>,
}

#[derive(Debug, Clone)]
struct Slot {
    call_id: String,
    content: Option<String>,
}

impl PendingToolCalls {
    pub fn new(calls: &[ToolCallRequest]) -> Self {
        Self {
            slots: calls
                .iter()
                .map(|c| Slot {
                    call_id: c.id.clone(),
                    content: None,
                })
                .collect(),
        }
    }

    /// Records a result against the first unanswered call with its id.
    ///
    /// # Errors
    ///
    /// Fails if no unanswered call carries the result's id.
    pub fn record(&mut self, result: ToolResult) -> Result<(), DomainError> {
        let slot = self
            .slots
            .iter_mut()
            .find(|s| s.call_id == result.call_id && s.content.is_none())
            .ok_or_else(|| {
                DomainError::invalid_format(
                    "tool_call_id",
                    format!("no pending call for id '{}'", result.call_id),
                )
            })?;
        slot.content = Some(result.content);
        Ok(())
    }

    /// Number of calls still awaiting a result.
    pub fn outstanding(&self) -> usize {
        self.slots.iter().filter(|s| s.content.is_none()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.outstanding() == 0
    }

    /// Converts the recorded results into tool messages, in call order.
    ///
    /// # Errors
    ///
    /// Fails if any call has not received a result.
    pub fn into_messages(self) -> Result<Vec<Message>, DomainError> {
        let outstanding = self.outstanding();
        if outstanding > 0 {
            return Err(DomainError::invalid_transition(format!(
                "{} tool call(s) still awaiting results",
                outstanding
            )));
        }

        Ok(self
            .slots
            .into_iter()
            .filter_map(|s| s.content.map(|content| Message::tool_result(s.call_id, content)))
            .collect())
    }
}
