//! Transition rules shared by lifecycle status enums.

use super::ValidationError;

/// A status enum whose legal moves form a directed graph.
///
/// Implementors list the edges; the checked move and terminal test come for
/// free. Self-loops are only legal if an implementor lists them, and
/// [`NotificationSessionStatus`](super::NotificationSessionStatus) does not.
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Display {
    /// Whether `target` is reachable from `self` in one step.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Every state reachable from `self` in one step.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Checked move. Returns the new state, or an error naming both ends.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if !self.can_transition_to(&target) {
            return Err(ValidationError::invalid_format(
                "status",
                format!("illegal transition {} -> {}", self, target),
            ));
        }
        Ok(target)
    }

    /// A state with no outgoing edges.
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
