//! NotificationSessionStatus enum for tracking the lifecycle of notification sessions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{StateMachine, ValidationError};

/// Lifecycle status of a notification session.
///
/// ```text
/// PROCESSING ──► AWAITING_REVIEW ──► COMPLETED
///     │  ▲            │
///     │  └────────────┤ (regeneration)
///     ▼               ▼
///   FAILED ◄──────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationSessionStatus {
    #[default]
    Processing,
    AwaitingReview,
    Completed,
    Failed,
}

impl NotificationSessionStatus {
    /// Wire and storage representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationSessionStatus::Processing => "PROCESSING",
            NotificationSessionStatus::AwaitingReview => "AWAITING_REVIEW",
            NotificationSessionStatus::Completed => "COMPLETED",
            NotificationSessionStatus::Failed => "FAILED",
        }
    }
}

impl StateMachine for NotificationSessionStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use NotificationSessionStatus::*;
        matches!(
            (self, target),
            (Processing, AwaitingReview)
                | (Processing, Failed)
                | (AwaitingReview, Completed)
                | (AwaitingReview, Processing)
                | (AwaitingReview, Failed)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use NotificationSessionStatus::*;
        match self {
            Processing => vec![AwaitingReview, Failed],
            AwaitingReview => vec![Completed, Processing, Failed],
            Completed | Failed => vec![],
        }
    }
}

impl fmt::Display for NotificationSessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for NotificationSessionStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PROCESSING" => Ok(NotificationSessionStatus::Processing),
            "AWAITING_REVIEW" => Ok(NotificationSessionStatus::AwaitingReview),
            "COMPLETED" => Ok(NotificationSessionStatus::Completed),
            "FAILED" => Ok(NotificationSessionStatus::Failed),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown session status '{}'", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use NotificationSessionStatus::*;

    const ALL: [NotificationSessionStatus; 4] = [Processing, AwaitingReview, Completed, Failed];

    #[test]
    fn default_is_processing() {
        assert_eq!(NotificationSessionStatus::default(), Processing);
    }

    #[test]
    fn processing_can_finish_or_fail() {
        assert!(Processing.can_transition_to(&AwaitingReview));
        assert!(Processing.can_transition_to(&Failed));
        assert!(!Processing.can_transition_to(&Completed));
    }

    #[test]
    fn awaiting_review_can_reenter_processing() {
        assert!(AwaitingReview.can_transition_to(&Processing));
        assert!(AwaitingReview.can_transition_to(&Completed));
        assert!(AwaitingReview.can_transition_to(&Failed));
    }

    #[test]
    fn terminal_states_accept_nothing() {
        for target in ALL {
            assert!(!Completed.can_transition_to(&target));
            assert!(!Failed.can_transition_to(&target));
        }
        assert!(Completed.is_terminal());
        assert!(Failed.is_terminal());
        assert!(!Processing.is_terminal());
        assert!(!AwaitingReview.is_terminal());
    }

    #[test]
    fn self_transitions_are_rejected() {
        for status in ALL {
            assert!(!status.can_transition_to(&status));
        }
    }

    #[test]
    fn can_transition_to_is_consistent_with_valid_transitions() {
        for status in ALL {
            for target in ALL {
                assert_eq!(
                    status.can_transition_to(&target),
                    status.valid_transitions().contains(&target),
                    "{:?} -> {:?}",
                    status,
                    target
                );
            }
        }
    }

    #[test]
    fn serializes_to_screaming_snake_case() {
        assert_eq!(
            serde_json::to_string(&AwaitingReview).unwrap(),
            "\"AWAITING_REVIEW\""
        );
        let parsed: NotificationSessionStatus = serde_json::from_str("\"FAILED\"").unwrap();
        assert_eq!(parsed, Failed);
    }

    #[test]
    fn from_str_matches_as_str() {
        for status in ALL {
            assert_eq!(status.as_str().parse::<NotificationSessionStatus>().unwrap(), status);
        }
        assert!("processing".parse::<NotificationSessionStatus>().is_err());
    }
}
