//! Session processor port.
//!
//! The routine that advances a dispatched session: re-fetch, generate,
//! transition. It never returns an error; every outcome, including failure,
//! is reported as a [`ProcessingOutcome`].

use crate::domain::foundation::SessionId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::SessionJob;

/// Structured result of one processing run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ProcessingOutcome {
    /// Suggestions generated; session is AWAITING_REVIEW.
    Completed {
        session_id: SessionId,
        suggestions: usize,
    },
    /// Generation failed, timed out, or a store write failed. The session is
    /// FAILED unless marking it failed also hit the store error.
    Failed {
        session_id: SessionId,
        message: String,
    },
    /// No session for (id, company). Nothing was transitioned.
    NotFound { session_id: SessionId },
    /// Session already in flight or no longer PROCESSING.
    Skipped {
        session_id: SessionId,
        reason: String,
    },
}

impl ProcessingOutcome {
    pub fn session_id(&self) -> &SessionId {
        match self {
            ProcessingOutcome::Completed { session_id, .. }
            | ProcessingOutcome::Failed { session_id, .. }
            | ProcessingOutcome::NotFound { session_id }
            | ProcessingOutcome::Skipped { session_id, .. } => session_id,
        }
    }
}

/// Processor port.
#[async_trait]
pub trait SessionProcessor: Send + Sync {
    async fn process(&self, job: SessionJob) -> ProcessingOutcome;
}
