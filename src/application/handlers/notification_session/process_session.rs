//! ProcessSessionHandler - advances a dispatched session.
//!
//! Runs the same way for inline and queued dispatch:
//!
//! 1. Re-fetch the session for (id, company). Missing → `NotFound`, nothing
//!    transitions.
//! 2. Skip if the session is already being processed here or is no longer
//!    PROCESSING, so a duplicated job cannot double-transition.
//! 3. Generate under the processing timeout.
//! 4. Re-fetch. If the topic or feedback changed while generating, the result
//!    is stale: generate again from the fresh copy, at most
//!    [`MAX_GENERATION_ROUNDS`] times.
//! 5. Success → store suggestions and an assistant message and move to
//!    AWAITING_REVIEW in one write. Error or timeout → FAILED.
//!
//! Errors never escape; they are reported in the [`ProcessingOutcome`]. When a
//! store call fails midway, the session is still moved to FAILED if it is
//! left in PROCESSING.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::domain::foundation::{NotificationSessionStatus, SessionId};
use crate::domain::notification::{NotificationSession, SessionError};
use crate::ports::{ProcessingOutcome, SessionJob, SessionProcessor, SuggestionGenerator};

use super::SessionLifecycle;

/// Default generation deadline.
pub const DEFAULT_PROCESSING_TIMEOUT: Duration = Duration::from_secs(300);

/// Generation attempts per job when review input keeps changing underneath it.
pub const MAX_GENERATION_ROUNDS: usize = 3;

/// Processor behind both dispatch strategies.
pub struct ProcessSessionHandler {
    lifecycle: SessionLifecycle,
    generator: Arc<dyn SuggestionGenerator>,
    timeout: Duration,
    in_flight: Arc<Mutex<HashSet<SessionId>>>,
}

impl ProcessSessionHandler {
    pub fn new(lifecycle: SessionLifecycle, generator: Arc<dyn SuggestionGenerator>) -> Self {
        Self {
            lifecycle,
            generator,
            timeout: DEFAULT_PROCESSING_TIMEOUT,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn claim(&self, id: SessionId) -> Option<InFlightGuard> {
        if !lock(&self.in_flight).insert(id) {
            return None;
        }
        Some(InFlightGuard {
            set: Arc::clone(&self.in_flight),
            id,
        })
    }

    async fn fetch(&self, job: &SessionJob) -> Result<Option<NotificationSession>, SessionError> {
        match self.lifecycle.get_session(&job.session_id, &job.company_id).await {
            Ok(session) => Ok(Some(session)),
            Err(SessionError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn run(&self, job: SessionJob) -> Result<ProcessingOutcome, SessionError> {
        let session_id = job.session_id;

        let Some(session) = self.fetch(&job).await? else {
            warn!(session_id = %session_id, "session vanished before processing");
            return Ok(ProcessingOutcome::NotFound { session_id });
        };

        let Some(_guard) = self.claim(session_id) else {
            return Ok(skipped(session_id, "already in flight"));
        };
        if session.status() != NotificationSessionStatus::Processing {
            return Ok(skipped(
                session_id,
                format!("status is {}", session.status()),
            ));
        }

        let mut basis = session;
        for round in 1..=MAX_GENERATION_ROUNDS {
            let generated =
                tokio::time::timeout(self.timeout, self.generator.generate(&basis)).await;

            // Re-read so review writes made during generation are kept.
            let Some(mut current) = self.fetch(&job).await? else {
                return Ok(ProcessingOutcome::NotFound { session_id });
            };
            if current.status() != NotificationSessionStatus::Processing {
                return Ok(skipped(
                    session_id,
                    format!("status changed to {} during generation", current.status()),
                ));
            }
            if inputs_changed(&basis, &current) {
                info!(
                    session_id = %session_id,
                    round,
                    topic_version = current.current_topic_version(),
                    "review input changed during generation, regenerating"
                );
                basis = current;
                continue;
            }

            let failure = match generated {
                Ok(Ok(suggestions)) => {
                    let count = suggestions.len();
                    match self.lifecycle.record_generation(&mut current, suggestions).await {
                        Ok(()) => {
                            return Ok(ProcessingOutcome::Completed {
                                session_id,
                                suggestions: count,
                            })
                        }
                        Err(SessionError::ConcurrentModification(_)) => {
                            // Written between our re-read and our write; start the round over.
                            continue;
                        }
                        Err(e) => return Err(e),
                    }
                }
                Ok(Err(e)) => e.message,
                Err(_) => format!(
                    "Processing timed out after {} seconds",
                    self.timeout.as_secs_f64()
                ),
            };

            return self.fail(current, failure).await;
        }

        let Some(current) = self.fetch(&job).await? else {
            return Ok(ProcessingOutcome::NotFound { session_id });
        };
        if current.status() != NotificationSessionStatus::Processing {
            return Ok(skipped(
                session_id,
                format!("status changed to {} during generation", current.status()),
            ));
        }
        self.fail(
            current,
            format!(
                "Session input kept changing over {} generation attempts",
                MAX_GENERATION_ROUNDS
            ),
        )
        .await
    }

    async fn fail(
        &self,
        mut session: NotificationSession,
        message: String,
    ) -> Result<ProcessingOutcome, SessionError> {
        error!(session_id = %session.id(), error = %message, "session processing failed");
        self.lifecycle
            .transition_status(&mut session, NotificationSessionStatus::Failed)
            .await?;
        Ok(ProcessingOutcome::Failed {
            session_id: *session.id(),
            message,
        })
    }

    /// Best-effort FAILED after `run` gave up on a store error.
    async fn mark_failed(&self, job: &SessionJob) {
        let mut session = match self.fetch(job).await {
            Ok(Some(session)) if session.status() == NotificationSessionStatus::Processing => {
                session
            }
            Ok(_) => return,
            Err(e) => {
                error!(session_id = %job.session_id, error = %e, "cannot reload session to mark it FAILED");
                return;
            }
        };

        if let Err(e) = self
            .lifecycle
            .transition_status(&mut session, NotificationSessionStatus::Failed)
            .await
        {
            error!(session_id = %job.session_id, error = %e, "failed to mark session FAILED");
        }
    }
}

#[async_trait]
impl SessionProcessor for ProcessSessionHandler {
    async fn process(&self, job: SessionJob) -> ProcessingOutcome {
        match self.run(job).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(session_id = %job.session_id, error = %e, "session processing aborted");
                self.mark_failed(&job).await;
                ProcessingOutcome::Failed {
                    session_id: job.session_id,
                    message: e.message(),
                }
            }
        }
    }
}

/// Whether the admin changed what generation should be based on.
fn inputs_changed(basis: &NotificationSession, current: &NotificationSession) -> bool {
    basis.current_topic_version() != current.current_topic_version()
        || basis.feedback_history().len() != current.feedback_history().len()
}

fn skipped(session_id: SessionId, reason: impl Into<String>) -> ProcessingOutcome {
    let reason = reason.into();
    info!(session_id = %session_id, reason = %reason, "skipping session");
    ProcessingOutcome::Skipped { session_id, reason }
}

fn lock(set: &Mutex<HashSet<SessionId>>) -> MutexGuard<'_, HashSet<SessionId>> {
    set.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Releases the in-flight claim when processing ends, however it ends.
struct InFlightGuard {
    set: Arc<Mutex<HashSet<SessionId>>>,
    id: SessionId,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        lock(&self.set).remove(&self.id);
    }
}
