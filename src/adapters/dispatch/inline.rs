//! Inline dispatcher - runs processing in the caller's task.
//!
//! Used when async tasks are disabled. The request that dispatched the job
//! returns only after the session has been processed.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::foundation::DomainError;
use crate::ports::{SessionJob, SessionProcessor, WorkDispatcher};

/// Synchronous dispatcher.
pub struct InlineDispatcher {
    processor: Arc<dyn SessionProcessor>,
}

impl InlineDispatcher {
    pub fn new(processor: Arc<dyn SessionProcessor>) -> Self {
        Self { processor }
    }
}

#[async_trait]
impl WorkDispatcher for InlineDispatcher {
    async fn dispatch(&self, job: SessionJob) -> Result<(), DomainError> {
        let outcome = self.processor.process(job).await;
        debug!(session_id = %job.session_id, outcome = ?outcome, "inline processing finished");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{CompanyId, SessionId};
    use crate::ports::ProcessingOutcome;
    use std::sync::Mutex;
    use uuid::Uuid;

    struct FailingProcessor {
        seen: Mutex<Vec<SessionJob>>,
    }

    #[async_trait]
    impl SessionProcessor for FailingProcessor {
        async fn process(&self, job: SessionJob) -> ProcessingOutcome {
            self.seen.lock().unwrap().push(job);
            ProcessingOutcome::Failed {
                session_id: job.session_id,
                message: "boom".to_string(),
            }
        }
    }

    #[tokio::test]
    async fn runs_processor_before_returning_and_swallows_failure() {
        let processor = Arc::new(FailingProcessor {
            seen: Mutex::new(Vec::new()),
        });
        let dispatcher = InlineDispatcher::new(processor.clone());
        let job = SessionJob {
            session_id: SessionId::new(),
            company_id: CompanyId::from_uuid(Uuid::new_v4()),
        };

        dispatcher.dispatch(job).await.unwrap();

        assert_eq!(processor.seen.lock().unwrap().as_slice(), &[job]);
    }
}
