//! The `fetch_questions` flow.
//!
//! A flow suspends exactly once, on the question service. Everything it
//! writes is written afterwards by a synchronous action, so no partially
//! applied state is ever visible across the await.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use tracing::Instrument;
use uuid::Uuid;

use super::state::QuestionStore;
use crate::config::FetchPolicy;
use crate::model::ModelError;
use crate::services::{GetQuestionsResult, ProblemKind};

/// How a `fetch_questions` run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The collection was replaced with `count` questions.
    Replaced { count: usize },
    /// The service reported a problem; the collection is unchanged.
    Failed { kind: ProblemKind },
    /// A newer run started while this one was waiting; its result was dropped.
    Superseded,
    /// Another run was in flight and the policy refuses overlap.
    Rejected,
}

/// Tickets and in-flight count for overlapping runs.
#[derive(Debug, Default)]
pub(super) struct FetchTracker {
    latest: AtomicU64,
    in_flight: AtomicUsize,
}

impl FetchTracker {
    fn begin(&self, policy: FetchPolicy) -> Option<u64> {
        if policy == FetchPolicy::RejectWhilePending {
            if self
                .in_flight
                .compare_exchange(0, 1, Ordering::AcqRel, Ordering::Acquire)
                .is_err()
            {
                return None;
            }
        } else {
            self.in_flight.fetch_add(1, Ordering::AcqRel);
        }
        Some(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    fn is_latest(&self, ticket: u64) -> bool {
        self.latest.load(Ordering::Acquire) == ticket
    }

    fn finish(&self) {
        self.in_flight.fetch_sub(1, Ordering::AcqRel);
    }

    pub(super) fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }
}

impl QuestionStore {
    /// Flow: fetch questions from the injected service and replace the
    /// collection with them.
    ///
    /// A non-"ok" result is logged and leaves the collection untouched.
    /// Overlapping runs follow the store's [`FetchPolicy`].
    ///
    /// # Errors
    /// Propagates validation and duplicate-identifier errors from the
    /// replace; the previous collection is kept.
    pub async fn fetch_questions(&self) -> Result<FetchOutcome, ModelError> {
        let policy = self.inner.config.fetch_policy;
        let Some(ticket) = self.inner.fetches.begin(policy) else {
            tracing::debug!("Fetch rejected, another fetch is in flight");
            return Ok(FetchOutcome::Rejected);
        };
        // Released even if the caller drops this future mid-await.
        let _in_flight = scopeguard::guard(&self.inner.fetches, |fetches| fetches.finish());

        let span = tracing::info_span!("fetch_questions", run = %Uuid::new_v4(), ticket);
        async move {
            let result = self.inner.env.api.get_questions().await;

            match result {
                GetQuestionsResult::Ok { questions } => {
                    if policy == FetchPolicy::Supersede && !self.inner.fetches.is_latest(ticket) {
                        tracing::debug!(
                            received = questions.len(),
                            "Discarding result of superseded fetch"
                        );
                        return Ok(FetchOutcome::Superseded);
                    }
                    self.replace_questions(questions)
                        .map(|count| FetchOutcome::Replaced { count })
                }
                GetQuestionsResult::Problem(kind) => {
                    tracing::warn!(
                        kind = %kind,
                        temporary = kind.is_temporary(),
                        "Fetching questions failed"
                    );
                    Ok(FetchOutcome::Failed { kind })
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Number of `fetch_questions` runs currently waiting on the service.
    pub fn fetches_in_flight(&self) -> usize {
        self.inner.fetches.in_flight()
    }
}
