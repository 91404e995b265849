//! Mock question services for flow tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::{oneshot, watch};
use trivia_store::services::{GetQuestionsResult, QuestionApi};

/// Returns the same result on every call and counts calls.
pub struct StaticApi {
    result: GetQuestionsResult,
    calls: AtomicUsize,
}

impl StaticApi {
    pub fn new(result: GetQuestionsResult) -> Self {
        Self {
            result,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuestionApi for StaticApi {
    async fn get_questions(&self) -> GetQuestionsResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.result.clone()
    }
}

/// Serves scripted results, each held back until its gate is released.
///
/// Call `n` (0-based) receives the `n`-th scripted result.
pub struct GatedApi {
    pending: Mutex<VecDeque<(GetQuestionsResult, oneshot::Receiver<()>)>>,
    calls: watch::Sender<usize>,
}

/// Test-side controls for a [`GatedApi`].
pub struct Gates {
    releases: Mutex<Vec<Option<oneshot::Sender<()>>>>,
    calls: watch::Receiver<usize>,
}

impl GatedApi {
    pub fn new(results: Vec<GetQuestionsResult>) -> (Self, Gates) {
        let mut pending = VecDeque::new();
        let mut releases = Vec::new();
        for result in results {
            let (release, gate) = oneshot::channel();
            pending.push_back((result, gate));
            releases.push(Some(release));
        }
        let (calls_tx, calls_rx) = watch::channel(0);
        (
            Self {
                pending: Mutex::new(pending),
                calls: calls_tx,
            },
            Gates {
                releases: Mutex::new(releases),
                calls: calls_rx,
            },
        )
    }
}

#[async_trait]
impl QuestionApi for GatedApi {
    async fn get_questions(&self) -> GetQuestionsResult {
        let next = self.pending.lock().pop_front();
        let Some((result, gate)) = next else {
            panic!("GatedApi called more often than scripted");
        };
        self.calls.send_modify(|calls| *calls += 1);
        let _ = gate.await;
        result
    }
}

impl Gates {
    /// Wait until the service has been called at least `count` times.
    pub async fn wait_for_calls(&self, count: usize) {
        let mut calls = self.calls.clone();
        calls
            .wait_for(|calls| *calls >= count)
            .await
            .expect("GatedApi dropped");
    }

    /// Let call `index` return.
    pub fn release(&self, index: usize) {
        if let Some(release) = self.releases.lock()[index].take() {
            let _ = release.send(());
        }
    }
}
