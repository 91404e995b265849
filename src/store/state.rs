//! The question store: root container of the quiz state tree.
//!
//! Cheap to clone; every clone shares the same tree. All mutation goes
//! through the actions defined here, each of which commits synchronously
//! and notifies listeners before returning.

use std::collections::VecDeque;
use std::sync::{Arc, Weak};
use std::time::SystemTime;

use parking_lot::Mutex;

use super::flow::FetchTracker;
use super::index::IdentityIndex;
use crate::config::StoreConfig;
use crate::model::{ModelError, Node, Question, QuestionSnapshot, StoreSnapshot};
use crate::services::QuestionApi;
use crate::tree::{action, ActionEvent, Computed, ListenerId, ListenerRegistry, Observable};

const QUESTIONS_PATH: &str = "QuestionStore.questions";

/// Services injected into a store at construction.
#[derive(Clone)]
pub struct Environment {
    pub api: Arc<dyn QuestionApi>,
}

impl Environment {
    pub fn new(api: Arc<dyn QuestionApi>) -> Self {
        Self { api }
    }
}

#[derive(Clone)]
pub struct QuestionStore {
    pub(super) inner: Arc<StoreInner>,
}

/// Non-owning handle, for listeners that must not keep the store alive.
#[derive(Clone)]
pub struct WeakQuestionStore {
    inner: Weak<StoreInner>,
}

impl WeakQuestionStore {
    pub fn upgrade(&self) -> Option<QuestionStore> {
        self.inner.upgrade().map(|inner| QuestionStore { inner })
    }
}

pub(super) struct StoreInner {
    questions: Observable<Arc<IdentityIndex<Question>>>,
    correct_count: Computed<usize>,
    pub(super) env: Environment,
    pub(super) config: StoreConfig,
    pub(super) fetches: FetchTracker,
    listeners: ListenerRegistry,
    action_log: Mutex<VecDeque<ActionEvent>>,
}

fn build_index(snapshots: Vec<QuestionSnapshot>) -> Result<IdentityIndex<Question>, ModelError> {
    let mut index = IdentityIndex::new(QUESTIONS_PATH);
    for snapshot in snapshots {
        index.register(Arc::new(Question::create(snapshot)?))?;
    }
    Ok(index)
}

impl QuestionStore {
    /// Create an empty store.
    pub fn new(env: Environment, config: StoreConfig) -> Self {
        Self::with_index(IdentityIndex::new(QUESTIONS_PATH), env, config)
    }

    /// Create a store populated from `snapshot`.
    ///
    /// # Errors
    /// Fails if any question is invalid or identifiers collide.
    pub fn from_snapshot(
        snapshot: StoreSnapshot,
        env: Environment,
        config: StoreConfig,
    ) -> Result<Self, ModelError> {
        let index = build_index(snapshot.questions)?;
        Ok(Self::with_index(index, env, config))
    }

    fn with_index(index: IdentityIndex<Question>, env: Environment, config: StoreConfig) -> Self {
        let inner = StoreInner {
            questions: Observable::new(QUESTIONS_PATH, Arc::new(index)),
            correct_count: Computed::new("QuestionStore.correctCount"),
            env,
            config,
            fetches: FetchTracker::default(),
            listeners: ListenerRegistry::default(),
            action_log: Mutex::new(VecDeque::new()),
        };
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Live questions in collection order.
    pub fn questions(&self) -> Vec<Arc<Question>> {
        self.inner.questions.with(|index| index.nodes().to_vec())
    }

    /// Look a question up by identifier.
    pub fn question(&self, id: &str) -> Option<Arc<Question>> {
        self.inner.questions.with(|index| index.lookup(id).cloned())
    }

    pub fn len(&self) -> usize {
        self.inner.questions.with(|index| index.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of questions whose guess matches the correct answer.
    ///
    /// Memoized; re-evaluated after a replace or any guess change.
    pub fn correct_count(&self) -> usize {
        self.inner.correct_count.get(|| {
            self.inner
                .questions
                .with(|index| index.iter().filter(|question| question.is_correct()).count())
        })
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            questions: self
                .inner
                .questions
                .with(|index| index.iter().map(|question| question.snapshot()).collect()),
        }
    }

    pub fn downgrade(&self) -> WeakQuestionStore {
        WeakQuestionStore {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Action: record the user's guess. Any string is accepted.
    pub fn set_guess(&self, question: &Question, guess: impl Into<String>) -> Result<(), ModelError> {
        let guess = guess.into();
        let owned = self.inner.questions.with(|index| {
            index
                .lookup(question.id())
                .is_some_and(|candidate| std::ptr::eq(candidate.as_ref(), question))
        });
        if !owned || !question.is_alive() {
            tracing::warn!(
                id = %question.id(),
                "Setting guess on a question that is no longer part of this store"
            );
        }

        self.commit("setGuess", Some(question.id().to_string()), || {
            question.guess_cell().set(guess)
        })
    }

    /// Action: build one question per snapshot and swap the whole collection.
    ///
    /// All or nothing: on any validation or duplicate-identifier error the
    /// previous collection is kept.
    pub fn replace_questions(&self, snapshots: Vec<QuestionSnapshot>) -> Result<usize, ModelError> {
        self.commit("replaceQuestions", None, || self.swap_questions(snapshots))
    }

    /// Action: replace the store's state with `snapshot`.
    pub fn apply_snapshot(&self, snapshot: StoreSnapshot) -> Result<(), ModelError> {
        self.commit("applySnapshot", None, || {
            self.swap_questions(snapshot.questions).map(drop)
        })
    }

    fn swap_questions(&self, snapshots: Vec<QuestionSnapshot>) -> Result<usize, ModelError> {
        let index = build_index(snapshots)?;
        let count = index.len();
        let previous = self.inner.questions.replace(Arc::new(index))?;
        for question in previous.iter() {
            question.detach();
        }

        tracing::info!(count, discarded = previous.len(), "Questions replaced");
        Ok(count)
    }

    /// Register a callback run after every committed action.
    pub fn subscribe<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&ActionEvent) + Send + Sync + 'static,
    {
        self.inner.listeners.subscribe(Arc::new(listener))
    }

    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.inner.listeners.unsubscribe(id)
    }

    /// Most recent committed actions, oldest first.
    pub fn action_log(&self) -> Vec<ActionEvent> {
        self.inner.action_log.lock().iter().cloned().collect()
    }

    fn commit<R>(
        &self,
        name: &'static str,
        target: Option<String>,
        f: impl FnOnce() -> Result<R, ModelError>,
    ) -> Result<R, ModelError> {
        // Inside another action, report once under the outermost action's name.
        let target = target.filter(|_| action::depth() == 0);
        let store = self.downgrade();
        let key = Arc::as_ptr(&self.inner) as usize;

        action::run(name, move || {
            action::on_commit(key, move |outer, writes| {
                if let Some(store) = store.upgrade() {
                    store.report(outer, target, writes);
                }
            });
            f()
        })
    }

    fn report(&self, name: &'static str, target: Option<String>, writes: &[String]) {
        if writes.is_empty() {
            return;
        }

        let event = ActionEvent {
            timestamp: SystemTime::now(),
            name,
            target,
            writes: writes.to_vec(),
        };
        tracing::debug!(action = name, writes = event.writes.len(), "Action committed");

        {
            let mut log = self.inner.action_log.lock();
            while log.len() >= self.inner.config.action_log_capacity.max(1) {
                log.pop_front();
            }
            log.push_back(event.clone());
        }
        self.inner.listeners.notify(&event);
    }
}

impl std::fmt::Debug for QuestionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuestionStore")
            .field("questions", &self.len())
            .field("fetch_policy", &self.inner.config.fetch_policy)
            .field("fetches_in_flight", &self.inner.fetches.in_flight())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{GetQuestionsResult, ProblemKind};
    use async_trait::async_trait;

    struct NoApi;

    #[async_trait]
    impl QuestionApi for NoApi {
        async fn get_questions(&self) -> GetQuestionsResult {
            GetQuestionsResult::Problem(ProblemKind::CannotConnect)
        }
    }

    fn store() -> QuestionStore {
        QuestionStore::new(Environment::new(Arc::new(NoApi)), StoreConfig::default())
    }

    fn snapshot(id: &str) -> QuestionSnapshot {
        QuestionSnapshot {
            id: id.to_string(),
            category: None,
            kind: "boolean".to_string(),
            difficulty: "easy".to_string(),
            question: Some(format!("Question {id}?")),
            correct_answer: Some("True".to_string()),
            incorrect_answers: vec!["False".to_string()],
            guess: String::new(),
        }
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = store();
        assert!(store.is_empty());
        assert_eq!(store.snapshot(), StoreSnapshot::default());
        assert!(store.action_log().is_empty());
    }

    #[test]
    fn test_replace_detaches_previous_questions() {
        let store = store();
        store.replace_questions(vec![snapshot("1")]).unwrap();
        let old = store.question("1").unwrap();

        store.replace_questions(vec![snapshot("1")]).unwrap();
        let new = store.question("1").unwrap();

        assert!(!old.is_alive());
        assert!(new.is_alive());
        assert!(!Arc::ptr_eq(&old, &new));
    }

    #[test]
    fn test_failed_action_is_not_logged() {
        let store = store();
        assert!(store
            .replace_questions(vec![snapshot("1"), snapshot("1")])
            .is_err());
        assert!(store.action_log().is_empty());
    }

    #[test]
    fn test_action_log_is_bounded() {
        let config = StoreConfig {
            action_log_capacity: 2,
            ..StoreConfig::default()
        };
        let store = QuestionStore::new(Environment::new(Arc::new(NoApi)), config);
        store.replace_questions(vec![snapshot("1")]).unwrap();
        let question = store.question("1").unwrap();
        store.set_guess(&question, "True").unwrap();
        store.set_guess(&question, "False").unwrap();

        let log = store.action_log();
        assert_eq!(log.len(), 2);
        assert!(log.iter().all(|event| event.name == "setGuess"));
        assert_eq!(log[1].target.as_deref(), Some("1"));
    }

    #[test]
    fn test_store_actions_inside_batch_report_once() {
        let store = store();
        action::run("batch", || {
            store.replace_questions(vec![snapshot("1")]).unwrap();
            let question = store.question("1").unwrap();
            store.set_guess(&question, "True").unwrap();
            assert!(store.action_log().is_empty());
        });

        let log = store.action_log();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].name, "batch");
        assert_eq!(log[0].target, None);
        assert_eq!(
            log[0].writes,
            vec!["QuestionStore.questions".to_string(), "Question(1).guess".to_string()]
        );
    }

    #[test]
    fn test_batch_without_writes_is_not_logged() {
        let store = store();
        action::run("batch", || {
            assert!(store.replace_questions(vec![snapshot("1"), snapshot("1")]).is_err());
        });
        assert!(store.action_log().is_empty());
    }
}
