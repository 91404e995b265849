mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use trivia_store::config::StoreConfig;
use trivia_store::model::StoreSnapshot;
use trivia_store::services::{
    attach_autosave, hydrate, MemoryStorage, SnapshotStorage, StorageError,
};
use trivia_store::store::Environment;
use trivia_store::tree::action;

use common::mock_api::StaticApi;
use common::{boolean_question, ok, problem};

fn env() -> Environment {
    Environment::new(Arc::new(StaticApi::new(problem("cannot-connect"))))
}

#[test]
fn hydrate_without_saved_state_starts_empty() {
    let storage = MemoryStorage::new();
    let store = hydrate(&storage, env(), StoreConfig::default());
    assert!(store.is_empty());
}

#[test]
fn hydrate_restores_saved_state() {
    let storage = MemoryStorage::new();
    let mut answered = boolean_question("1");
    answered.guess = "True".to_string();
    storage
        .save(&StoreSnapshot {
            questions: vec![answered, boolean_question("2")],
        })
        .unwrap();

    let store = hydrate(&storage, env(), StoreConfig::default());
    assert_eq!(store.len(), 2);
    assert!(store.question("1").unwrap().is_correct());
    assert_eq!(store.correct_count(), 1);
}

#[test]
fn hydrate_with_corrupt_state_starts_empty() {
    let storage = MemoryStorage::new();
    storage.set_raw("not json at all");
    let store = hydrate(&storage, env(), StoreConfig::default());
    assert!(store.is_empty());
}

#[test]
fn hydrate_with_invalid_state_starts_empty() {
    let storage = MemoryStorage::new();
    storage.set_raw(
        r#"{"questions":[{"id":"1","type":"essay","difficulty":"easy"}]}"#,
    );
    let store = hydrate(&storage, env(), StoreConfig::default());
    assert!(store.is_empty());
}

#[tokio::test]
async fn autosave_follows_actions_and_flows() {
    let storage = Arc::new(MemoryStorage::new());
    let api = Arc::new(StaticApi::new(ok(vec![boolean_question("1")])));
    let store = common::store_with(api, Default::default());
    attach_autosave(&store, storage.clone());

    store.fetch_questions().await.unwrap();
    let saved = storage.load().unwrap().unwrap();
    assert_eq!(saved.questions.len(), 1);
    assert_eq!(saved.questions[0].guess, "");

    let question = store.question("1").unwrap();
    store.set_guess(&question, "True").unwrap();
    let saved = storage.load().unwrap().unwrap();
    assert_eq!(saved.questions[0].guess, "True");
    assert_eq!(saved, store.snapshot());
}

#[test]
fn autosave_sees_store_actions_run_inside_a_batch() {
    let storage = Arc::new(MemoryStorage::new());
    let store = hydrate(storage.as_ref(), env(), StoreConfig::default());
    attach_autosave(&store, storage.clone());
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    store.subscribe(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    action::run("batch", || {
        store.replace_questions(vec![boolean_question("1")]).unwrap();
        let question = store.question("1").unwrap();
        store.set_guess(&question, "True").unwrap();
    });

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(store.len(), 1);
    assert_eq!(storage.load().unwrap(), Some(store.snapshot()));
    assert_eq!(store.snapshot().questions[0].guess, "True");
}

struct FailingStorage;

impl SnapshotStorage for FailingStorage {
    fn load(&self) -> Result<Option<StoreSnapshot>, StorageError> {
        Err(StorageError::Backend("disk on fire".to_string()))
    }

    fn save(&self, _snapshot: &StoreSnapshot) -> Result<(), StorageError> {
        Err(StorageError::Backend("disk on fire".to_string()))
    }
}

#[test]
fn storage_failures_do_not_block_the_store() {
    let store = hydrate(&FailingStorage, env(), StoreConfig::default());
    attach_autosave(&store, Arc::new(FailingStorage));

    store.replace_questions(vec![boolean_question("1")]).unwrap();
    assert_eq!(store.len(), 1);
}

#[test]
fn autosave_does_not_keep_store_alive() {
    let storage = Arc::new(MemoryStorage::new());
    let store = hydrate(storage.as_ref(), env(), StoreConfig::default());
    attach_autosave(&store, storage.clone());
    let weak = store.downgrade();

    drop(store);
    assert!(weak.upgrade().is_none());
}
