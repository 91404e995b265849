//! Shared test utilities and mock infrastructure.

#![allow(dead_code, unused_imports)]

pub mod mock_api;

use std::sync::Arc;

use trivia_store::config::{FetchPolicy, StoreConfig};
use trivia_store::model::QuestionSnapshot;
use trivia_store::services::{GetQuestionsResult, ProblemKind, QuestionApi};
use trivia_store::store::{Environment, QuestionStore};

use mock_api::StaticApi;

/// Boolean question with "True" as the correct answer.
pub fn boolean_question(id: &str) -> QuestionSnapshot {
    QuestionSnapshot {
        id: id.to_string(),
        category: None,
        kind: "boolean".to_string(),
        difficulty: "easy".to_string(),
        question: Some(format!("Is {id} a number?")),
        correct_answer: Some("True".to_string()),
        incorrect_answers: vec!["False".to_string()],
        guess: String::new(),
    }
}

pub fn multiple_question(id: &str, correct: &str, incorrect: &[&str]) -> QuestionSnapshot {
    QuestionSnapshot {
        id: id.to_string(),
        category: Some("General Knowledge".to_string()),
        kind: "multiple".to_string(),
        difficulty: "medium".to_string(),
        question: Some(format!("Question {id}")),
        correct_answer: Some(correct.to_string()),
        incorrect_answers: incorrect.iter().map(|answer| answer.to_string()).collect(),
        guess: String::new(),
    }
}

pub fn ok(questions: Vec<QuestionSnapshot>) -> GetQuestionsResult {
    GetQuestionsResult::Ok { questions }
}

pub fn problem(tag: &str) -> GetQuestionsResult {
    GetQuestionsResult::Problem(ProblemKind::from(tag))
}

pub fn store_with(api: Arc<dyn QuestionApi>, policy: FetchPolicy) -> QuestionStore {
    let config = StoreConfig {
        fetch_policy: policy,
        ..StoreConfig::default()
    };
    QuestionStore::new(Environment::new(api), config)
}

/// Store whose service always fails; for tests that only use actions.
pub fn offline_store() -> QuestionStore {
    store_with(
        Arc::new(StaticApi::new(problem("cannot-connect"))),
        FetchPolicy::default(),
    )
}
