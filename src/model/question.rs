//! The `Question` node: a trivia question with several answer choices.

use std::sync::atomic::{AtomicBool, Ordering};

use rand::seq::SliceRandom;
use rand::Rng;

use super::error::ModelError;
use super::schema::{Difficulty, Enumeration, QuestionType};
use super::snapshot::{Node, QuestionSnapshot};
use crate::tree::{Computed, Observable};

/// A live question instance.
///
/// Only `guess` is mutable, through the store's `set_guess` action. The
/// identifier never changes after construction.
#[derive(Debug)]
pub struct Question {
    id: String,
    category: Option<String>,
    kind: QuestionType,
    difficulty: Difficulty,
    question: Option<String>,
    correct_answer: Option<String>,
    incorrect_answers: Vec<String>,
    guess: Observable<String>,
    is_correct: Computed<bool>,
    detached: AtomicBool,
}

impl Question {
    pub fn create(snapshot: QuestionSnapshot) -> Result<Self, ModelError> {
        let kind = QuestionType::parse(Self::NAME, "type", &snapshot.kind)?;
        let difficulty = Difficulty::parse(Self::NAME, "difficulty", &snapshot.difficulty)?;
        let guess = Observable::new(format!("Question({}).guess", snapshot.id), snapshot.guess);

        Ok(Self {
            id: snapshot.id,
            category: snapshot.category,
            kind,
            difficulty,
            question: snapshot.question,
            correct_answer: snapshot.correct_answer,
            incorrect_answers: snapshot.incorrect_answers,
            guess,
            is_correct: Computed::new("Question.isCorrect"),
            detached: AtomicBool::new(false),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn kind(&self) -> QuestionType {
        self.kind
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn question(&self) -> Option<&str> {
        self.question.as_deref()
    }

    pub fn correct_answer(&self) -> Option<&str> {
        self.correct_answer.as_deref()
    }

    pub fn incorrect_answers(&self) -> &[String] {
        &self.incorrect_answers
    }

    pub fn guess(&self) -> String {
        self.guess.get()
    }

    /// The guess cell. Writing it directly outside an action fails with
    /// [`ModelError::IllegalMutation`].
    pub fn guess_cell(&self) -> &Observable<String> {
        &self.guess
    }

    /// Incorrect answers plus the correct one, freshly shuffled on every call.
    ///
    /// Never cached: callers re-rendering for unrelated reasons get a new
    /// order each time. A question without a correct answer yields only its
    /// incorrect answers.
    pub fn all_answers(&self) -> Vec<String> {
        self.all_answers_with(&mut rand::thread_rng())
    }

    pub fn all_answers_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<String> {
        let mut answers = self.incorrect_answers.clone();
        answers.extend(self.correct_answer.iter().cloned());
        answers.shuffle(rng);
        answers
    }

    /// Exact, case- and whitespace-sensitive comparison of guess and answer.
    pub fn is_correct(&self) -> bool {
        self.is_correct.get(|| {
            self.guess
                .with(|guess| self.correct_answer.as_deref() == Some(guess.as_str()))
        })
    }

    /// False once a collection replace has discarded this question.
    pub fn is_alive(&self) -> bool {
        !self.detached.load(Ordering::Acquire)
    }

    pub(crate) fn detach(&self) {
        self.detached.store(true, Ordering::Release);
    }
}

impl Node for Question {
    const NAME: &'static str = "Question";
    const REQUIRED: &'static [&'static str] = &["id", "type", "difficulty"];

    type Snapshot = QuestionSnapshot;

    fn create(snapshot: QuestionSnapshot) -> Result<Self, ModelError> {
        Question::create(snapshot)
    }

    fn snapshot(&self) -> QuestionSnapshot {
        QuestionSnapshot {
            id: self.id.clone(),
            category: self.category.clone(),
            kind: self.kind.as_str().to_string(),
            difficulty: self.difficulty.as_str().to_string(),
            question: self.question.clone(),
            correct_answer: self.correct_answer.clone(),
            incorrect_answers: self.incorrect_answers.clone(),
            guess: self.guess.get(),
        }
    }
}
