use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;

use trivia_store::config::Config;
use trivia_store::logging::init_tracing;
use trivia_store::model::Question;
use trivia_store::services::FixtureApi;
use trivia_store::store::{Environment, FetchOutcome, QuestionStore};

#[derive(Debug, Parser)]
#[command(name = "trivia-store", version, about = "Load a trivia question set and check guesses")]
struct Cli {
    /// Config file (default: the platform config dir).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Question fixture to fetch from; overrides `api.fixture_path`.
    #[arg(long)]
    questions: Option<PathBuf>,

    /// Guess for a question, as `ID=ANSWER`. Repeatable.
    #[arg(long = "guess", value_parser = parse_guess)]
    guesses: Vec<(String, String)>,

    /// Print the store snapshot as JSON instead of the question list.
    #[arg(long)]
    snapshot: bool,
}

fn parse_guess(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((id, answer)) if !id.is_empty() => Ok((id.to_string(), answer.to_string())),
        _ => Err(format!("expected ID=ANSWER, got '{raw}'")),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("loading config")?;
    init_tracing(&config.logging);

    let Some(fixture) = cli.questions.or(config.api.fixture_path) else {
        bail!("no question source: pass --questions or set api.fixture_path");
    };

    let env = Environment::new(Arc::new(FixtureApi::new(fixture)));
    let store = QuestionStore::new(env, config.store);

    match store.fetch_questions().await? {
        FetchOutcome::Replaced { count } => tracing::debug!(count, "Questions loaded"),
        FetchOutcome::Failed { kind } => bail!("fetching questions failed: {kind}"),
        other => bail!("fetch did not complete: {other:?}"),
    }

    for (id, answer) in cli.guesses {
        let Some(question) = store.question(&id) else {
            bail!("no question with id '{id}'");
        };
        store.set_guess(&question, answer)?;
    }

    if cli.snapshot {
        println!("{}", serde_json::to_string_pretty(&store.snapshot())?);
        return Ok(());
    }

    for question in store.questions() {
        print_question(&question);
    }
    println!("Score: {}/{}", store.correct_count(), store.len());
    Ok(())
}

fn print_question(question: &Question) {
    println!(
        "[{}] ({}, {}) {}",
        question.id(),
        question.difficulty(),
        question.kind(),
        question.question().unwrap_or("<no question text>")
    );

    let guess = question.guess();
    for answer in question.all_answers() {
        let marker = if answer == guess { '*' } else { ' ' };
        println!("  {marker} {answer}");
    }

    if guess.is_empty() {
        return;
    }
    if question.is_correct() {
        println!("  That is correct!");
    } else {
        println!(
            "  Wrong! The correct answer is: {}",
            question.correct_answer().unwrap_or("<unknown>")
        );
    }
}
