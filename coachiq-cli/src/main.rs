//! CoachIQ console: upload a game log, ask tactical questions.
//!
//! Usage: `coachiq <game_log.txt>`
//!
//! Requires: `GOOGLE_API_KEY` environment variable (a `.env` file works).

use std::io::{BufRead, Write};
use std::sync::Arc;

use anyhow::Context;
use coachiq_agent::{AgentError, Session};
use coachiq_model::GeminiModel;
use coachiq_rag::{GeminiEmbeddingProvider, RagConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let path = std::env::args()
        .nth(1)
        .context("usage: coachiq <game_log.txt> — upload Team X's night game data")?;
    let upload = std::fs::read(&path).with_context(|| format!("failed to read {path}"))?;

    let api_key = std::env::var("GOOGLE_API_KEY")
        .context("GOOGLE_API_KEY must be set (get a key at https://aistudio.google.com/apikey)")?;

    let config = RagConfig::default();
    let embedder = Arc::new(
        GeminiEmbeddingProvider::new(&api_key)?.with_model(config.embedding_model.clone()),
    );
    let llm = Arc::new(GeminiModel::new(&api_key, config.reasoning_model.clone())?);

    println!("Analyzing game logs...");
    let session = Session::builder()
        .config(config)
        .embedder(embedder)
        .llm(llm)
        .open(upload)
        .await
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    println!("CoachIQ ready. Ask tactical questions (e.g. \"What are their weaknesses?\").");
    println!("Type 'exit' to quit.\n");

    let stdin = std::io::stdin();
    loop {
        print!("coach> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let question = line.trim();
        if question.eq_ignore_ascii_case("exit") || question.eq_ignore_ascii_case("quit") {
            break;
        }

        match session.ask(question).await {
            Ok(answer) => {
                println!("\n{}\n", answer.text);
                let ids: Vec<&str> =
                    answer.segments.iter().map(|r| r.segment.id.as_str()).collect();
                println!("[grounded on segments: {}]\n", ids.join(", "));
            }
            Err(AgentError::EmptyQuestion) => {
                println!("Please type a question.\n");
            }
            Err(e) => {
                eprintln!("That turn failed ({e}). Please try again.\n");
            }
        }
    }

    Ok(())
}
