//! Tool-selection strategies.
//!
//! The router delegates the "which tool, if any?" decision to a
//! [`ToolSelector`]. The production strategy asks the reasoning model and is
//! inherently non-deterministic across runs; tests inject a deterministic
//! strategy instead.

use std::sync::Arc;

use async_trait::async_trait;
use coachiq_model::{ChatMessage, Llm};
use tracing::{debug, warn};

use crate::error::{AgentError, Result};
use crate::router::ConversationTurn;
use crate::tool::ToolRegistry;

/// The action chosen for one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Route the question through the named tool.
    Tool(String),
    /// Answer the raw question directly, with no template.
    Direct,
}

/// A strategy that picks at most one tool for a question.
///
/// Implementations see the question, the registry's names and descriptions,
/// and the prior conversation turns. The contract is only that a single
/// action is chosen per turn; selection among multiple plausible tools may
/// vary between runs.
#[async_trait]
pub trait ToolSelector: Send + Sync {
    /// Choose an action for `question`.
    async fn select(
        &self,
        question: &str,
        registry: &ToolRegistry,
        history: &[ConversationTurn],
    ) -> Result<Decision>;
}

/// Asks the reasoning model to pick a tool by name.
///
/// The model sees each tool's name and description plus recent turns and
/// must reply with exactly one tool name, or `NONE` for a direct answer.
/// Unrecognized replies fall back to [`Decision::Direct`].
pub struct LlmToolSelector {
    llm: Arc<dyn Llm>,
    temperature: f32,
}

impl LlmToolSelector {
    /// Create a selector over the given model.
    pub fn new(llm: Arc<dyn Llm>, temperature: f32) -> Self {
        Self { llm, temperature }
    }

    fn build_prompt(
        question: &str,
        registry: &ToolRegistry,
        history: &[ConversationTurn],
    ) -> String {
        let mut prompt = String::from(
            "Pick the single best tool for the coach's question, or NONE if no tool fits.\n\
             Reply with the tool name only.\n\nTools:\n",
        );
        for tool in registry.iter() {
            prompt.push_str(&format!("- {}: {}\n", tool.name(), tool.description()));
        }
        if !history.is_empty() {
            prompt.push_str("\nEarlier turns:\n");
            for turn in history {
                prompt.push_str(&format!("Q: {}\nA: {}\n", turn.question, turn.answer.text));
            }
        }
        prompt.push_str(&format!("\nQuestion: {question}\n"));
        prompt
    }
}

#[async_trait]
impl ToolSelector for LlmToolSelector {
    async fn select(
        &self,
        question: &str,
        registry: &ToolRegistry,
        history: &[ConversationTurn],
    ) -> Result<Decision> {
        let prompt = Self::build_prompt(question, registry, history);
        let reply = self
            .llm
            .generate(&[ChatMessage::user(prompt)], self.temperature)
            .await
            .map_err(|e| AgentError::Selection(e.to_string()))?;

        let choice = reply.trim().trim_matches('"');
        if choice.eq_ignore_ascii_case("none") {
            return Ok(Decision::Direct);
        }
        match registry.get_ignore_case(choice) {
            Some(tool) => Ok(Decision::Tool(tool.name().to_string())),
            None => {
                warn!(reply = choice, "selector reply matched no tool, answering directly");
                Ok(Decision::Direct)
            }
        }
    }
}

/// Deterministic word-overlap selection, for tests and offline use.
///
/// Scores each tool by how many significant words from its name and
/// description appear in the question; the highest-scoring tool wins, first
/// registered breaking ties, and a zero score means a direct answer.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordToolSelector;

fn significant_words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric() && c != '-')
        .filter(|w| w.len() > 3)
        .map(|w| w.to_ascii_lowercase())
}

#[async_trait]
impl ToolSelector for KeywordToolSelector {
    async fn select(
        &self,
        question: &str,
        registry: &ToolRegistry,
        _history: &[ConversationTurn],
    ) -> Result<Decision> {
        let question_lower = question.to_ascii_lowercase();

        let mut best: Option<(&str, usize)> = None;
        for tool in registry.iter() {
            let vocabulary = format!("{} {}", tool.name(), tool.description());
            let score =
                significant_words(&vocabulary).filter(|w| question_lower.contains(w)).count();
            debug!(tool = tool.name(), score, "keyword selector score");
            if score > 0 && best.map_or(true, |(_, s)| score > s) {
                best = Some((tool.name(), score));
            }
        }

        Ok(match best {
            Some((name, _)) => Decision::Tool(name.to_string()),
            None => Decision::Direct,
        })
    }
}
