//! Conversational router: one question in, one answer out.
//!
//! The [`Router`] holds the accumulating dialogue history and, per turn,
//! asks its [`ToolSelector`] which analysis tool to invoke (or none), runs
//! the chosen path through the answer engine, and appends the turn to
//! history on success. Failed turns leave history untouched and the router
//! usable for the next question.

use std::sync::Arc;

use coachiq_rag::{Answer, AnswerEngine, VectorIndex};
use tokio::sync::RwLock;
use tracing::{error, info};

use crate::error::{AgentError, Result};
use crate::selector::{Decision, ToolSelector};
use crate::tool::ToolRegistry;

/// One completed (question, answer) pair.
#[derive(Debug, Clone)]
pub struct ConversationTurn {
    /// The user's question, as asked.
    pub question: String,
    /// The answer produced for it, with its grounding segments.
    pub answer: Answer,
}

/// The per-turn dispatch component.
///
/// History is append-only and uncapped; appends go through an async lock so
/// the router stays correct even if turns were ever processed concurrently.
pub struct Router {
    engine: Arc<AnswerEngine>,
    index: Arc<VectorIndex>,
    registry: ToolRegistry,
    selector: Arc<dyn ToolSelector>,
    history: RwLock<Vec<ConversationTurn>>,
}

impl Router {
    /// Create a router over a built index.
    pub fn new(
        engine: Arc<AnswerEngine>,
        index: Arc<VectorIndex>,
        registry: ToolRegistry,
        selector: Arc<dyn ToolSelector>,
    ) -> Self {
        Self { engine, index, registry, selector, history: RwLock::new(Vec::new()) }
    }

    /// Handle one question: select a tool (or none), answer, record the turn.
    ///
    /// # Errors
    ///
    /// - [`AgentError::EmptyQuestion`] for an empty or whitespace-only
    ///   question, before any capability call is made.
    /// - [`AgentError::Selection`] if the selection strategy fails or names
    ///   a tool the registry does not contain.
    /// - [`AgentError::Turn`] wrapping any pipeline or service failure; the
    ///   history is left unchanged.
    pub async fn handle(&self, question: &str) -> Result<Answer> {
        let question = question.trim();
        if question.is_empty() {
            return Err(AgentError::EmptyQuestion);
        }

        let snapshot = self.history.read().await.clone();
        let decision = self.selector.select(question, &self.registry, &snapshot).await?;

        let outcome = match &decision {
            Decision::Tool(name) => {
                let tool = self.registry.get(name).ok_or_else(|| {
                    AgentError::Selection(format!("selector chose unknown tool '{name}'"))
                })?;
                tool.invoke(&self.engine, &self.index, question).await
            }
            Decision::Direct => {
                info!("no tool selected, answering directly");
                self.engine.answer(question, &self.index).await
            }
        };

        let answer = outcome.map_err(|source| {
            error!(error = %source, "turn failed, history unchanged");
            AgentError::Turn { source }
        })?;

        self.history
            .write()
            .await
            .push(ConversationTurn { question: question.to_string(), answer: answer.clone() });

        info!(turn = snapshot.len() + 1, "turn completed");
        Ok(answer)
    }

    /// A snapshot of the conversation so far, in turn order.
    pub async fn history(&self) -> Vec<ConversationTurn> {
        self.history.read().await.clone()
    }

    /// The tool registry this router dispatches over.
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }
}
