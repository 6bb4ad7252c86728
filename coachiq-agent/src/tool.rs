//! Analysis tools: named prompt-template wrappers over the answer engine.
//!
//! Each tool rewrites the user's question into a fixed analytical phrasing
//! before it reaches the answer engine. Tools hold no state of their own;
//! invoking one is `engine.answer(tool.expand(question), index)`.

use coachiq_rag::{Answer, AnswerEngine, Result, VectorIndex};
use tracing::info;

/// A named, described question-rewriting wrapper.
#[derive(Debug, Clone, Copy)]
pub struct AnalysisTool {
    name: &'static str,
    description: &'static str,
    template: fn(&str) -> String,
}

impl AnalysisTool {
    /// The tool's name, as presented to the selection strategy.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// What the tool does, as presented to the selection strategy.
    pub fn description(&self) -> &'static str {
        self.description
    }

    /// Rewrite a question into this tool's analytical phrasing.
    pub fn expand(&self, question: &str) -> String {
        (self.template)(question)
    }

    /// Run the tool: expand the question and forward it to the engine.
    ///
    /// The engine's result is returned unchanged.
    pub async fn invoke(
        &self,
        engine: &AnswerEngine,
        index: &VectorIndex,
        question: &str,
    ) -> Result<Answer> {
        info!(tool = self.name, "invoking analysis tool");
        engine.answer(&self.expand(question), index).await
    }
}

fn fast_break_template(question: &str) -> String {
    format!("Analyze fast-break patterns in the past 20 night games: {question}")
}

fn three_point_template(question: &str) -> String {
    format!("Analyze weak 3-point defense and suggest training: {question}")
}

fn counter_strategy_template(question: &str) -> String {
    format!("Suggest counter training strategies to beat fast-breaks: {question}")
}

/// The fixed set of analysis tools available to the router.
#[derive(Debug, Clone)]
pub struct ToolRegistry {
    tools: Vec<AnalysisTool>,
}

impl ToolRegistry {
    /// The standard CoachIQ registry: the three tactical analysis tools.
    pub fn standard() -> Self {
        Self {
            tools: vec![
                AnalysisTool {
                    name: "Fast Break Pattern Analyzer",
                    description: "Analyzes fast-break patterns in the game logs",
                    template: fast_break_template,
                },
                AnalysisTool {
                    name: "3-Point Defense Exploiter",
                    description: "Suggests how to exploit weak 3-point defense",
                    template: three_point_template,
                },
                AnalysisTool {
                    name: "Counter Strategy Recommender",
                    description: "Recommends defensive training activities",
                    template: counter_strategy_template,
                },
            ],
        }
    }

    /// Look up a tool by exact name.
    pub fn get(&self, name: &str) -> Option<&AnalysisTool> {
        self.tools.iter().find(|t| t.name == name)
    }

    /// Look up a tool by name, ignoring case.
    pub fn get_ignore_case(&self, name: &str) -> Option<&AnalysisTool> {
        self.tools.iter().find(|t| t.name.eq_ignore_ascii_case(name))
    }

    /// Iterate over the registered tools.
    pub fn iter(&self) -> impl Iterator<Item = &AnalysisTool> {
        self.tools.iter()
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
