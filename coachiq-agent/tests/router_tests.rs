//! End-to-end session and router scenarios against mocked capabilities.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use coachiq_agent::{AgentError, Decision, KeywordToolSelector, Session, ToolRegistry, ToolSelector};
use coachiq_model::{MockLlm, ModelError};
use coachiq_rag::{EmbeddingProvider, RagConfig, RagError};

const DIM: usize = 4;
const GAME_LOG: &str = "Team X ran 12 fast breaks. Team X missed 8 of 10 three-pointers.";

/// Deterministic toy embedding: byte histogram folded into `DIM` buckets.
fn embed_text(text: &str) -> Vec<f32> {
    let mut v = vec![0.0f32; DIM];
    for (i, b) in text.bytes().enumerate() {
        v[i % DIM] += f32::from(b) / 255.0;
    }
    v
}

/// A call-counting deterministic embedder.
struct StubEmbedder {
    calls: AtomicUsize,
}

impl StubEmbedder {
    fn new() -> Self {
        Self { calls: AtomicUsize::new(0) }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for StubEmbedder {
    async fn embed(&self, text: &str) -> coachiq_rag::Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(embed_text(text))
    }

    fn dimensions(&self) -> usize {
        DIM
    }

    fn name(&self) -> &str {
        "stub"
    }
}

/// A selector that always returns the same decision.
struct FixedSelector(Decision);

#[async_trait]
impl ToolSelector for FixedSelector {
    async fn select(
        &self,
        _question: &str,
        _registry: &ToolRegistry,
        _history: &[coachiq_agent::ConversationTurn],
    ) -> coachiq_agent::Result<Decision> {
        Ok(self.0.clone())
    }
}

async fn open_session(
    embedder: Arc<StubEmbedder>,
    llm: Arc<MockLlm>,
    selector: Arc<dyn ToolSelector>,
) -> Session {
    Session::builder()
        .config(RagConfig::default())
        .embedder(embedder)
        .llm(llm)
        .selector(selector)
        .open(GAME_LOG.as_bytes().to_vec())
        .await
        .unwrap()
}

#[tokio::test]
async fn short_upload_answers_from_its_single_segment() {
    let embedder = Arc::new(StubEmbedder::new());
    let llm = Arc::new(MockLlm::new().with_response("Their transition defense is weak."));
    let session = open_session(embedder, llm, Arc::new(KeywordToolSelector)).await;

    let answer = session.ask("What is Team X's weakness?").await.unwrap();

    assert!(!answer.text.is_empty());
    // chunk_size 1000 > text length, so the whole log is one segment.
    assert_eq!(answer.segments.len(), 1);
    assert_eq!(answer.segments[0].segment.text, GAME_LOG);

    let history = session.history().await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].question, "What is Team X's weakness?");
}

#[tokio::test]
async fn tool_selection_templates_the_question() {
    let embedder = Arc::new(StubEmbedder::new());
    let llm = Arc::new(MockLlm::new().with_response("Fall back two guards after every shot."));
    let selector = Arc::new(FixedSelector(Decision::Tool("Fast Break Pattern Analyzer".into())));
    let session = open_session(embedder, llm.clone(), selector).await;

    session.ask("How do they start fast breaks?").await.unwrap();

    // The engine prompt must carry the tool's analytical phrasing.
    let requests = llm.requests();
    assert_eq!(requests.len(), 1);
    let prompt = &requests[0].last().unwrap().content;
    assert!(prompt.contains("Analyze fast-break patterns in the past 20 night games:"));
    assert!(prompt.contains("How do they start fast breaks?"));
}

#[tokio::test]
async fn empty_question_is_rejected_before_any_capability_call() {
    let embedder = Arc::new(StubEmbedder::new());
    let llm = Arc::new(MockLlm::new());
    let session = open_session(embedder.clone(), llm.clone(), Arc::new(KeywordToolSelector)).await;

    let calls_after_ingest = embedder.call_count();

    let err = session.ask("   ").await.unwrap_err();
    assert!(matches!(err, AgentError::EmptyQuestion));
    assert_eq!(embedder.call_count(), calls_after_ingest);
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn failed_turn_leaves_history_unchanged_and_session_usable() {
    let embedder = Arc::new(StubEmbedder::new());
    // First turn: reasoning fails permanently. Second turn: succeeds.
    let llm = Arc::new(
        MockLlm::new()
            .with_error(ModelError::Auth("revoked key".into()))
            .with_response("Attack the rim early."),
    );
    let session =
        open_session(embedder, llm, Arc::new(FixedSelector(Decision::Direct))).await;

    let err = session.ask("How can we beat Team X?").await.unwrap_err();
    assert!(matches!(err, AgentError::Turn { source: RagError::Reasoning { .. } }));
    assert!(err.is_turn_scoped());
    assert!(session.history().await.is_empty());

    let answer = session.ask("How can we beat Team X?").await.unwrap();
    assert_eq!(answer.text, "Attack the rim early.");

    let history = session.history().await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].answer.text, "Attack the rim early.");
}

#[tokio::test]
async fn unknown_tool_choice_is_a_selection_error() {
    let embedder = Arc::new(StubEmbedder::new());
    let llm = Arc::new(MockLlm::new());
    let selector = Arc::new(FixedSelector(Decision::Tool("Dunk Calculator".into())));
    let session = open_session(embedder, llm, selector).await;

    let err = session.ask("Can they dunk?").await.unwrap_err();
    assert!(matches!(err, AgentError::Selection(_)));
    assert!(session.history().await.is_empty());
}

#[tokio::test]
async fn invalid_utf8_upload_fails_before_session_exists() {
    let err = Session::builder()
        .config(RagConfig::default())
        .embedder(Arc::new(StubEmbedder::new()))
        .llm(Arc::new(MockLlm::new()))
        .open(vec![0xff, 0xfe, 0x00])
        .await
        .err()
        .expect("upload must fail");

    assert!(matches!(err, AgentError::Upload { source: RagError::Decode(_) }));
    assert!(!err.is_turn_scoped());
}

#[tokio::test]
async fn empty_upload_fails_before_session_exists() {
    let err = Session::builder()
        .config(RagConfig::default())
        .embedder(Arc::new(StubEmbedder::new()))
        .llm(Arc::new(MockLlm::new()))
        .open(Vec::new())
        .await
        .err()
        .expect("upload must fail");

    assert!(matches!(err, AgentError::Upload { source: RagError::EmptyInput }));
}
