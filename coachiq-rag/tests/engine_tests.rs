//! Answer-engine tests against mocked capabilities.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use coachiq_model::{MockLlm, ModelError};
use coachiq_rag::{
    AnswerEngine, EmbeddingProvider, RagConfig, RagError, Result, Segment, VectorIndex,
};

const DIM: usize = 4;

/// Deterministic toy embedding: byte histogram folded into `DIM` buckets.
fn embed_text(text: &str) -> Vec<f32> {
    let mut v = vec![0.0f32; DIM];
    for (i, b) in text.bytes().enumerate() {
        v[i % DIM] += f32::from(b) / 255.0;
    }
    v
}

/// An embedder that counts calls and optionally fails a scripted number of
/// times before succeeding.
struct StubEmbedder {
    calls: AtomicUsize,
    failures_before_success: AtomicUsize,
}

impl StubEmbedder {
    fn new() -> Self {
        Self { calls: AtomicUsize::new(0), failures_before_success: AtomicUsize::new(0) }
    }

    fn failing(times: usize) -> Self {
        Self { calls: AtomicUsize::new(0), failures_before_success: AtomicUsize::new(times) }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for StubEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let remaining = self.failures_before_success.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures_before_success.store(remaining - 1, Ordering::SeqCst);
            return Err(RagError::ServiceUnavailable {
                provider: "stub".into(),
                message: "simulated outage".into(),
            });
        }
        Ok(embed_text(text))
    }

    fn dimensions(&self) -> usize {
        DIM
    }

    fn name(&self) -> &str {
        "stub"
    }
}

fn segment(id: &str, text: &str) -> Segment {
    Segment {
        id: id.to_string(),
        text: text.to_string(),
        embedding: embed_text(text),
        source_offset: 0,
        document_id: "log".to_string(),
    }
}

fn game_log_index() -> VectorIndex {
    VectorIndex::build(vec![
        segment("log_0", "Team X ran 12 fast breaks in the first half."),
        segment("log_1", "Team X missed 8 of 10 three-pointers."),
        segment("log_2", "Their center committed four early fouls."),
    ])
    .unwrap()
}

fn fast_config() -> RagConfig {
    RagConfig::builder()
        .top_k(2)
        .request_timeout(Duration::from_secs(5))
        .max_retries(2)
        .build()
        .unwrap()
}

fn engine(embedder: Arc<StubEmbedder>, llm: Arc<MockLlm>) -> AnswerEngine {
    AnswerEngine::builder().config(fast_config()).embedder(embedder).llm(llm).build().unwrap()
}

#[tokio::test]
async fn answer_carries_exactly_the_retrieved_segments() {
    let embedder = Arc::new(StubEmbedder::new());
    let llm = Arc::new(MockLlm::new().with_response("Crash the defensive boards."));
    let index = game_log_index();
    let engine = engine(embedder.clone(), llm.clone());

    let question = "How do we stop their transition game?";
    let answer = engine.answer(question, &index).await.unwrap();

    assert_eq!(answer.text, "Crash the defensive boards.");

    // The audit trail must be exactly what retrieval returned.
    let expected = index.query(&embed_text(question), 2).unwrap();
    assert_eq!(answer.segments.len(), expected.len());
    for (got, want) in answer.segments.iter().zip(&expected) {
        assert_eq!(got.segment.id, want.segment.id);
        assert_eq!(got.distance, want.distance);
    }

    // Retrieved text must appear in the model prompt.
    let requests = llm.requests();
    assert_eq!(requests.len(), 1);
    let prompt = &requests[0].last().unwrap().content;
    for result in &answer.segments {
        assert!(prompt.contains(&result.segment.text));
    }
    assert!(prompt.contains(question));
}

#[tokio::test]
async fn empty_question_makes_no_external_calls() {
    let embedder = Arc::new(StubEmbedder::new());
    let llm = Arc::new(MockLlm::new());
    let engine = engine(embedder.clone(), llm.clone());

    let err = engine.answer("   ", &game_log_index()).await.unwrap_err();
    assert!(matches!(err, RagError::EmptyQuestion));
    assert_eq!(embedder.call_count(), 0);
    assert_eq!(llm.call_count(), 0);
}

#[tokio::test]
async fn transient_reasoning_failures_are_retried() {
    let embedder = Arc::new(StubEmbedder::new());
    let llm = Arc::new(
        MockLlm::new()
            .with_error(ModelError::Server("overloaded".into()))
            .with_response("Switch to a zone press."),
    );
    let engine = engine(embedder, llm.clone());

    let answer = engine.answer("What defense should we run?", &game_log_index()).await.unwrap();
    assert_eq!(answer.text, "Switch to a zone press.");
    assert_eq!(llm.call_count(), 2);
}

#[tokio::test]
async fn permanent_reasoning_failures_are_not_retried() {
    let embedder = Arc::new(StubEmbedder::new());
    let llm = Arc::new(MockLlm::new().with_error(ModelError::Auth("bad key".into())));
    let engine = engine(embedder, llm.clone());

    let err = engine.answer("What defense?", &game_log_index()).await.unwrap_err();
    assert!(matches!(err, RagError::Reasoning { .. }));
    assert_eq!(llm.call_count(), 1);
}

#[tokio::test]
async fn retry_budget_is_bounded() {
    let embedder = Arc::new(StubEmbedder::new());
    let llm = Arc::new(
        MockLlm::new()
            .with_error(ModelError::Server("down".into()))
            .with_error(ModelError::Server("down".into()))
            .with_error(ModelError::Server("down".into())),
    );
    let engine = engine(embedder, llm.clone());

    let err = engine.answer("What defense?", &game_log_index()).await.unwrap_err();
    assert!(matches!(err, RagError::ServiceUnavailable { .. }));
    // Initial attempt plus max_retries.
    assert_eq!(llm.call_count(), 3);
}

#[tokio::test]
async fn transient_embedding_failures_are_retried() {
    let embedder = Arc::new(StubEmbedder::failing(1));
    let llm = Arc::new(MockLlm::new().with_response("Run them off the line."));
    let engine = engine(embedder.clone(), llm);

    let answer = engine.answer("How to defend the arc?", &game_log_index()).await.unwrap();
    assert_eq!(answer.text, "Run them off the line.");
    assert_eq!(embedder.call_count(), 2);
}
