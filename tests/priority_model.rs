use beauty_bookings::scoring::model::representative_score;
use beauty_bookings::scoring::model_handle::{PriorityModelHandle, TrainingSource};
use beauty_bookings::scoring::types::{PriorityInputs, PrioritySegment};
use beauty_bookings::scoring::{PriorityScorer, ScoringError};
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct InMemorySource {
    rows: Mutex<Vec<PriorityInputs>>,
}

impl InMemorySource {
    fn push(&self, row: PriorityInputs) {
        self.rows.lock().unwrap().push(row);
    }
}

#[async_trait::async_trait]
impl TrainingSource for InMemorySource {
    async fn training_samples(&self) -> anyhow::Result<Vec<PriorityInputs>> {
        Ok(self.rows.lock().unwrap().clone())
    }
}

struct CountingSource {
    inner: Arc<InMemorySource>,
    calls: AtomicUsize,
}

#[async_trait::async_trait]
impl TrainingSource for CountingSource {
    async fn training_samples(&self) -> anyhow::Result<Vec<PriorityInputs>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.training_samples().await
    }
}

struct BrokenSource;

#[async_trait::async_trait]
impl TrainingSource for BrokenSource {
    async fn training_samples(&self) -> anyhow::Result<Vec<PriorityInputs>> {
        Err(anyhow::anyhow!("connection refused"))
    }
}

fn row(days: i64, status: &str, price: i64, party: i32) -> PriorityInputs {
    PriorityInputs {
        days_until_event: days,
        status: status.to_string(),
        price_locked: Decimal::from(price),
        party_size: party,
    }
}

fn seeded_source() -> Arc<InMemorySource> {
    let source = Arc::new(InMemorySource::default());
    for i in 0..4 {
        source.push(row(1 + i % 2, "paid", 4_000_000 + i * 100_000, 5));
        source.push(row(10 + i, "dp", 1_800_000 + i * 50_000, 2));
        source.push(row(60 + i * 5, "pending", 200_000 + i * 10_000, 1));
    }
    source
}

#[tokio::test]
async fn too_little_history_is_model_unavailable() {
    let source = Arc::new(InMemorySource::default());
    source.push(row(3, "paid", 1_000_000, 2));
    source.push(row(9, "pending", 300_000, 1));

    let handle = PriorityModelHandle::new(source, None);
    let err = handle.init().await.unwrap_err();
    assert!(matches!(err, ScoringError::ModelUnavailable(_)));
    assert!(!handle.is_loaded().await);
}

#[tokio::test]
async fn clustered_scorer_never_falls_back_to_rules() {
    let handle = PriorityModelHandle::new(Arc::new(InMemorySource::default()), None);
    let scorer = PriorityScorer::Clustered(handle);

    let err = scorer.assess(&row(1, "paid", 5_000_000, 4)).await.unwrap_err();
    assert!(matches!(err, ScoringError::ModelUnavailable(_)));
    assert_eq!(scorer.strategy(), "CLUSTERED");
}

#[tokio::test]
async fn unreachable_training_data_is_model_unavailable() {
    let handle = PriorityModelHandle::new(Arc::new(BrokenSource), None);
    let err = handle.current().await.unwrap_err();
    match err {
        ScoringError::ModelUnavailable(msg) => assert!(msg.contains("connection refused")),
    }
}

#[tokio::test]
async fn trained_model_assigns_representative_scores() {
    let handle = PriorityModelHandle::new(seeded_source(), None);
    let model = handle.init().await.unwrap();
    assert_eq!(model.trained_on, 12);
    assert!(handle.is_loaded().await);

    let scorer = PriorityScorer::Clustered(handle);
    let hot = scorer.assess(&row(1, "paid", 4_200_000, 5)).await.unwrap();
    let cold = scorer.assess(&row(70, "pending", 210_000, 1)).await.unwrap();

    assert_eq!(hot.priority_segment, PrioritySegment::High);
    assert_eq!(hot.priority_score, representative_score(PrioritySegment::High));
    assert_eq!(cold.priority_segment, PrioritySegment::Low);
    assert_eq!(cold.priority_score, representative_score(PrioritySegment::Low));
}

#[tokio::test]
async fn init_reuses_the_loaded_model() {
    let source = seeded_source();
    let handle = PriorityModelHandle::new(source.clone(), None);
    let first = handle.init().await.unwrap();

    source.push(row(2, "paid", 9_000_000, 8));
    let second = handle.init().await.unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(second.trained_on, 12);
}

#[tokio::test]
async fn retrain_replaces_the_model_with_fresh_data() {
    let source = Arc::new(InMemorySource::default());
    source.push(row(1, "paid", 4_000_000, 4));
    let handle = PriorityModelHandle::new(source.clone(), None);
    assert!(handle.init().await.is_err());

    for r in seeded_source().rows.lock().unwrap().iter() {
        source.push(r.clone());
    }
    let model = handle.retrain().await.unwrap();
    assert_eq!(model.trained_on, 13);

    let current = handle.current().await.unwrap();
    assert!(Arc::ptr_eq(&model, &current));
}

#[tokio::test]
async fn prepared_scorer_scores_without_touching_training_data() {
    let source = Arc::new(CountingSource {
        inner: seeded_source(),
        calls: AtomicUsize::new(0),
    });
    let scorer = PriorityScorer::Clustered(PriorityModelHandle::new(source.clone(), None));

    let prepared = scorer.prepare().await.unwrap();
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);

    let hot = prepared.assess(&row(1, "paid", 4_200_000, 5));
    let cold = prepared.assess(&row(70, "pending", 210_000, 1));
    assert_eq!(hot.priority_segment, PrioritySegment::High);
    assert_eq!(cold.priority_segment, PrioritySegment::Low);
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);

    let again = scorer.assess(&row(1, "paid", 4_200_000, 5)).await.unwrap();
    assert_eq!(again, hot);
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn missing_model_fails_before_any_scoring() {
    let scorer = PriorityScorer::Clustered(PriorityModelHandle::new(Arc::new(BrokenSource), None));
    let err = scorer.prepare().await.unwrap_err();
    assert!(matches!(err, ScoringError::ModelUnavailable(_)));

    let rules = PriorityScorer::Rules.prepare().await.unwrap();
    assert_eq!(rules.assess(&row(1, "paid", 3_500_000, 4)).priority_score, 115);
}
