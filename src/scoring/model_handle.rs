use crate::scoring::model::PriorityModel;
use crate::scoring::model_store::ModelStore;
use crate::scoring::types::PriorityInputs;
use crate::scoring::ScoringError;
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Where the clustering model gets its training rows from.
#[async_trait::async_trait]
pub trait TrainingSource: Send + Sync {
    async fn training_samples(&self) -> Result<Vec<PriorityInputs>>;
}

/// Owned handle to the priority model. Loaded or trained once, then
/// immutable until `retrain` swaps in a new one.
#[derive(Clone)]
pub struct PriorityModelHandle {
    source: Arc<dyn TrainingSource>,
    store: Option<ModelStore>,
    inner: Arc<RwLock<Option<Arc<PriorityModel>>>>,
}

impl PriorityModelHandle {
    pub fn new(source: Arc<dyn TrainingSource>, store: Option<ModelStore>) -> Self {
        Self {
            source,
            store,
            inner: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn is_loaded(&self) -> bool {
        self.inner.read().await.is_some()
    }

    /// Loads the cached artifact, or trains and caches a fresh model. A
    /// no-op once a model is in place.
    pub async fn init(&self) -> Result<Arc<PriorityModel>, ScoringError> {
        let mut slot = self.inner.write().await;
        if let Some(model) = slot.as_ref() {
            return Ok(model.clone());
        }

        if let Some(model) = self.load_cached().await {
            tracing::info!(trained_on = model.trained_on, "priority model loaded from cache");
            let model = Arc::new(model);
            *slot = Some(model.clone());
            return Ok(model);
        }

        let model = Arc::new(self.train().await?);
        self.save_cached(&model).await;
        *slot = Some(model.clone());
        Ok(model)
    }

    pub async fn current(&self) -> Result<Arc<PriorityModel>, ScoringError> {
        if let Some(model) = self.inner.read().await.as_ref() {
            return Ok(model.clone());
        }
        self.init().await
    }

    pub async fn retrain(&self) -> Result<Arc<PriorityModel>, ScoringError> {
        let model = Arc::new(self.train().await?);
        self.save_cached(&model).await;
        *self.inner.write().await = Some(model.clone());
        Ok(model)
    }

    async fn train(&self) -> Result<PriorityModel, ScoringError> {
        let samples = self
            .source
            .training_samples()
            .await
            .map_err(|e| ScoringError::ModelUnavailable(format!("training data unavailable: {e}")))?;
        PriorityModel::fit(&samples)
    }

    async fn load_cached(&self) -> Option<PriorityModel> {
        let store = self.store.as_ref()?;
        match store.load().await {
            Ok(model) => model,
            Err(e) => {
                tracing::warn!("priority model cache unreachable: {}", e);
                None
            }
        }
    }

    async fn save_cached(&self, model: &PriorityModel) {
        if let Some(store) = &self.store {
            if let Err(e) = store.save(model).await {
                tracing::warn!("failed to cache priority model: {}", e);
            }
        }
    }
}
