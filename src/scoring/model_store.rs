use crate::scoring::model::PriorityModel;
use anyhow::Result;
use redis::AsyncCommands;

/// Redis cache for the trained priority model artifact.
#[derive(Clone)]
pub struct ModelStore {
    pub client: redis::Client,
    pub key: String,
}

impl ModelStore {
    pub fn new(redis_url: &str, key: &str) -> Result<Self> {
        Ok(Self {
            client: redis::Client::open(redis_url)?,
            key: key.to_string(),
        })
    }

    /// `None` when the key is absent or the stored artifact does not decode
    /// into a usable model.
    pub async fn load(&self) -> Result<Option<PriorityModel>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let payload: Option<String> = conn.get(&self.key).await?;
        let Some(raw) = payload else {
            return Ok(None);
        };

        match serde_json::from_str::<PriorityModel>(&raw) {
            Ok(model) if model.validate().is_ok() => Ok(Some(model)),
            Ok(_) => {
                tracing::warn!(key = %self.key, "priority model artifact has a stale shape, ignoring");
                Ok(None)
            }
            Err(e) => {
                tracing::warn!(key = %self.key, "priority model artifact is corrupt: {}", e);
                Ok(None)
            }
        }
    }

    pub async fn save(&self, model: &PriorityModel) -> Result<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let payload = serde_json::to_string(model)?;
        let _: () = conn.set(&self.key, payload).await?;
        Ok(())
    }
}
