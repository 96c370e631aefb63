use crate::notify::{EventSink, OutboundEvent};
use anyhow::Result;

#[derive(Clone)]
pub struct RedisStreamSink {
    pub redis_client: redis::Client,
    pub stream_key: String,
}

#[async_trait::async_trait]
impl EventSink for RedisStreamSink {
    fn name(&self) -> &'static str {
        "redis_stream"
    }

    async fn publish(&self, event: &OutboundEvent) -> Result<()> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let payload = serde_json::to_string(&event.payload)?;
        let _: String = redis::cmd("XADD")
            .arg(&self.stream_key)
            .arg("MAXLEN")
            .arg("~")
            .arg(100_000)
            .arg("*")
            .arg("type")
            .arg(&event.event_type)
            .arg("event")
            .arg(payload)
            .query_async(&mut conn)
            .await?;
        Ok(())
    }
}
