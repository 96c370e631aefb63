use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod broadcast;
pub mod redis_stream;
pub mod webhook;

pub const BOOKING_CREATED: &str = "booking_created";
pub const BOOKING_UPDATED: &str = "booking_updated";
pub const SEGMENT_UPDATED: &str = "segment_updated";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboundEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub payload: serde_json::Value,
    pub emitted_at: DateTime<Utc>,
}

#[async_trait::async_trait]
pub trait EventSink: Send + Sync {
    fn name(&self) -> &'static str;

    async fn publish(&self, event: &OutboundEvent) -> Result<()>;
}
