use crate::notify::{EventSink, OutboundEvent};
use anyhow::Result;
use tokio::sync::broadcast;

/// In-process fan-out to connected stream clients.
#[derive(Debug, Clone)]
pub struct BroadcastSink {
    sender: broadcast::Sender<OutboundEvent>,
}

impl BroadcastSink {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<OutboundEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[async_trait::async_trait]
impl EventSink for BroadcastSink {
    fn name(&self) -> &'static str {
        "broadcast"
    }

    async fn publish(&self, event: &OutboundEvent) -> Result<()> {
        // Err only means nobody is listening.
        let _ = self.sender.send(event.clone());
        Ok(())
    }
}
