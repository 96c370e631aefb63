use crate::notify::{EventSink, OutboundEvent};
use anyhow::Result;

#[derive(Clone)]
pub struct WebhookSink {
    pub client: reqwest::Client,
    pub target_urls: Vec<String>,
}

#[async_trait::async_trait]
impl EventSink for WebhookSink {
    fn name(&self) -> &'static str {
        "webhook"
    }

    async fn publish(&self, event: &OutboundEvent) -> Result<()> {
        for url in &self.target_urls {
            let res = self
                .client
                .post(url)
                .header("Content-Type", "application/json")
                .header("X-Event-Type", &event.event_type)
                .json(event)
                .send()
                .await;
            match res {
                Ok(resp) if !resp.status().is_success() => {
                    tracing::warn!(url = %url, status = %resp.status(), "webhook rejected event");
                }
                Err(e) => tracing::warn!(url = %url, "webhook delivery failed: {}", e),
                Ok(_) => {}
            }
        }
        Ok(())
    }
}
