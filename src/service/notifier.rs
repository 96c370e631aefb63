use crate::domain::booking::Booking;
use crate::domain::segment::SegmentItem;
use crate::notify::{EventSink, OutboundEvent, BOOKING_CREATED, BOOKING_UPDATED, SEGMENT_UPDATED};
use crate::service::segment_service::SegmentService;
use std::sync::Arc;
use tokio::sync::mpsc;

#[derive(Debug, Clone)]
pub enum NotificationEvent {
    BookingCreated(Booking),
    BookingUpdated(Booking),
}

impl NotificationEvent {
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::BookingCreated(_) => BOOKING_CREATED,
            Self::BookingUpdated(_) => BOOKING_UPDATED,
        }
    }

    pub fn to_outbound(&self) -> serde_json::Result<OutboundEvent> {
        let booking = match self {
            Self::BookingCreated(b) | Self::BookingUpdated(b) => b,
        };
        Ok(OutboundEvent {
            event_type: self.event_type().to_string(),
            payload: serde_json::to_value(booking)?,
            emitted_at: chrono::Utc::now(),
        })
    }
}

pub fn segment_event(items: &[SegmentItem]) -> serde_json::Result<OutboundEvent> {
    Ok(OutboundEvent {
        event_type: SEGMENT_UPDATED.to_string(),
        payload: serde_json::to_value(items)?,
        emitted_at: chrono::Utc::now(),
    })
}

/// Producer side of the outbound queue. Never blocks the caller.
#[derive(Clone)]
pub struct Notifier {
    tx: mpsc::Sender<NotificationEvent>,
}

impl Notifier {
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<NotificationEvent>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }

    pub fn enqueue(&self, event: NotificationEvent) -> bool {
        match self.tx.try_send(event) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(ev)) => {
                tracing::warn!(event_type = ev.event_type(), "notification queue full, dropping event");
                false
            }
            Err(mpsc::error::TrySendError::Closed(ev)) => {
                tracing::warn!(event_type = ev.event_type(), "notifier stopped, dropping event");
                false
            }
        }
    }
}

/// Drains the queue: fans each booking event out to every sink, then
/// pushes a fresh segmentation snapshot.
pub struct NotifierTask {
    pub rx: mpsc::Receiver<NotificationEvent>,
    pub sinks: Vec<Arc<dyn EventSink>>,
    pub segments: Option<SegmentService>,
}

impl NotifierTask {
    pub async fn run(mut self) {
        while let Some(event) = self.rx.recv().await {
            self.dispatch(&event).await;
        }
        tracing::info!("notification queue closed, notifier exiting");
    }

    pub async fn dispatch(&self, event: &NotificationEvent) {
        match event.to_outbound() {
            Ok(outbound) => self.publish_all(&outbound).await,
            Err(e) => tracing::error!(event_type = event.event_type(), "failed to encode event: {}", e),
        }

        if let Some(segments) = &self.segments {
            self.refresh_segments(segments).await;
        }
    }

    async fn refresh_segments(&self, service: &SegmentService) {
        let segments = match service.default_segments().await {
            Ok(s) => s,
            Err(e) => {
                tracing::warn!("segment refresh skipped: {}", e);
                return;
            }
        };
        let items: Vec<SegmentItem> = segments.iter().map(SegmentItem::from).collect();
        match segment_event(&items) {
            Ok(outbound) => self.publish_all(&outbound).await,
            Err(e) => tracing::error!("failed to encode segment event: {}", e),
        }
    }

    pub async fn publish_all(&self, event: &OutboundEvent) {
        for sink in &self.sinks {
            if let Err(e) = sink.publish(event).await {
                tracing::warn!(sink = sink.name(), event_type = %event.event_type, "publish failed: {}", e);
            }
        }
    }
}
