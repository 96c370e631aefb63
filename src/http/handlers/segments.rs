use crate::domain::segment::SegmentItem;
use crate::notify::{OutboundEvent, SEGMENT_UPDATED};
use crate::service::notifier::segment_event;
use crate::service::segment_service::parse_cluster_count;
use crate::AppState;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use std::convert::Infallible;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

#[derive(Debug, Deserialize)]
pub struct SegmentQuery {
    pub k: Option<i64>,
}

pub async fn list_segments(
    State(state): State<AppState>,
    Query(query): Query<SegmentQuery>,
) -> impl IntoResponse {
    let k = match parse_cluster_count(query.k, state.segment_service.default_k) {
        Ok(k) => k,
        Err(e) => return e.into_response(),
    };

    match state.segment_service.segment_customers(k).await {
        Ok(segments) => {
            let items: Vec<SegmentItem> = segments.iter().map(SegmentItem::from).collect();
            (StatusCode::OK, Json(items)).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Sends the current assignment on connect, then every `segment_updated`
/// event the notifier publishes.
pub async fn stream_segments(State(state): State<AppState>) -> impl IntoResponse {
    // Subscribe first so nothing published while the snapshot is computed is lost.
    let updates = BroadcastStream::new(state.broadcast.subscribe()).filter_map(|msg| match msg {
        Ok(event) if event.event_type == SEGMENT_UPDATED => sse_event(&event).map(Ok::<_, Infallible>),
        Ok(_) => None,
        Err(e) => {
            tracing::warn!("segment stream subscriber lagging: {}", e);
            None
        }
    });

    let initial = match state.segment_service.default_segments().await {
        Ok(segments) => {
            let items: Vec<SegmentItem> = segments.iter().map(SegmentItem::from).collect();
            segment_event(&items).ok().as_ref().and_then(sse_event)
        }
        Err(e) => {
            tracing::warn!("initial segment snapshot unavailable: {}", e);
            None
        }
    };

    let stream = tokio_stream::iter(initial.map(Ok::<_, Infallible>)).chain(updates);
    Sse::new(stream).keep_alive(KeepAlive::default())
}

fn sse_event(event: &OutboundEvent) -> Option<Event> {
    match Event::default().event(&event.event_type).json_data(&event.payload) {
        Ok(ev) => Some(ev),
        Err(e) => {
            tracing::error!(event_type = %event.event_type, "failed to encode sse event: {}", e);
            None
        }
    }
}
