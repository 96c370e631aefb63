use crate::scoring::types::{BookingSnapshot, PriorityRecord, PrioritySegment};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const INITIAL_STATUS: &str = "pending";
pub const MAX_STATUS_LEN: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub booking_id: Uuid,
    pub customer_id: i64,
    pub service_type_id: i64,
    pub price_locked: Decimal,
    pub status: String,
    pub event_date: DateTime<Utc>,
    pub party_size: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub priority: PriorityRecord,
}

impl Booking {
    pub fn snapshot(&self) -> BookingSnapshot {
        BookingSnapshot {
            event_date: self.event_date,
            created_at: self.created_at,
            status: self.status.clone(),
            price_locked: self.price_locked,
            party_size: self.party_size,
        }
    }

    /// A new record carrying `status` and its freshly computed priority;
    /// the price lock and event details are untouched.
    pub fn rescored(&self, status: &str, priority: PriorityRecord, at: DateTime<Utc>) -> Self {
        Self {
            status: status.to_string(),
            priority,
            updated_at: at,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CreateBookingRequest {
    pub service_type_id: i64,
    pub event_date: DateTime<Utc>,
    #[serde(default = "default_party_size")]
    pub party_size: i32,
}

fn default_party_size() -> i32 {
    1
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BookingStatusUpdate {
    pub status: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookingOrder {
    #[default]
    Newest,
    PriorityScoreDesc,
}

#[derive(Debug, Clone, Default)]
pub struct BookingFilter {
    pub segment: Option<PrioritySegment>,
    pub order: BookingOrder,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct BookingListQuery {
    pub order_by: Option<String>,
    pub segment: Option<String>,
}

impl BookingListQuery {
    pub fn into_filter(self) -> Result<BookingFilter, String> {
        let segment = match self.segment.as_deref() {
            None | Some("") => None,
            Some(s) => Some(PrioritySegment::parse(s).ok_or_else(|| format!("unknown priority segment: {s}"))?),
        };
        let order = match self.order_by.as_deref() {
            Some("priority_score_desc") => BookingOrder::PriorityScoreDesc,
            None | Some("") | Some("created_at_desc") => BookingOrder::Newest,
            Some(other) => return Err(format!("unsupported order_by: {other}")),
        };
        Ok(BookingFilter { segment, order })
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: ErrorPayload,
}

#[derive(Debug, Serialize)]
pub struct ErrorPayload {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
}
