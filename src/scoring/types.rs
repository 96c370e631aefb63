use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrioritySegment {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyLevel {
    Upcoming,
    Soon,
    Urgent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MonetaryLevel {
    Regular,
    Premium,
    Vip,
}

impl PrioritySegment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            _ => None,
        }
    }
}

impl UrgencyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Soon => "soon",
            Self::Urgent => "urgent",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "upcoming" => Some(Self::Upcoming),
            "soon" => Some(Self::Soon),
            "urgent" => Some(Self::Urgent),
            _ => None,
        }
    }
}

impl MonetaryLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Premium => "premium",
            Self::Vip => "vip",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "regular" => Some(Self::Regular),
            "premium" => Some(Self::Premium),
            "vip" => Some(Self::Vip),
            _ => None,
        }
    }
}

/// Payment progress as far as scoring is concerned. Booking status is an
/// open set; anything other than `dp` or `paid` counts as pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStage {
    Pending,
    Deposit,
    Paid,
}

impl PaymentStage {
    pub fn from_status(status: &str) -> Self {
        match status.trim().to_ascii_lowercase().as_str() {
            "paid" => Self::Paid,
            "dp" => Self::Deposit,
            _ => Self::Pending,
        }
    }
}

/// The immutable booking view the scorer works from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingSnapshot {
    pub event_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub status: String,
    pub price_locked: Decimal,
    pub party_size: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityInputs {
    pub days_until_event: i64,
    pub status: String,
    pub price_locked: Decimal,
    pub party_size: i32,
}

impl PriorityInputs {
    /// Days are counted from the booking's own creation time, not from the
    /// wall clock.
    pub fn from_snapshot(snapshot: &BookingSnapshot) -> Self {
        Self {
            days_until_event: (snapshot.event_date - snapshot.created_at).num_days().max(0),
            status: snapshot.status.clone(),
            price_locked: snapshot.price_locked,
            party_size: snapshot.party_size,
        }
    }

    pub fn payment_stage(&self) -> PaymentStage {
        PaymentStage::from_status(&self.status)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityBreakdown {
    pub urgency_points: i32,
    pub payment_points: i32,
    pub monetary_points: i32,
    pub party_points: i32,
}

impl PriorityBreakdown {
    pub fn total(&self) -> i32 {
        self.urgency_points + self.payment_points + self.monetary_points + self.party_points
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityAssessment {
    pub priority_score: i32,
    pub priority_segment: PrioritySegment,
    pub urgency_level: UrgencyLevel,
    pub monetary_level: MonetaryLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityRecord {
    pub priority_score: i32,
    pub priority_segment: PrioritySegment,
    pub urgency_level: UrgencyLevel,
    pub monetary_level: MonetaryLevel,
    pub scored_at: DateTime<Utc>,
}

impl PriorityRecord {
    pub fn stamp(assessment: PriorityAssessment, scored_at: DateTime<Utc>) -> Self {
        Self {
            priority_score: assessment.priority_score,
            priority_segment: assessment.priority_segment,
            urgency_level: assessment.urgency_level,
            monetary_level: assessment.monetary_level,
            scored_at,
        }
    }
}
