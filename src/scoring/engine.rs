use crate::scoring::types::{
    MonetaryLevel, PaymentStage, PriorityAssessment, PriorityBreakdown, PriorityInputs,
    PrioritySegment, UrgencyLevel,
};
use rust_decimal::Decimal;

pub const URGENT_WITHIN_DAYS: i64 = 2;
pub const SOON_WITHIN_DAYS: i64 = 7;
pub const VIP_PRICE: i64 = 3_000_000;
pub const PREMIUM_PRICE: i64 = 1_500_000;
pub const GROUP_PARTY_SIZE: i32 = 3;
pub const HIGH_SEGMENT_FROM: i32 = 80;
pub const MEDIUM_SEGMENT_FROM: i32 = 50;

pub fn urgency_band(days_until_event: i64) -> (i32, UrgencyLevel) {
    let days = days_until_event.max(0);
    if days <= URGENT_WITHIN_DAYS {
        (40, UrgencyLevel::Urgent)
    } else if days <= SOON_WITHIN_DAYS {
        (25, UrgencyLevel::Soon)
    } else {
        (10, UrgencyLevel::Upcoming)
    }
}

pub fn payment_points(stage: PaymentStage) -> i32 {
    match stage {
        PaymentStage::Paid => 30,
        PaymentStage::Deposit => 20,
        PaymentStage::Pending => 5,
    }
}

pub fn monetary_band(price_locked: Decimal) -> (i32, MonetaryLevel) {
    if price_locked >= Decimal::from(VIP_PRICE) {
        (30, MonetaryLevel::Vip)
    } else if price_locked >= Decimal::from(PREMIUM_PRICE) {
        (15, MonetaryLevel::Premium)
    } else {
        (5, MonetaryLevel::Regular)
    }
}

pub fn party_points(party_size: i32) -> i32 {
    if party_size >= GROUP_PARTY_SIZE {
        15
    } else {
        5
    }
}

pub fn segment_for_score(score: i32) -> PrioritySegment {
    if score >= HIGH_SEGMENT_FROM {
        PrioritySegment::High
    } else if score >= MEDIUM_SEGMENT_FROM {
        PrioritySegment::Medium
    } else {
        PrioritySegment::Low
    }
}

pub fn score_breakdown(inputs: &PriorityInputs) -> PriorityBreakdown {
    PriorityBreakdown {
        urgency_points: urgency_band(inputs.days_until_event).0,
        payment_points: payment_points(inputs.payment_stage()),
        monetary_points: monetary_band(inputs.price_locked).0,
        party_points: party_points(inputs.party_size),
    }
}

pub fn calculate_priority(inputs: &PriorityInputs) -> PriorityAssessment {
    let breakdown = score_breakdown(inputs);
    let score = breakdown.total();

    PriorityAssessment {
        priority_score: score,
        priority_segment: segment_for_score(score),
        urgency_level: urgency_band(inputs.days_until_event).1,
        monetary_level: monetary_band(inputs.price_locked).1,
    }
}
