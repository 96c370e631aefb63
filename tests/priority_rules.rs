use beauty_bookings::scoring::engine::{calculate_priority, score_breakdown};
use beauty_bookings::scoring::types::{
    BookingSnapshot, MonetaryLevel, PriorityInputs, PrioritySegment, UrgencyLevel,
};
use beauty_bookings::scoring::PriorityScorer;
use chrono::{Duration, TimeZone, Utc};
use rust_decimal::Decimal;

fn inputs(days: i64, status: &str, price: i64, party: i32) -> PriorityInputs {
    PriorityInputs {
        days_until_event: days,
        status: status.to_string(),
        price_locked: Decimal::from(price),
        party_size: party,
    }
}

#[test]
fn urgent_paid_vip_group_booking_tops_out() {
    let a = calculate_priority(&inputs(1, "paid", 3_500_000, 4));
    assert_eq!(a.priority_score, 115);
    assert_eq!(a.priority_segment, PrioritySegment::High);
    assert_eq!(a.urgency_level, UrgencyLevel::Urgent);
    assert_eq!(a.monetary_level, MonetaryLevel::Vip);
}

#[test]
fn distant_pending_small_booking_is_low() {
    let a = calculate_priority(&inputs(30, "pending", 500_000, 1));
    assert_eq!(a.priority_score, 25);
    assert_eq!(a.priority_segment, PrioritySegment::Low);
    assert_eq!(a.urgency_level, UrgencyLevel::Upcoming);
    assert_eq!(a.monetary_level, MonetaryLevel::Regular);
}

#[test]
fn breakdown_sums_to_the_score() {
    let i = inputs(5, "dp", 2_000_000, 3);
    let breakdown = score_breakdown(&i);
    assert_eq!(breakdown.urgency_points, 25);
    assert_eq!(breakdown.payment_points, 20);
    assert_eq!(breakdown.monetary_points, 15);
    assert_eq!(breakdown.party_points, 15);
    assert_eq!(breakdown.total(), calculate_priority(&i).priority_score);
}

#[test]
fn scoring_a_snapshot_is_idempotent() {
    let created = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
    let snapshot = BookingSnapshot {
        event_date: created + Duration::days(6),
        created_at: created,
        status: "DP".to_string(),
        price_locked: Decimal::from(1_500_000),
        party_size: 2,
    };

    let first = calculate_priority(&PriorityInputs::from_snapshot(&snapshot));
    let second = calculate_priority(&PriorityInputs::from_snapshot(&snapshot));
    assert_eq!(first, second);
    assert_eq!(first.urgency_level, UrgencyLevel::Soon);
    assert_eq!(first.priority_score, 25 + 20 + 15 + 5);
}

#[test]
fn past_events_count_as_urgent() {
    let created = Utc.with_ymd_and_hms(2024, 3, 10, 8, 0, 0).unwrap();
    let snapshot = BookingSnapshot {
        event_date: created - Duration::days(3),
        created_at: created,
        status: "pending".to_string(),
        price_locked: Decimal::from(100_000),
        party_size: 1,
    };
    let i = PriorityInputs::from_snapshot(&snapshot);
    assert_eq!(i.days_until_event, 0);
    assert_eq!(calculate_priority(&i).urgency_level, UrgencyLevel::Urgent);
}

#[tokio::test]
async fn rules_scorer_matches_the_rule_model() {
    let scorer = PriorityScorer::Rules;
    let i = inputs(2, "paid", 3_000_000, 3);
    let assessed = scorer.assess(&i).await.unwrap();
    assert_eq!(assessed, calculate_priority(&i));
    assert_eq!(scorer.strategy(), "RULES");
}
