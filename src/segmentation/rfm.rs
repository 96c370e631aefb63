use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One booking as seen by the feature extractor.
#[derive(Debug, Clone)]
pub struct TransactionRecord {
    pub customer_id: i64,
    pub customer_name: String,
    pub booked_at: DateTime<Utc>,
    pub price_locked: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RfmPoint {
    pub customer_id: i64,
    pub display_name: String,
    pub recency: i64,
    pub frequency: i64,
    pub monetary: Decimal,
}

impl RfmPoint {
    pub fn as_vector(&self) -> [f64; 3] {
        [
            self.recency as f64,
            self.frequency as f64,
            self.monetary.to_f64().unwrap_or(0.0),
        ]
    }
}

struct Accumulator {
    display_name: String,
    last_booked_at: Option<DateTime<Utc>>,
    frequency: i64,
    monetary: Decimal,
}

/// Aggregates the full booking history into one RFM point per customer.
///
/// Points come back ordered by `customer_id`, so the same history always
/// yields the same batch order no matter how the rows were read.
pub fn build_rfm_points(history: &[TransactionRecord], now: DateTime<Utc>) -> Vec<RfmPoint> {
    let mut by_customer: BTreeMap<i64, Accumulator> = BTreeMap::new();

    for tx in history {
        let acc = by_customer.entry(tx.customer_id).or_insert_with(|| Accumulator {
            display_name: tx.customer_name.clone(),
            last_booked_at: None,
            frequency: 0,
            monetary: Decimal::ZERO,
        });
        acc.frequency += 1;
        acc.monetary += tx.price_locked;
        acc.last_booked_at = match acc.last_booked_at {
            Some(prev) if prev >= tx.booked_at => Some(prev),
            _ => Some(tx.booked_at),
        };
    }

    by_customer
        .into_iter()
        .map(|(customer_id, acc)| RfmPoint {
            customer_id,
            display_name: acc.display_name,
            recency: acc
                .last_booked_at
                .map(|last| (now - last).num_days().max(0))
                .unwrap_or(0),
            frequency: acc.frequency,
            monetary: acc.monetary,
        })
        .collect()
}
