use crate::segmentation::CustomerSegment;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentItem {
    pub customer_id: i64,
    pub name: String,
    pub recency: i64,
    pub frequency: i64,
    pub monetary: Decimal,
    pub cluster: usize,
    pub customer_segment: String,
}

impl From<&CustomerSegment> for SegmentItem {
    fn from(s: &CustomerSegment) -> Self {
        Self {
            customer_id: s.point.customer_id,
            name: s.point.display_name.clone(),
            recency: s.point.recency,
            frequency: s.point.frequency,
            monetary: s.point.monetary,
            cluster: s.cluster_id,
            customer_segment: s.segment_label.clone(),
        }
    }
}
