//! Customer segmentation: RFM extraction, min-max normalization, seeded
//! k-means and value-ranked segment labels.

use thiserror::Error;

pub mod engine;
pub mod kmeans;
pub mod normalize;
pub mod ranker;
pub mod rfm;

pub use engine::{segment_customers, CustomerSegment, SegmentationLimits};
pub use rfm::{build_rfm_points, RfmPoint, TransactionRecord};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SegmentationError {
    #[error("invalid cluster count: {0}")]
    InvalidClusterCount(i64),

    #[error("insufficient samples: {samples} customers with history, {k} clusters requested")]
    InsufficientSamples { samples: usize, k: usize },
}
