use crate::repo::bookings_repo::BookingsRepo;
use crate::segmentation::{build_rfm_points, segment_customers, CustomerSegment, SegmentationLimits};
use crate::service::error::ServiceError;

#[derive(Clone)]
pub struct SegmentService {
    pub bookings_repo: BookingsRepo,
    pub limits: SegmentationLimits,
    pub default_k: usize,
}

impl SegmentService {
    pub async fn segment_customers(&self, k: usize) -> Result<Vec<CustomerSegment>, ServiceError> {
        let history = self.bookings_repo.list_transaction_history().await?;
        let points = build_rfm_points(&history, chrono::Utc::now());
        let segments = segment_customers(&points, k, self.limits)?;
        tracing::debug!(customers = points.len(), k, "customer segmentation computed");
        Ok(segments)
    }

    pub async fn default_segments(&self) -> Result<Vec<CustomerSegment>, ServiceError> {
        self.segment_customers(self.default_k).await
    }
}

/// Parses a caller-supplied cluster count without clamping it.
pub fn parse_cluster_count(raw: Option<i64>, default_k: usize) -> Result<usize, ServiceError> {
    match raw {
        None => Ok(default_k),
        Some(k) if k <= 0 => Err(crate::segmentation::SegmentationError::InvalidClusterCount(k).into()),
        Some(k) => usize::try_from(k)
            .map_err(|_| crate::segmentation::SegmentationError::InvalidClusterCount(k).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segmentation::SegmentationError;

    #[test]
    fn missing_k_uses_default() {
        assert_eq!(parse_cluster_count(None, 4).unwrap(), 4);
    }

    #[test]
    fn non_positive_k_is_rejected() {
        for raw in [0, -3] {
            let err = parse_cluster_count(Some(raw), 4).unwrap_err();
            assert!(matches!(
                err,
                ServiceError::Segmentation(SegmentationError::InvalidClusterCount(k)) if k == raw
            ));
        }
    }
}
