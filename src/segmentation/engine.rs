use crate::segmentation::kmeans::kmeans;
use crate::segmentation::normalize::normalize;
use crate::segmentation::ranker::{cluster_metrics, segment_labels};
use crate::segmentation::rfm::RfmPoint;
use crate::segmentation::SegmentationError;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerSegment {
    pub point: RfmPoint,
    pub cluster_id: usize,
    pub segment_label: String,
}

#[derive(Debug, Clone, Copy)]
pub struct SegmentationLimits {
    pub max_k: usize,
}

impl Default for SegmentationLimits {
    fn default() -> Self {
        Self { max_k: 12 }
    }
}

/// Clusters the batch into `k` groups and labels every point with its
/// cluster's segment. Results keep the input order.
pub fn segment_customers(
    points: &[RfmPoint],
    k: usize,
    limits: SegmentationLimits,
) -> Result<Vec<CustomerSegment>, SegmentationError> {
    if k == 0 || k > limits.max_k {
        return Err(SegmentationError::InvalidClusterCount(k as i64));
    }
    if points.is_empty() {
        return Ok(Vec::new());
    }
    if points.len() < k {
        return Err(SegmentationError::InsufficientSamples {
            samples: points.len(),
            k,
        });
    }

    let raw: Vec<[f64; 3]> = points.iter().map(RfmPoint::as_vector).collect();
    let batch = normalize(&raw);
    let assignment = kmeans(&batch.vectors, k)?;
    let metrics = cluster_metrics(points, &assignment, k);
    let labels = segment_labels(&metrics);

    Ok(points
        .iter()
        .zip(assignment)
        .map(|(point, cluster_id)| CustomerSegment {
            point: point.clone(),
            cluster_id,
            segment_label: labels[cluster_id].clone(),
        })
        .collect())
}
