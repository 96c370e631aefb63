use crate::segmentation::rfm::RfmPoint;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

pub const SEGMENT_VOCABULARY: [&str; 4] = ["Loyal", "Active", "Potential", "Passive"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterMetrics {
    pub cluster_id: usize,
    pub mean_recency: f64,
    pub mean_frequency: f64,
    pub mean_monetary: f64,
    pub count: usize,
}

impl ClusterMetrics {
    pub fn value_score(&self) -> f64 {
        if self.count == 0 {
            return f64::NEG_INFINITY;
        }
        (self.mean_frequency * self.mean_monetary) - (self.mean_recency * 10.0)
    }
}

pub fn cluster_metrics(points: &[RfmPoint], assignment: &[usize], k: usize) -> Vec<ClusterMetrics> {
    let mut sums = vec![(0.0_f64, 0.0_f64, 0.0_f64, 0usize); k];
    for (point, &label) in points.iter().zip(assignment) {
        let entry = &mut sums[label];
        entry.0 += point.recency as f64;
        entry.1 += point.frequency as f64;
        entry.2 += point.monetary.to_f64().unwrap_or(0.0);
        entry.3 += 1;
    }

    sums.into_iter()
        .enumerate()
        .map(|(cluster_id, (recency, frequency, monetary, count))| {
            let n = count.max(1) as f64;
            ClusterMetrics {
                cluster_id,
                mean_recency: recency / n,
                mean_frequency: frequency / n,
                mean_monetary: monetary / n,
                count,
            }
        })
        .collect()
}

/// Orders clusters best to worst and names them. The result is sorted by
/// rank; clusters past the end of the vocabulary get `Cluster {id}`.
pub fn rank_clusters(metrics: &[ClusterMetrics]) -> Vec<(usize, String)> {
    let mut ranked: Vec<&ClusterMetrics> = metrics.iter().collect();
    ranked.sort_by_key(|m| m.cluster_id);
    // stable: equal scores keep ascending cluster id
    ranked.sort_by(|a, b| b.value_score().total_cmp(&a.value_score()));

    ranked
        .into_iter()
        .enumerate()
        .map(|(rank, m)| {
            let label = SEGMENT_VOCABULARY
                .get(rank)
                .map(|s| s.to_string())
                .unwrap_or_else(|| format!("Cluster {}", m.cluster_id));
            (m.cluster_id, label)
        })
        .collect()
}

/// Label for each cluster id, indexed by id.
pub fn segment_labels(metrics: &[ClusterMetrics]) -> Vec<String> {
    let mut labels = vec![String::new(); metrics.len()];
    for (cluster_id, label) in rank_clusters(metrics) {
        if let Some(slot) = labels.get_mut(cluster_id) {
            *slot = label;
        }
    }
    labels
}
