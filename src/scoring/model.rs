use crate::scoring::engine::{monetary_band, urgency_band};
use crate::scoring::types::{PaymentStage, PriorityAssessment, PriorityInputs, PrioritySegment};
use crate::scoring::ScoringError;
use crate::segmentation::kmeans::{euclidean_distance, nearest_centroid, KMeans, DEFAULT_SEED};
use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

pub const MODEL_VERSION: u32 = 1;
pub const PRIORITY_CLUSTERS: usize = 3;
const TRAINING_RESTARTS: u64 = 16;
const NUMERIC_FEATURES: usize = 3;
const FEATURE_WIDTH: usize = NUMERIC_FEATURES + 3;

pub fn representative_score(segment: PrioritySegment) -> i32 {
    match segment {
        PrioritySegment::High => 90,
        PrioritySegment::Medium => 65,
        PrioritySegment::Low => 30,
    }
}

/// z-score scaling for days-until-event, price and party size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureScaler {
    pub means: [f64; NUMERIC_FEATURES],
    pub stds: [f64; NUMERIC_FEATURES],
}

impl FeatureScaler {
    pub fn fit(rows: &[[f64; NUMERIC_FEATURES]]) -> Self {
        let n = rows.len().max(1) as f64;
        let mut means = [0.0; NUMERIC_FEATURES];
        for row in rows {
            for d in 0..NUMERIC_FEATURES {
                means[d] += row[d] / n;
            }
        }
        let mut stds = [0.0; NUMERIC_FEATURES];
        for row in rows {
            for d in 0..NUMERIC_FEATURES {
                stds[d] += (row[d] - means[d]).powi(2) / n;
            }
        }
        for std in stds.iter_mut() {
            *std = std.sqrt();
            if *std == 0.0 {
                *std = 1.0;
            }
        }
        Self { means, stds }
    }

    pub fn transform(&self, row: &[f64; NUMERIC_FEATURES]) -> [f64; NUMERIC_FEATURES] {
        let mut out = [0.0; NUMERIC_FEATURES];
        for d in 0..NUMERIC_FEATURES {
            out[d] = (row[d] - self.means[d]) / self.stds[d];
        }
        out
    }
}

fn numeric_features(inputs: &PriorityInputs) -> [f64; NUMERIC_FEATURES] {
    [
        inputs.days_until_event.max(0) as f64,
        inputs.price_locked.to_f64().unwrap_or(0.0),
        inputs.party_size as f64,
    ]
}

fn status_one_hot(stage: PaymentStage) -> [f64; 3] {
    match stage {
        PaymentStage::Pending => [1.0, 0.0, 0.0],
        PaymentStage::Deposit => [0.0, 1.0, 0.0],
        PaymentStage::Paid => [0.0, 0.0, 1.0],
    }
}

/// Priority model trained by clustering past bookings into three groups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityModel {
    pub version: u32,
    pub scaler: FeatureScaler,
    pub centroids: Vec<Vec<f64>>,
    pub cluster_segments: Vec<PrioritySegment>,
    pub trained_on: usize,
    pub trained_at: DateTime<Utc>,
}

impl PriorityModel {
    pub fn fit(samples: &[PriorityInputs]) -> Result<Self, ScoringError> {
        if samples.len() < PRIORITY_CLUSTERS {
            return Err(ScoringError::ModelUnavailable(format!(
                "need at least {} bookings to train, found {}",
                PRIORITY_CLUSTERS,
                samples.len()
            )));
        }

        let raw: Vec<[f64; NUMERIC_FEATURES]> = samples.iter().map(numeric_features).collect();
        let scaler = FeatureScaler::fit(&raw);
        let vectors: Vec<Vec<f64>> = samples
            .iter()
            .map(|s| vectorize_with(&scaler, s))
            .collect();

        let distinct = distinct_count(&vectors);
        if distinct < PRIORITY_CLUSTERS {
            return Err(ScoringError::ModelUnavailable(format!(
                "need at least {} distinct bookings to train, found {}",
                PRIORITY_CLUSTERS, distinct
            )));
        }

        let fit = fit_best(&vectors)?;
        if distinct_count(&fit.centroids) < PRIORITY_CLUSTERS {
            return Err(ScoringError::ModelUnavailable(
                "training produced overlapping clusters".to_string(),
            ));
        }
        let cluster_segments = rank_centroids(&fit.centroids);

        tracing::info!(
            samples = samples.len(),
            iterations = fit.iterations,
            converged = fit.converged,
            "priority model trained"
        );

        Ok(Self {
            version: MODEL_VERSION,
            scaler,
            centroids: fit.centroids,
            cluster_segments,
            trained_on: samples.len(),
            trained_at: Utc::now(),
        })
    }

    /// Rejects artifacts whose shape does not match this build.
    pub fn validate(&self) -> Result<(), ScoringError> {
        let shape_ok = self.version == MODEL_VERSION
            && self.centroids.len() == PRIORITY_CLUSTERS
            && self.cluster_segments.len() == PRIORITY_CLUSTERS
            && self.centroids.iter().all(|c| c.len() == FEATURE_WIDTH)
            && self.scaler.stds.iter().all(|s| s.is_finite() && *s > 0.0);
        if shape_ok {
            Ok(())
        } else {
            Err(ScoringError::ModelUnavailable(
                "priority model artifact has an unexpected shape".to_string(),
            ))
        }
    }

    pub fn vectorize(&self, inputs: &PriorityInputs) -> Vec<f64> {
        vectorize_with(&self.scaler, inputs)
    }

    pub fn predict_cluster(&self, inputs: &PriorityInputs) -> usize {
        nearest_centroid(&self.vectorize(inputs), &self.centroids)
    }

    pub fn assess(&self, inputs: &PriorityInputs) -> PriorityAssessment {
        let cluster = self.predict_cluster(inputs);
        let segment = self
            .cluster_segments
            .get(cluster)
            .copied()
            .unwrap_or(PrioritySegment::Low);

        PriorityAssessment {
            priority_score: representative_score(segment),
            priority_segment: segment,
            urgency_level: urgency_band(inputs.days_until_event).1,
            monetary_level: monetary_band(inputs.price_locked).1,
        }
    }
}

fn vectorize_with(scaler: &FeatureScaler, inputs: &PriorityInputs) -> Vec<f64> {
    let scaled = scaler.transform(&numeric_features(inputs));
    let mut out = Vec::with_capacity(FEATURE_WIDTH);
    out.extend_from_slice(&scaled);
    out.extend_from_slice(&status_one_hot(inputs.payment_stage()));
    out
}

const DISTINCT_EPSILON: f64 = 1e-9;

fn distinct_count(vectors: &[Vec<f64>]) -> usize {
    let mut seen: Vec<&Vec<f64>> = Vec::new();
    for v in vectors {
        if !seen
            .iter()
            .any(|s| euclidean_distance(s, v) <= DISTINCT_EPSILON)
        {
            seen.push(v);
        }
    }
    seen.len()
}

// Seeded restarts, keeping the tightest fit. Still deterministic.
fn fit_best(vectors: &[Vec<f64>]) -> Result<KMeans, ScoringError> {
    let mut best: Option<(f64, KMeans)> = None;
    for restart in 0..TRAINING_RESTARTS {
        let fit = KMeans::fit_with_seed(vectors, PRIORITY_CLUSTERS, DEFAULT_SEED + restart)
            .map_err(|e| ScoringError::ModelUnavailable(e.to_string()))?;
        let inertia = fit.inertia(vectors);
        if best.as_ref().map_or(true, |(b, _)| inertia < *b) {
            best = Some((inertia, fit));
        }
    }
    best.map(|(_, fit)| fit)
        .ok_or_else(|| ScoringError::ModelUnavailable("no training runs".to_string()))
}

// Sooner events, higher prices and bigger parties rank first.
fn rank_centroids(centroids: &[Vec<f64>]) -> Vec<PrioritySegment> {
    let composite = |c: &Vec<f64>| -c[0] + c[1] + c[2];
    let mut order: Vec<usize> = (0..centroids.len()).collect();
    order.sort_by(|&a, &b| composite(&centroids[b]).total_cmp(&composite(&centroids[a])));

    let ladder = [PrioritySegment::High, PrioritySegment::Medium, PrioritySegment::Low];
    let mut segments = vec![PrioritySegment::Low; centroids.len()];
    for (rank, cluster) in order.into_iter().enumerate() {
        segments[cluster] = ladder.get(rank).copied().unwrap_or(PrioritySegment::Low);
    }
    segments
}
