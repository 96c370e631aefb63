use crate::segmentation::SegmentationError;
use rand::rngs::StdRng;
use rand::SeedableRng;

pub const DEFAULT_SEED: u64 = 42;
pub const MAX_ITERATIONS: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct KMeans {
    pub centroids: Vec<Vec<f64>>,
    pub assignment: Vec<usize>,
    pub iterations: usize,
    pub converged: bool,
}

impl KMeans {
    pub fn fit<V: AsRef<[f64]>>(vectors: &[V], k: usize) -> Result<Self, SegmentationError> {
        Self::fit_with_seed(vectors, k, DEFAULT_SEED)
    }

    /// Lloyd iteration from `k` seeded sample points. Convergence means the
    /// whole assignment vector repeated; a cluster that loses all of its
    /// points keeps its previous centroid.
    pub fn fit_with_seed<V: AsRef<[f64]>>(
        vectors: &[V],
        k: usize,
        seed: u64,
    ) -> Result<Self, SegmentationError> {
        if k == 0 {
            return Err(SegmentationError::InvalidClusterCount(0));
        }
        if vectors.len() < k {
            return Err(SegmentationError::InsufficientSamples {
                samples: vectors.len(),
                k,
            });
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let mut centroids: Vec<Vec<f64>> = rand::seq::index::sample(&mut rng, vectors.len(), k)
            .into_iter()
            .map(|idx| vectors[idx].as_ref().to_vec())
            .collect();

        let mut previous: Option<Vec<usize>> = None;
        let mut iterations = 0;
        let mut converged = false;

        while iterations < MAX_ITERATIONS {
            iterations += 1;
            let assignment: Vec<usize> = vectors
                .iter()
                .map(|v| nearest_centroid(v.as_ref(), &centroids))
                .collect();

            recompute_centroids(vectors, &assignment, &mut centroids);

            if previous.as_ref() == Some(&assignment) {
                converged = true;
                previous = Some(assignment);
                break;
            }
            previous = Some(assignment);
        }

        Ok(Self {
            centroids,
            assignment: previous.unwrap_or_default(),
            iterations,
            converged,
        })
    }

    /// Sum of squared distances from each vector to its assigned centroid.
    pub fn inertia<V: AsRef<[f64]>>(&self, vectors: &[V]) -> f64 {
        vectors
            .iter()
            .zip(&self.assignment)
            .map(|(v, &label)| euclidean_distance(v.as_ref(), &self.centroids[label]).powi(2))
            .sum()
    }

    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.centroids.len()];
        for &label in &self.assignment {
            sizes[label] += 1;
        }
        sizes
    }
}

/// Assigns each vector to one of `k` clusters.
pub fn kmeans<V: AsRef<[f64]>>(vectors: &[V], k: usize) -> Result<Vec<usize>, SegmentationError> {
    Ok(KMeans::fit(vectors, k)?.assignment)
}

/// Index of the closest centroid; ties resolve to the lowest index.
pub fn nearest_centroid(point: &[f64], centroids: &[Vec<f64>]) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (idx, centroid) in centroids.iter().enumerate() {
        let distance = euclidean_distance(point, centroid);
        if distance < best_distance {
            best_distance = distance;
            best = idx;
        }
    }
    best
}

pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

fn recompute_centroids<V: AsRef<[f64]>>(vectors: &[V], assignment: &[usize], centroids: &mut [Vec<f64>]) {
    let dims = centroids.first().map(Vec::len).unwrap_or(0);
    let mut sums = vec![vec![0.0; dims]; centroids.len()];
    let mut counts = vec![0usize; centroids.len()];

    for (v, &label) in vectors.iter().zip(assignment) {
        counts[label] += 1;
        for (sum, x) in sums[label].iter_mut().zip(v.as_ref()) {
            *sum += x;
        }
    }

    for (idx, centroid) in centroids.iter_mut().enumerate() {
        if counts[idx] == 0 {
            continue;
        }
        for (c, sum) in centroid.iter_mut().zip(&sums[idx]) {
            *c = sum / counts[idx] as f64;
        }
    }
}
