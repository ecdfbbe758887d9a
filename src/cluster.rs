//! Deterministic 1-D k-means for duration clustering.
//!
//! Morse decoding only ever clusters scalar sample counts, so a small Lloyd
//! iteration replaces a general clustering dependency. Every fit is seeded,
//! restarted a fixed number of times, and the lowest-inertia run is kept, so
//! identical inputs always produce identical fits. That determinism is a
//! correctness requirement: the decode result must be reproducible byte for
//! byte.

use rand::rngs::StdRng;
use rand::SeedableRng;
use snafu::Snafu;

const MAX_ITERATIONS: usize = 300;
const CONVERGENCE_EPS: f32 = 1e-6;

#[derive(Debug, Snafu)]
pub enum ClusterError {
    /// No values to cluster
    #[snafu(display("cannot cluster an empty value set"))]
    EmptyInput,

    /// More clusters requested than distinct values available
    #[snafu(display("requested {k} clusters but only {distinct} distinct values"))]
    TooFewDistinct { k: usize, distinct: usize },
}

/// Restart count and seed shared by every clustering stage.
#[derive(Debug, Clone, Copy)]
pub struct ClusterPolicy {
    pub restarts: usize,
    pub seed: u64,
}

impl Default for ClusterPolicy {
    fn default() -> Self {
        Self {
            restarts: 10,
            seed: 0,
        }
    }
}

/// One fitted clustering.
#[derive(Debug, Clone)]
pub struct KMeansFit {
    /// Centroid per cluster index
    pub centroids: Vec<f32>,
    /// Cluster index per input value, input order preserved
    pub labels: Vec<usize>,
    /// Sum of squared distances to assigned centroids
    pub inertia: f32,
}

/// Cluster `values` into `k` groups.
///
/// Initial centroids are drawn from the distinct values so no two restarts
/// start with coincident centroids. Callers must not request more clusters
/// than there are distinct values.
pub fn kmeans_1d(values: &[f32], k: usize, policy: ClusterPolicy) -> Result<KMeansFit, ClusterError> {
    if values.is_empty() {
        return Err(ClusterError::EmptyInput);
    }

    let mut distinct: Vec<f32> = values.to_vec();
    distinct.sort_by(|a, b| a.total_cmp(b));
    distinct.dedup();

    if k == 0 || k > distinct.len() {
        return Err(ClusterError::TooFewDistinct {
            k,
            distinct: distinct.len(),
        });
    }

    let mut rng = StdRng::seed_from_u64(policy.seed);
    let mut best: Option<KMeansFit> = None;

    for _ in 0..policy.restarts.max(1) {
        let picks = rand::seq::index::sample(&mut rng, distinct.len(), k);
        let centroids: Vec<f32> = picks.iter().map(|i| distinct[i]).collect();
        let fit = lloyd(values, centroids);

        let better = match &best {
            Some(current) => fit.inertia < current.inertia,
            None => true,
        };
        if better {
            best = Some(fit);
        }
    }

    Ok(best.expect("at least one restart ran"))
}

fn lloyd(values: &[f32], mut centroids: Vec<f32>) -> KMeansFit {
    let k = centroids.len();
    let mut labels = vec![0usize; values.len()];

    for _ in 0..MAX_ITERATIONS {
        for (label, &value) in labels.iter_mut().zip(values) {
            *label = nearest(&centroids, value);
        }

        let mut sums = vec![0.0f64; k];
        let mut counts = vec![0usize; k];
        for (&label, &value) in labels.iter().zip(values) {
            sums[label] += value as f64;
            counts[label] += 1;
        }

        let mut max_shift = 0.0f32;
        for c in 0..k {
            // A cluster that lost all its points keeps its centroid.
            if counts[c] == 0 {
                continue;
            }
            let updated = (sums[c] / counts[c] as f64) as f32;
            max_shift = max_shift.max((updated - centroids[c]).abs());
            centroids[c] = updated;
        }

        if max_shift < CONVERGENCE_EPS {
            break;
        }
    }

    for (label, &value) in labels.iter_mut().zip(values) {
        *label = nearest(&centroids, value);
    }

    let inertia = labels
        .iter()
        .zip(values)
        .map(|(&label, &value)| {
            let d = value - centroids[label];
            d * d
        })
        .sum();

    KMeansFit {
        centroids,
        labels,
        inertia,
    }
}

fn nearest(centroids: &[f32], value: f32) -> usize {
    let mut best = 0;
    let mut best_dist = f32::INFINITY;
    for (i, &c) in centroids.iter().enumerate() {
        let d = (value - c).abs();
        if d < best_dist {
            best_dist = d;
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_separated_clusters() {
        let values = [50.0, 150.0, 52.0, 148.0, 49.0, 151.0];
        let fit = kmeans_1d(&values, 2, ClusterPolicy::default()).unwrap();

        let low = fit.labels[0];
        let high = fit.labels[1];
        assert_ne!(low, high);
        assert_eq!(fit.labels, vec![low, high, low, high, low, high]);
        assert!(fit.centroids[low] < fit.centroids[high]);
        assert!((fit.centroids[low] - 50.33).abs() < 1.0);
        assert!((fit.centroids[high] - 149.66).abs() < 1.0);
    }

    #[test]
    fn test_deterministic_across_runs() {
        let values = [30.0, 31.0, 29.0, 200.0, 198.0, 90.0, 91.0];
        let a = kmeans_1d(&values, 3, ClusterPolicy::default()).unwrap();
        let b = kmeans_1d(&values, 3, ClusterPolicy::default()).unwrap();
        assert_eq!(a.labels, b.labels);
        assert_eq!(a.centroids, b.centroids);
    }

    #[test]
    fn test_order_independence_of_split() {
        let forward = [50.0, 50.0, 150.0, 150.0];
        let reversed = [150.0, 150.0, 50.0, 50.0];

        let fa = kmeans_1d(&forward, 2, ClusterPolicy::default()).unwrap();
        let fb = kmeans_1d(&reversed, 2, ClusterPolicy::default()).unwrap();

        // The small values end up in the small-centroid cluster either way.
        for (&label, &value) in fa.labels.iter().zip(&forward) {
            let is_small = value < 100.0;
            assert_eq!(fa.centroids[label] < 100.0, is_small);
        }
        for (&label, &value) in fb.labels.iter().zip(&reversed) {
            let is_small = value < 100.0;
            assert_eq!(fb.centroids[label] < 100.0, is_small);
        }
    }

    #[test]
    fn test_single_cluster() {
        let values = [40.0, 42.0, 41.0];
        let fit = kmeans_1d(&values, 1, ClusterPolicy::default()).unwrap();
        assert_eq!(fit.labels, vec![0, 0, 0]);
        assert!((fit.centroids[0] - 41.0).abs() < 0.01);
    }

    #[test]
    fn test_too_few_distinct() {
        let values = [10.0, 10.0, 10.0];
        let err = kmeans_1d(&values, 2, ClusterPolicy::default());
        assert!(matches!(err, Err(ClusterError::TooFewDistinct { .. })));
    }

    #[test]
    fn test_empty_input() {
        let err = kmeans_1d(&[], 1, ClusterPolicy::default());
        assert!(matches!(err, Err(ClusterError::EmptyInput)));
    }
}
