//! Local Outlier Factor (density-ratio) scoring.
//!
//! For a neighborhood size `k`, each point's neighbors are the `k` closest
//! other points by Euclidean distance, ties broken by lower index. Exactly
//! `min(k, n - 1)` neighbors are used, so `k` larger than the cohort simply
//! means "every other point".
//!
//! - k-distance: distance to the last of those neighbors.
//! - reach distance of `i` from neighbor `j`: `max(k_distance(j), d(i, j))`.
//! - local reachability density: `1 / (mean reach distance + 1e-10)`.
//! - LOF: mean over neighbors of `lrd(j) / lrd(i)`.
//!
//! A lone point scores 1.0. The pairwise distances and per-point neighbor
//! orderings are computed once by [`LocalOutlierFactor::fit`] and shared by
//! every `k`.

use super::validate_vectors;
use crate::error::{OutlierError, Result};

/// Neighborhood sizes reported for every observation.
pub const LOF_K_VALUES: [usize; 7] = [1, 3, 5, 10, 20, 30, 50];

/// Added to the mean reach distance so duplicate points have a large but
/// finite density.
const DENSITY_EPSILON: f64 = 1e-10;

/// Euclidean distance for same-length vectors.
fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

/// Symmetric pairwise Euclidean distance matrix, stored flat.
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    n: usize,
    data: Vec<f64>,
}

impl DistanceMatrix {
    /// Compute all pairwise distances between `vectors`.
    pub fn euclidean(vectors: &[Vec<f64>]) -> Result<Self> {
        validate_vectors(vectors)?;
        let n = vectors.len();
        let mut data = vec![0.0; n * n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = euclidean_distance(&vectors[i], &vectors[j]);
                if !d.is_finite() {
                    return Err(OutlierError::ComputationError(format!(
                        "non-finite distance between observations {i} and {j}"
                    )));
                }
                data[i * n + j] = d;
                data[j * n + i] = d;
            }
        }
        Ok(Self { n, data })
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.n + j]
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// All other indices ordered by (distance from `i`, index).
    fn neighbor_order(&self, i: usize) -> Vec<usize> {
        let mut others: Vec<usize> = (0..self.n).filter(|&j| j != i).collect();
        others.sort_by(|&a, &b| {
            self.get(i, a)
                .partial_cmp(&self.get(i, b))
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.cmp(&b))
        });
        others
    }
}

/// A fitted density-ratio scorer for one cohort.
#[derive(Debug, Clone)]
pub struct LocalOutlierFactor {
    distances: DistanceMatrix,
    /// `order[i]` lists every other point, nearest first.
    order: Vec<Vec<usize>>,
}

impl LocalOutlierFactor {
    /// Precompute distances and neighbor orderings for a cohort.
    pub fn fit(vectors: &[Vec<f64>]) -> Result<Self> {
        let distances = DistanceMatrix::euclidean(vectors)?;
        let order = (0..distances.len())
            .map(|i| distances.neighbor_order(i))
            .collect();
        Ok(Self { distances, order })
    }

    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    /// LOF score of every point for neighborhood size `k`.
    ///
    /// # Arguments
    /// * `k` - Neighborhood size, at least 1. Values of `k >= n` use all
    ///   `n - 1` other points.
    ///
    /// # Returns
    /// One score per point in fit order. Scores near 1 mean the point is as
    /// dense as its neighbors; larger scores mean a sparser region. A cohort
    /// of one point scores 1.0.
    ///
    /// # Example
    /// ```
    /// use pace_outliers::detection::LocalOutlierFactor;
    ///
    /// let lof = LocalOutlierFactor::fit(&[vec![0.0], vec![1.0], vec![3.0]]).unwrap();
    /// let scores = lof.scores(1).unwrap();
    /// assert!((scores[2] - 2.0).abs() < 1e-6);
    ///
    /// // k larger than the cohort degrades to every other point
    /// assert_eq!(lof.scores(50).unwrap(), lof.scores(2).unwrap());
    /// ```
    pub fn scores(&self, k: usize) -> Result<Vec<f64>> {
        if k == 0 {
            return Err(OutlierError::InvalidParameter(
                "LOF neighborhood size must be at least 1".into(),
            ));
        }

        let n = self.len();
        if n <= 1 {
            return Ok(vec![1.0; n]);
        }

        let k = k.min(n - 1);
        let neighbors: Vec<&[usize]> = self.order.iter().map(|o| &o[..k]).collect();

        let k_distance: Vec<f64> = (0..n)
            .map(|i| self.distances.get(i, neighbors[i][k - 1]))
            .collect();

        let lrd: Vec<f64> = (0..n)
            .map(|i| {
                let total_reach: f64 = neighbors[i]
                    .iter()
                    .map(|&j| k_distance[j].max(self.distances.get(i, j)))
                    .sum();
                1.0 / (total_reach / k as f64 + DENSITY_EPSILON)
            })
            .collect();

        let scores: Vec<f64> = (0..n)
            .map(|i| {
                neighbors[i].iter().map(|&j| lrd[j] / lrd[i]).sum::<f64>() / k as f64
            })
            .collect();

        if let Some(i) = scores.iter().position(|x| !x.is_finite()) {
            return Err(OutlierError::ComputationError(format!(
                "non-finite LOF score for observation {i} at k={k}"
            )));
        }
        Ok(scores)
    }

    /// LOF scores for several neighborhood sizes, in the order given.
    pub fn scores_for(&self, ks: &[usize]) -> Result<Vec<Vec<f64>>> {
        ks.iter().map(|&k| self.scores(k)).collect()
    }
}

/// Convenience wrapper: fit and score a cohort for a single `k`.
pub fn local_outlier_factors(vectors: &[Vec<f64>], k: usize) -> Result<Vec<f64>> {
    LocalOutlierFactor::fit(vectors)?.scores(k)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn cluster_with_outlier() -> Vec<Vec<f64>> {
        let mut points: Vec<Vec<f64>> = (0..12)
            .map(|i| {
                let angle = i as f64 * std::f64::consts::PI / 6.0;
                vec![angle.cos(), angle.sin()]
            })
            .collect();
        points.push(vec![10.0, 10.0]);
        points
    }

    #[test]
    fn distance_matrix_is_symmetric() {
        let m = DistanceMatrix::euclidean(&[vec![0.0, 0.0], vec![3.0, 4.0], vec![6.0, 8.0]])
            .unwrap();
        assert_eq!(m.len(), 3);
        assert_relative_eq!(m.get(0, 1), 5.0, epsilon = 1e-12);
        assert_relative_eq!(m.get(2, 0), 10.0, epsilon = 1e-12);
        assert_eq!(m.get(1, 1), 0.0);
    }

    #[test]
    fn scores_aligned_with_input() {
        let points = cluster_with_outlier();
        let lof = LocalOutlierFactor::fit(&points).unwrap();
        for &k in &LOF_K_VALUES {
            assert_eq!(lof.scores(k).unwrap().len(), points.len());
        }
    }

    #[test]
    fn outlier_scores_high() {
        let points = cluster_with_outlier();
        let scores = local_outlier_factors(&points, 3).unwrap();
        assert!(scores[12] > 2.0);
        for s in &scores[..12] {
            assert_relative_eq!(*s, 1.0, epsilon = 0.2);
        }
    }

    #[test]
    fn uniform_ring_scores_one() {
        // Evenly spaced points on a circle all have identical neighborhoods
        let points: Vec<Vec<f64>> = (0..8)
            .map(|i| {
                let angle = i as f64 * std::f64::consts::PI / 4.0;
                vec![angle.cos(), angle.sin()]
            })
            .collect();
        let scores = local_outlier_factors(&points, 2).unwrap();
        for s in scores {
            assert_relative_eq!(s, 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn identical_points_score_exactly_one() {
        let points = vec![vec![3.0, 4.0]; 5];
        let lof = LocalOutlierFactor::fit(&points).unwrap();
        for &k in &LOF_K_VALUES {
            assert!(lof.scores(k).unwrap().iter().all(|&s| s == 1.0));
        }
    }

    #[test]
    fn single_point_scores_one() {
        assert_eq!(local_outlier_factors(&[vec![1.0, 2.0]], 5).unwrap(), vec![1.0]);
        assert!(local_outlier_factors(&[], 5).unwrap().is_empty());
    }

    #[test]
    fn k_larger_than_cohort_uses_all_points() {
        let points = vec![vec![0.0], vec![1.0], vec![5.0]];
        let lof = LocalOutlierFactor::fit(&points).unwrap();
        assert_eq!(lof.scores(50).unwrap(), lof.scores(2).unwrap());
    }

    #[test]
    fn ties_broken_by_index() {
        // Point 1 is equidistant from 0 and 2; with k=1 it must pick 0
        let points = vec![vec![0.0], vec![1.0], vec![2.0]];
        let lof = LocalOutlierFactor::fit(&points).unwrap();
        assert_eq!(lof.order[1], vec![0, 2]);
        let a = lof.scores(1).unwrap();
        let b = lof.scores(1).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn hand_computed_k1() {
        // Points 0, 1, 3 on a line, k = 1
        // neighbors: 0->1, 1->0, 3->1 ; k-dist: 1, 1, 2
        // lrd: 0 -> 1/max(1,1)=1, 1 -> 1/max(1,1)=1, 2 -> 1/max(1,2)=0.5
        // lof: 0 -> 1, 1 -> 1, 2 -> 1/0.5 = 2
        let points = vec![vec![0.0], vec![1.0], vec![3.0]];
        let scores = local_outlier_factors(&points, 1).unwrap();
        assert_relative_eq!(scores[0], 1.0, epsilon = 1e-8);
        assert_relative_eq!(scores[1], 1.0, epsilon = 1e-8);
        assert_relative_eq!(scores[2], 2.0, epsilon = 1e-8);
    }

    #[test]
    fn scores_for_matches_individual_calls() {
        let points = cluster_with_outlier();
        let lof = LocalOutlierFactor::fit(&points).unwrap();
        let all = lof.scores_for(&[1, 5]).unwrap();
        assert_eq!(all[0], lof.scores(1).unwrap());
        assert_eq!(all[1], lof.scores(5).unwrap());
    }

    #[test]
    fn zero_k_is_rejected() {
        let err = local_outlier_factors(&[vec![1.0], vec![2.0]], 0).unwrap_err();
        assert!(matches!(err, OutlierError::InvalidParameter(_)));
    }
}
