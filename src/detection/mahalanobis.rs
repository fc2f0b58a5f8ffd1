//! Parametric distance scoring (Mahalanobis-style).
//!
//! The cohort mean is the center. The spread is either the per-dimension
//! variance ([`SpreadMode::Independent`]) or the full covariance matrix
//! ([`SpreadMode::Full`]). Each vector is mapped to a whitened vector `z` and
//! its score is `|z|^2`, the squared Mahalanobis distance.
//!
//! A dimension whose variance is zero relative to its own center is
//! degenerate: it contributes 0 to `z`. In independent mode every other
//! dimension is scaled by its own standard deviation, whatever the scale of
//! its neighbours. In full mode the covariance of the remaining dimensions is
//! first normalized to a correlation matrix, so `eigen_floor` acts on
//! eigenvalues whose mean is 1 and only engages when the correlation matrix
//! is singular or ill-conditioned. A cohort with one observation, or with
//! every dimension degenerate, gets distance 0 and the zero vector.

use super::validate_vectors;
use crate::error::{OutlierError, Result};
use crate::linalg::{mat_vec, symmetric_eigen};
use crate::utils::stats::{column_means, column_variances, covariance_matrix};

/// A variance at or below this fraction of `1 + center^2` is treated as zero
/// (absorbs rounding in the mean of identical values).
const DEGENERATE_REL_TOL: f64 = 1e-20;

/// How the cohort spread is estimated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpreadMode {
    /// Diagonal variance: dimensions are treated as independent.
    Independent,
    /// Full covariance matrix.
    #[default]
    Full,
}

/// Configuration for the parametric distance scorer.
#[derive(Debug, Clone)]
pub struct MahalanobisConfig {
    /// Spread estimation mode.
    pub mode: SpreadMode,
    /// Floor for the eigenvalues of the correlation matrix (full mode).
    pub eigen_floor: f64,
}

impl Default for MahalanobisConfig {
    fn default() -> Self {
        Self {
            mode: SpreadMode::Full,
            eigen_floor: 1e-6,
        }
    }
}

impl MahalanobisConfig {
    /// Full-covariance scoring with the default floor.
    pub fn full() -> Self {
        Self::default()
    }

    /// Diagonal-variance scoring with the default floor.
    pub fn independent() -> Self {
        Self {
            mode: SpreadMode::Independent,
            ..Self::default()
        }
    }

    /// Set spread mode.
    pub fn mode(mut self, mode: SpreadMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the relative eigenvalue floor.
    pub fn eigen_floor(mut self, floor: f64) -> Self {
        self.eigen_floor = floor;
        self
    }
}

/// Output of [`mahalanobis_scores`], positionally aligned with the input.
#[derive(Debug, Clone, Default)]
pub struct MahalanobisResult {
    /// Squared distance from the center, one per input vector.
    pub distances: Vec<f64>,
    /// Standardized vectors, one per input vector.
    pub standardized: Vec<Vec<f64>>,
    /// Estimated center (cohort mean).
    pub center: Vec<f64>,
    /// Number of degenerate dimensions plus correlation eigenvalues raised to
    /// the floor.
    pub floored: usize,
    /// True when the cohort had zero spread and sentinel values were returned.
    pub degenerate: bool,
}

/// Score every vector of a cohort by its distance from the cohort center.
///
/// # Arguments
/// * `vectors` - Cohort observations, all of the same dimension
/// * `config` - Spread mode and eigenvalue floor
///
/// # Returns
/// One squared distance and one standardized vector per input vector, in
/// input order. An empty cohort gives an empty result.
///
/// # Example
/// ```
/// use pace_outliers::detection::{mahalanobis_scores, MahalanobisConfig};
///
/// let cohort = vec![vec![1.0, 10.0], vec![2.0, 20.0], vec![3.0, 30.0]];
/// let result = mahalanobis_scores(&cohort, &MahalanobisConfig::independent()).unwrap();
///
/// assert!((result.standardized[2][0] - 1.0).abs() < 1e-12);
/// assert!((result.distances[2] - 2.0).abs() < 1e-12);
/// ```
pub fn mahalanobis_scores(
    vectors: &[Vec<f64>],
    config: &MahalanobisConfig,
) -> Result<MahalanobisResult> {
    if !(config.eigen_floor > 0.0 && config.eigen_floor.is_finite()) {
        return Err(OutlierError::InvalidParameter(format!(
            "eigen_floor must be positive and finite, got {}",
            config.eigen_floor
        )));
    }

    let n = vectors.len();
    if n == 0 {
        return Ok(MahalanobisResult::default());
    }
    let d = validate_vectors(vectors)?;

    let center = column_means(vectors);
    let variances = column_variances(vectors, &center);

    // Reciprocal standard deviation per dimension, 0 for degenerate ones
    let inv_sd: Vec<f64> = variances
        .iter()
        .zip(&center)
        .map(|(&var, &c)| {
            if var <= DEGENERATE_REL_TOL * (1.0 + c * c) {
                0.0
            } else {
                1.0 / var.sqrt()
            }
        })
        .collect();
    let active: Vec<usize> = (0..d).filter(|&j| inv_sd[j] > 0.0).collect();

    if n < 2 || active.is_empty() {
        return Ok(MahalanobisResult {
            distances: vec![0.0; n],
            standardized: vec![vec![0.0; d]; n],
            center,
            floored: 0,
            degenerate: true,
        });
    }

    let degenerate_dims = d - active.len();
    let scaled: Vec<Vec<f64>> = vectors
        .iter()
        .map(|v| {
            v.iter()
                .zip(&center)
                .zip(&inv_sd)
                .map(|((x, c), s)| (x - c) * s)
                .collect()
        })
        .collect();

    let (standardized, floored): (Vec<Vec<f64>>, usize) = match config.mode {
        SpreadMode::Independent => (scaled, degenerate_dims),
        SpreadMode::Full => {
            let cov = covariance_matrix(vectors, &center);
            let corr: Vec<Vec<f64>> = active
                .iter()
                .map(|&i| {
                    active
                        .iter()
                        .map(|&j| cov[i][j] * inv_sd[i] * inv_sd[j])
                        .collect()
                })
                .collect();
            let eigen = symmetric_eigen(&corr).ok_or_else(|| {
                OutlierError::ComputationError(
                    "correlation eigen-decomposition did not converge".into(),
                )
            })?;
            let (whitening, floored) = eigen.inverse_sqrt_with_floor(config.eigen_floor);

            let z: Vec<Vec<f64>> = scaled
                .iter()
                .map(|row| {
                    let reduced: Vec<f64> = active.iter().map(|&j| row[j]).collect();
                    let mut z = vec![0.0; d];
                    for (&j, value) in active.iter().zip(mat_vec(&whitening, &reduced)) {
                        z[j] = value;
                    }
                    z
                })
                .collect();
            (z, floored + degenerate_dims)
        }
    };

    let distances: Vec<f64> = standardized
        .iter()
        .map(|z| z.iter().map(|x| x * x).sum())
        .collect();

    if let Some(i) = distances.iter().position(|x| !x.is_finite()) {
        return Err(OutlierError::ComputationError(format!(
            "non-finite distance for observation {i}"
        )));
    }

    Ok(MahalanobisResult {
        distances,
        standardized,
        center,
        floored,
        degenerate: false,
    })
}
