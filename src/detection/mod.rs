//! Outlier scorers applied to one cohort of feature vectors.
//!
//! - [`mahalanobis_scores`]: distance from the cohort mean in units of the
//!   cohort's estimated spread, plus the standardized vector.
//! - [`LocalOutlierFactor`]: local density ratio at one or more neighborhood
//!   sizes, sharing one pairwise distance matrix.
//!
//! # Example
//!
//! ```
//! use pace_outliers::detection::{mahalanobis_scores, LocalOutlierFactor, MahalanobisConfig};
//!
//! let cohort = vec![vec![1.0, 1.1], vec![1.2, 0.9], vec![0.9, 1.0], vec![8.0, 9.0]];
//!
//! let mahal = mahalanobis_scores(&cohort, &MahalanobisConfig::independent()).unwrap();
//! assert!(mahal.distances[3] > mahal.distances[0]);
//!
//! let lof = LocalOutlierFactor::fit(&cohort).unwrap();
//! let scores = lof.scores(2).unwrap();
//! assert!(scores[3] > scores[0]);
//! ```

mod lof;
mod mahalanobis;

pub use lof::{local_outlier_factors, DistanceMatrix, LocalOutlierFactor, LOF_K_VALUES};
pub use mahalanobis::{mahalanobis_scores, MahalanobisConfig, MahalanobisResult, SpreadMode};

use crate::error::{OutlierError, Result};

/// Check that every vector has the same dimension as the first and holds only
/// finite values. Returns that dimension.
pub(crate) fn validate_vectors(vectors: &[Vec<f64>]) -> Result<usize> {
    let dimension = vectors.first().map_or(0, Vec::len);
    for (i, v) in vectors.iter().enumerate() {
        if v.len() != dimension {
            return Err(OutlierError::DimensionMismatch {
                expected: dimension,
                got: v.len(),
            });
        }
        if v.iter().any(|x| !x.is_finite()) {
            return Err(OutlierError::ComputationError(format!(
                "non-finite value in observation {i}"
            )));
        }
    }
    Ok(dimension)
}
