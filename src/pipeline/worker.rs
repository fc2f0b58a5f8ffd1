//! Cohort worker: all scores for one weekday/hour cohort.

use crate::core::{weekday_name, Cohort, CohortKey, TimeSliceKey};
use crate::detection::{mahalanobis_scores, LocalOutlierFactor, MahalanobisConfig, LOF_K_VALUES};
use crate::error::{OutlierError, Result};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Every outlier score for one observation: the parametric distance followed
/// by the LOF score at each of [`LOF_K_VALUES`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreRecord {
    pub distance: f64,
    pub lof: [f64; LOF_K_VALUES.len()],
}

impl ScoreRecord {
    /// LOF score for neighborhood size `k`, if `k` is one of [`LOF_K_VALUES`].
    pub fn lof_at(&self, k: usize) -> Option<f64> {
        LOF_K_VALUES
            .iter()
            .position(|&candidate| candidate == k)
            .map(|i| self.lof[i])
    }

    /// Fields in report order: distance, lof1, lof3, ..., lof50.
    pub fn to_array(&self) -> [f64; 1 + LOF_K_VALUES.len()] {
        let mut out = [0.0; 1 + LOF_K_VALUES.len()];
        out[0] = self.distance;
        out[1..].copy_from_slice(&self.lof);
        out
    }
}

/// Scores and standardized vectors for one cohort, keyed by time slice.
#[derive(Debug, Clone, PartialEq)]
pub struct CohortScores {
    pub cohort: CohortKey,
    pub scores: BTreeMap<TimeSliceKey, ScoreRecord>,
    pub standardized: BTreeMap<TimeSliceKey, Vec<f64>>,
}

impl CohortScores {
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// Run both scorers over one cohort.
///
/// Any failure is wrapped in [`OutlierError::CohortFailed`] naming the cohort.
pub fn score_cohort(cohort: &Cohort, config: &MahalanobisConfig) -> Result<CohortScores> {
    let key = cohort.key();
    debug!(cohort = %key, size = cohort.len(), "processing cohort");

    score_cohort_inner(cohort, config).map_err(|source| OutlierError::CohortFailed {
        weekday: weekday_name(key.weekday).to_string(),
        hour: key.hour,
        source: Box::new(source),
    })
}

fn score_cohort_inner(cohort: &Cohort, config: &MahalanobisConfig) -> Result<CohortScores> {
    let key = cohort.key();
    let mahal = mahalanobis_scores(cohort.vectors(), config)?;
    if mahal.floored > 0 {
        warn!(
            cohort = %key,
            size = cohort.len(),
            floored = mahal.floored,
            "spread regularized: degenerate dimensions or floored eigenvalues"
        );
    }

    let lof = LocalOutlierFactor::fit(cohort.vectors())?;
    let lof_scores = lof.scores_for(&LOF_K_VALUES)?;

    let mut scores = BTreeMap::new();
    let mut standardized = BTreeMap::new();
    for (i, (slice, z)) in cohort.slice_keys().zip(mahal.standardized).enumerate() {
        let mut record = ScoreRecord {
            distance: mahal.distances[i],
            lof: [0.0; LOF_K_VALUES.len()],
        };
        for (slot, per_k) in record.lof.iter_mut().zip(&lof_scores) {
            *slot = per_k[i];
        }

        if scores.insert(slice, record).is_some() {
            return Err(OutlierError::DuplicateKey(slice));
        }
        standardized.insert(slice, z);
    }

    Ok(CohortScores {
        cohort: key,
        scores,
        standardized,
    })
}
