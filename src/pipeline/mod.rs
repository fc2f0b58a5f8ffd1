//! Cohort scoring pipeline: per-cohort worker, parallel dispatch and merge.
//!
//! ```text
//! CohortSet ──► dispatch (rayon pool, W threads) ──► score_cohort × N ──► merge ──► MergedScores
//! ```
//!
//! Cohorts share no mutable state, so the merged result does not depend on
//! the order in which workers finish.

mod dispatch;
mod merge;
mod worker;

pub use dispatch::dispatch;
pub use merge::{merge_results, MergedScores};
pub use worker::{score_cohort, CohortScores, ScoreRecord};

use crate::core::CohortSet;
use crate::detection::MahalanobisConfig;
use crate::error::{OutlierError, Result};
use tracing::info;

/// Score every cohort on a pool of `workers` threads and merge the results.
///
/// Fails if any cohort fails, if two cohorts produce the same key, or if the
/// merged result does not cover every observation exactly once.
pub fn score_cohorts(
    cohorts: &CohortSet,
    config: &MahalanobisConfig,
    workers: usize,
) -> Result<MergedScores> {
    let units: Vec<_> = cohorts.iter().cloned().collect();
    info!(
        cohorts = units.len(),
        observations = cohorts.observation_count(),
        workers,
        mode = ?config.mode,
        "dispatching cohorts"
    );
    let outputs = dispatch(&units, config, workers)?;

    info!("merging output");
    let merged = merge_results(outputs)?;

    if merged.len() != cohorts.observation_count() {
        return Err(OutlierError::ComputationError(format!(
            "merged {} scores for {} observations",
            merged.len(),
            cohorts.observation_count()
        )));
    }
    Ok(merged)
}
